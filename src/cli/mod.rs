//! Command-line interface for ledgerpost.
//!
//! Provides commands for running the HTTP server, generating a single
//! report from the terminal, and inspecting the resolved configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{BlockchainClient, SendGridClient, TickerClient};
use crate::config;
use crate::core::{Orchestrator, PipelineSettings};
use crate::domain::RequestPayload;
use crate::http::{self, AppState};

/// ledgerpost - address statement reporting service
#[derive(Parser, Debug)]
#[command(name = "ledgerpost")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind to (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Generate and dispatch a single report from the terminal
    Send {
        /// Ledger address to report on
        address: String,

        /// Recipient email
        email: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the selected command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve { bind } => serve(bind).await,
            Commands::Send { address, email } => send(address, email).await,
            Commands::Config => show_config(),
        }
    }
}

/// Wire the production adapters into an orchestrator
fn build_orchestrator() -> Result<Orchestrator> {
    let cfg = config::config()?;
    let api_key = config::mail_api_key()?;
    let timeout = Duration::from_secs(cfg.timeout_seconds);

    let ledger = Arc::new(BlockchainClient::with_base_url(&cfg.ledger_url, timeout)?);
    let market = Arc::new(TickerClient::with_base_url(&cfg.ticker_url, timeout)?);
    let mailer = Arc::new(SendGridClient::new(api_key, timeout)?);

    let settings = PipelineSettings {
        reports_dir: cfg.reports_dir.clone(),
        sender: cfg.sender.clone(),
        remove_after_dispatch: cfg.remove_after_dispatch,
        retry: cfg.retry.clone(),
    };

    Ok(Orchestrator::new(ledger, market, mailer, settings))
}

async fn serve(bind: Option<String>) -> Result<()> {
    let cfg = config::config()?;
    let bind = bind.unwrap_or_else(|| cfg.bind.clone());

    let state = AppState {
        orchestrator: Arc::new(build_orchestrator()?),
    };

    http::serve(state, &bind).await
}

async fn send(address: String, email: String) -> Result<()> {
    let orchestrator = build_orchestrator()?;

    let payload = RequestPayload {
        address: Some(address),
        email: Some(email),
    };

    let outcome = orchestrator
        .run(&payload)
        .await
        .context("Report pipeline failed")?;

    println!(
        "Report: {} ({} rows)",
        outcome.artifact.path.display(),
        outcome.artifact.row_count
    );

    match outcome.delivery.provider_status {
        Some(status) => println!("Email sent with status code: {}", status),
        None => println!(
            "Email delivery failed: {}",
            outcome.delivery.error.as_deref().unwrap_or("unknown error")
        ),
    }

    Ok(())
}

fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("Resolved configuration:");
    println!("  bind:                  {}", cfg.bind);
    println!("  reports_dir:           {}", cfg.reports_dir.display());
    println!("  remove_after_dispatch: {}", cfg.remove_after_dispatch);
    println!("  sender:                {}", cfg.sender);
    println!("  ledger_url:            {}", cfg.ledger_url);
    println!("  ticker_url:            {}", cfg.ticker_url);
    println!("  timeout_seconds:       {}", cfg.timeout_seconds);
    println!("  retry_max_attempts:    {}", cfg.retry.max_attempts);
    match &cfg.config_file {
        Some(path) => println!("  config_file:           {}", path.display()),
        None => println!("  config_file:           (none)"),
    }

    Ok(())
}
