//! Shared in-memory adapters for the integration suites.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use tempfile::TempDir;

use ledgerpost::adapters::{LedgerSource, Mailer, MarketDataSource, OutboundEmail};
use ledgerpost::core::{PipelineSettings, RetryPolicy};
use ledgerpost::domain::{RawTransaction, RequestPayload, TxInput, TxOutput};

/// Ledger returning a fixed history, counting calls
pub struct StaticLedger {
    txs: Mutex<Vec<RawTransaction>>,
    calls: AtomicUsize,
}

impl StaticLedger {
    pub fn new(txs: Vec<RawTransaction>) -> Arc<Self> {
        Arc::new(Self {
            txs: Mutex::new(txs),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_history(&self, txs: Vec<RawTransaction>) {
        *self.txs.lock().unwrap() = txs;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerSource for StaticLedger {
    fn name(&self) -> &str {
        "static-ledger"
    }

    async fn fetch_transactions(&self, _address: &str) -> Result<Vec<RawTransaction>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.txs.lock().unwrap().clone())
    }
}

/// Ledger that fails `failures` times before succeeding
pub struct FlakyLedger {
    failures: AtomicUsize,
    txs: Vec<RawTransaction>,
    calls: AtomicUsize,
}

impl FlakyLedger {
    pub fn new(failures: usize, txs: Vec<RawTransaction>) -> Arc<Self> {
        Arc::new(Self {
            failures: AtomicUsize::new(failures),
            txs,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerSource for FlakyLedger {
    fn name(&self) -> &str {
        "flaky-ledger"
    }

    async fn fetch_transactions(&self, _address: &str) -> Result<Vec<RawTransaction>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failures.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            anyhow::bail!("ledger source unavailable")
        }

        Ok(self.txs.clone())
    }
}

/// Fixed price source, counting calls
pub struct StaticPrice {
    price: Decimal,
    calls: AtomicUsize,
}

impl StaticPrice {
    pub fn new(price: Decimal) -> Arc<Self> {
        Arc::new(Self {
            price,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for StaticPrice {
    fn name(&self) -> &str {
        "static-price"
    }

    async fn fetch_price(&self) -> Result<Decimal> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.price)
    }
}

/// Mailer recording accepted messages, or rejecting everything
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn messages(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    fn name(&self) -> &str {
        "recording-mailer"
    }

    async fn send(&self, message: &OutboundEmail) -> Result<u16> {
        if self.fail {
            anyhow::bail!("mail provider unavailable")
        }

        self.sent.lock().unwrap().push(message.clone());
        Ok(202)
    }
}

/// Raw transaction paying `sats` to `address`
pub fn incoming(address: &str, hash: &str, time: i64, sats: i64) -> RawTransaction {
    RawTransaction {
        hash: hash.to_string(),
        time,
        inputs: vec![],
        out: vec![TxOutput {
            addr: Some(address.to_string()),
            value: sats,
        }],
    }
}

/// Raw transaction spending `sats` from `address`
pub fn outgoing(address: &str, hash: &str, time: i64, sats: i64) -> RawTransaction {
    RawTransaction {
        hash: hash.to_string(),
        time,
        inputs: vec![TxInput {
            prev_out: Some(TxOutput {
                addr: Some(address.to_string()),
                value: sats,
            }),
        }],
        out: vec![TxOutput {
            addr: Some("counterparty".to_string()),
            value: sats,
        }],
    }
}

/// Pipeline settings writing into a scratch directory, retrying without delay
pub fn settings(dir: &TempDir) -> PipelineSettings {
    PipelineSettings {
        reports_dir: dir.path().to_path_buf(),
        sender: "reports@example.com".to_string(),
        remove_after_dispatch: false,
        retry: RetryPolicy {
            max_attempts: 2,
            retry_delay_ms: 0,
        },
    }
}

pub fn payload(address: &str, email: &str) -> RequestPayload {
    RequestPayload {
        address: Some(address.to_string()),
        email: Some(email.to_string()),
    }
}
