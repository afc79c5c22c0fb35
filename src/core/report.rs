//! Report artifact generation.
//!
//! Serializes summary rows into a CSV statement named after the address.
//! The name is deterministic: regenerating for the same address truncates
//! and overwrites the prior file (last write wins).

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use crate::domain::SummaryRow;

use super::error::PipelineError;

/// A generated report file
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    /// File name (the artifact identifier)
    pub file_name: String,

    /// Full path on disk
    pub path: PathBuf,

    /// Number of data rows written
    pub row_count: usize,
}

/// Writes statement reports into a fixed directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    reports_dir: PathBuf,
}

impl ReportWriter {
    /// Create a writer rooted at `reports_dir`
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    /// Artifact file name for an address. Deterministic, no per-request
    /// disambiguation: one identifier per address value.
    pub fn file_name(address: &str) -> String {
        format!("address_statement_{}.csv", address)
    }

    /// Serialize `rows` into the statement file for `address`
    pub fn generate(
        &self,
        rows: &[SummaryRow],
        address: &str,
    ) -> Result<ReportArtifact, PipelineError> {
        self.write(rows, address).map_err(PipelineError::Serialization)
    }

    fn write(&self, rows: &[SummaryRow], address: &str) -> anyhow::Result<ReportArtifact> {
        std::fs::create_dir_all(&self.reports_dir).with_context(|| {
            format!(
                "Failed to create reports directory {}",
                self.reports_dir.display()
            )
        })?;

        let file_name = Self::file_name(address);
        let path = self.reports_dir.join(&file_name);

        // File::create truncates: last write wins at the shared identifier.
        let file = File::create(&path)
            .with_context(|| format!("Failed to create report file {}", path.display()))?;

        let mut writer = csv::Writer::from_writer(file);
        for row in rows {
            writer.serialize(row).context("Failed to encode summary row")?;
        }
        writer.flush().context("Failed to flush report file")?;

        info!(file = %path.display(), rows = rows.len(), "Report artifact written");

        Ok(ReportArtifact {
            file_name,
            path,
            row_count: rows.len(),
        })
    }
}
