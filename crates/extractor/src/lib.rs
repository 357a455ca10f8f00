//! Skydrop Eligibility Extractor
//!
//! Turns raw source data (CSV transfer dumps and paginated indexer APIs)
//! into the frozen `(address, amount)` list the commitment is built over.
//!
//! Network sources paginate on a stable cursor, retry transient failures
//! with backoff, and checkpoint progress to disk so an interrupted fetch
//! resumes instead of starting over. Malformed payloads are fatal, never
//! retried: the build must not proceed on questionable source data.

mod api;
mod checkpoint;
mod csv;
mod ledger;

pub use api::{ApiSource, ApiSourceConfig, SourceRow};
pub use checkpoint::FetchCheckpoint;
pub use csv::{parse_transfer_csv, read_transfer_dump};
pub use ledger::BalanceLedger;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Fetch failed after {attempts} attempts: {reason}")]
    RetriesExhausted { attempts: u32, reason: String },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] std::io::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] skydrop_core::CoreError),
}

impl ExtractorError {
    /// Transient failures are retried with backoff; everything else is fatal.
    pub fn is_transient(&self) -> bool {
        matches!(self, ExtractorError::Http(_) | ExtractorError::HttpStatus(_))
    }
}

pub type Result<T> = std::result::Result<T, ExtractorError>;
