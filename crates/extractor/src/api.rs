//! Paginated indexer API source
//!
//! Fetches balance records from an indexer endpoint page by page, ordered by
//! a stable cursor (the last-seen timestamp). Transient transport failures
//! retry with exponential backoff up to a bounded attempt count; a malformed
//! payload is fatal immediately. Progress is checkpointed so an interrupted
//! fetch resumes mid-history.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use skydrop_core::{units, Address, BalanceEvent, TimestampedEvent};

use crate::checkpoint::FetchCheckpoint;
use crate::{ExtractorError, Result};

/// One balance record from an indexer feed.
///
/// Kept as raw strings until conversion so checkpoints persist exactly what
/// the source returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRow {
    pub address: String,
    pub timestamp: u64,
    /// Human decimal quantity, scaled at conversion time
    pub quantity: String,
}

impl SourceRow {
    /// Convert to a balance event (a credit to the address).
    pub fn to_event(&self, decimals: u32) -> Result<TimestampedEvent> {
        let to = Address::parse(&self.address)?;
        let quantity = units::parse_units(&self.quantity, decimals)?;
        Ok(TimestampedEvent {
            timestamp: self.timestamp,
            event: BalanceEvent::FungibleTransfer {
                from: Address::ZERO,
                to,
                quantity,
            },
        })
    }
}

/// Indexer source configuration
#[derive(Debug, Clone)]
pub struct ApiSourceConfig {
    /// Endpoint accepting `{cursor, limit}` queries
    pub endpoint: String,
    /// Rows per page
    pub page_size: usize,
    /// Attempts per page before giving up
    pub max_attempts: u32,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// First retry delay; doubles per attempt
    pub backoff_base: Duration,
    /// Where to persist fetch progress (None disables checkpointing)
    pub checkpoint_path: Option<PathBuf>,
    /// Checkpoint frequency in pages
    pub checkpoint_every_pages: u32,
}

impl Default for ApiSourceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            page_size: 1000,
            max_attempts: 5,
            request_timeout: Duration::from_secs(30),
            backoff_base: Duration::from_millis(500),
            checkpoint_path: None,
            checkpoint_every_pages: 10,
        }
    }
}

#[derive(Serialize)]
struct PageRequest {
    cursor: u64,
    limit: usize,
}

#[derive(Deserialize)]
struct PageResponse {
    records: Vec<SourceRow>,
}

/// Paginated indexer client
pub struct ApiSource {
    config: ApiSourceConfig,
    client: reqwest::Client,
}

impl ApiSource {
    pub fn new(config: ApiSourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ExtractorError::Http(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Fetch the complete history, resuming from the checkpoint if present.
    ///
    /// Pages until a short page signals the end of the feed. The cursor
    /// advances to the last row's timestamp after every page.
    pub async fn fetch_all(&self) -> Result<Vec<SourceRow>> {
        let mut state = match &self.config.checkpoint_path {
            Some(path) => FetchCheckpoint::load_or_default(path),
            None => FetchCheckpoint::default(),
        };

        let mut pages_since_save = 0u32;
        loop {
            let page = self.fetch_page(state.cursor).await?;
            let page_len = page.len();

            if let Some(last) = page.last() {
                state.cursor = last.timestamp;
            }
            state.rows.extend(page);
            pages_since_save += 1;

            debug!(
                "Fetched page of {} rows (total {}, cursor {})",
                page_len,
                state.rows.len(),
                state.cursor
            );

            if let Some(path) = &self.config.checkpoint_path {
                if pages_since_save >= self.config.checkpoint_every_pages {
                    state.save(path)?;
                    pages_since_save = 0;
                }
            }

            if page_len < self.config.page_size {
                break;
            }
        }

        if let Some(path) = &self.config.checkpoint_path {
            state.save(path)?;
        }

        info!(
            "Fetched {} rows from {}",
            state.rows.len(),
            self.config.endpoint
        );
        Ok(state.rows)
    }

    /// Fetch one page, retrying transient failures with backoff.
    async fn fetch_page(&self, cursor: u64) -> Result<Vec<SourceRow>> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.try_fetch_page(cursor).await {
                Ok(rows) => return Ok(rows),
                Err(e) if e.is_transient() => {
                    if attempt >= self.config.max_attempts {
                        return Err(ExtractorError::RetriesExhausted {
                            attempts: attempt,
                            reason: e.to_string(),
                        });
                    }
                    let delay = self.config.backoff_base * 2u32.saturating_pow(attempt - 1);
                    warn!(
                        "Transient fetch failure at cursor {} (attempt {}/{}): {}; retrying in {:?}",
                        cursor, attempt, self.config.max_attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_fetch_page(&self, cursor: u64) -> Result<Vec<SourceRow>> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&PageRequest {
                cursor,
                limit: self.config.page_size,
            })
            .send()
            .await
            .map_err(|e| ExtractorError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractorError::HttpStatus(status.as_u16()));
        }

        let page: PageResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                // Fatal: a payload we cannot parse is not worth retrying
                ExtractorError::MalformedPayload(e.to_string())
            } else {
                ExtractorError::Http(e.to_string())
            }
        })?;

        Ok(page.records)
    }
}
