//! Fetch checkpoints
//!
//! Paginated fetches persist their cursor and accumulated rows every few
//! pages, so an interrupted run resumes from the last saved page instead of
//! refetching the whole history. Writes are tmp-then-rename.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::SourceRow;
use crate::Result;

/// Persisted state of an in-progress paginated fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchCheckpoint {
    /// Last-seen pagination cursor (timestamp or identifier)
    pub cursor: u64,
    /// Rows accumulated so far
    pub rows: Vec<SourceRow>,
}

impl FetchCheckpoint {
    /// Load a checkpoint, or start fresh if none exists.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<FetchCheckpoint>(&content) {
                Ok(checkpoint) => {
                    info!(
                        "Resuming fetch from checkpoint: cursor={}, {} rows",
                        checkpoint.cursor,
                        checkpoint.rows.len()
                    );
                    checkpoint
                }
                Err(e) => {
                    warn!("Ignoring unreadable checkpoint {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save atomically (tmp + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json)?;
        std::fs::rename(&tmp_path, path)?;

        info!(
            "Saved fetch checkpoint: cursor={}, {} rows to {}",
            self.cursor,
            self.rows.len(),
            path.display()
        );
        Ok(())
    }
}
