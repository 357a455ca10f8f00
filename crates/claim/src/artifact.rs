//! Published distribution artifact
//!
//! The immutable output of a build: the root commitment plus the allocation
//! list, written as JSON and consumed as claim-contract configuration and by
//! proof-serving tooling. Published once; never mutated.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use skydrop_core::{Address, EligibilityRecord};
use skydrop_merkle::{DistributionTree, Node};

use crate::{ClaimError, Result};

/// Root + allocations, as published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedDistribution {
    /// Hex-encoded 32-byte root commitment
    pub root: String,
    /// Token decimals the amounts were scaled with
    pub decimals: u32,
    /// Committed allocations in leaf order
    pub allocations: Vec<EligibilityRecord>,
}

impl PublishedDistribution {
    /// Capture a built tree as its publishable artifact.
    pub fn from_tree(tree: &DistributionTree, decimals: u32) -> Self {
        Self {
            root: format!("0x{}", hex::encode(tree.root())),
            decimals,
            allocations: tree.records().to_vec(),
        }
    }

    /// The root as raw bytes.
    pub fn root_bytes(&self) -> Option<Node> {
        let cleaned = self.root.strip_prefix("0x").unwrap_or(&self.root);
        let mut node = [0u8; 32];
        hex::decode_to_slice(cleaned, &mut node).ok()?;
        Some(node)
    }

    /// Committed amount for an address, if present.
    pub fn allocation(&self, address: &Address) -> Option<u128> {
        self.allocations
            .iter()
            .find(|r| r.address == *address)
            .map(|r| r.amount)
    }

    /// Total committed amount across all allocations.
    pub fn total(&self) -> u128 {
        self.allocations.iter().map(|r| r.amount).sum()
    }

    /// Write as pretty JSON (tmp + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(ClaimError::WriteArtifact)?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(ClaimError::ParseArtifact)?;
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json).map_err(ClaimError::WriteArtifact)?;
        std::fs::rename(&tmp_path, path).map_err(ClaimError::WriteArtifact)?;
        info!(
            "Published distribution ({} allocations, root {}) to {}",
            self.allocations.len(),
            self.root,
            path.display()
        );
        Ok(())
    }

    /// Load a published artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ClaimError::ReadArtifact)?;
        serde_json::from_str(&content).map_err(ClaimError::ParseArtifact)
    }
}
