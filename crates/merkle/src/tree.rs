//! Commitment builder and proof extraction

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use skydrop_core::{Address, EligibilityRecord};

use crate::leaf::{hash_pair, leaf_hash, Node};
use crate::proof::MerkleProof;
use crate::{MerkleError, Result};

/// How duplicate addresses in the input list are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Fail the build with `DuplicateRecord` (default)
    #[default]
    Reject,
    /// Later record replaces the earlier one at the same leaf position
    LastWriteWins,
}

/// The frozen commitment tree over an eligibility set.
///
/// Built once, immutable afterwards; proofs are read-only derivations. The
/// tree serializes so a build can be snapshotted and queried later.
///
/// Leaf position is insertion order of the (deduplicated) input list. Because
/// sibling pairs are byte-sorted before hashing, the root is invariant under
/// any reordering that preserves the positional pairing: swapping the two
/// records inside a pair, or whole sibling subtrees, at any level. A
/// reordering that changes which records pair up produces a different root;
/// full permutation invariance is not a property of this protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionTree {
    /// levels[0] = leaves, last level = [root]
    levels: Vec<Vec<Node>>,
    /// Committed records in leaf order
    records: Vec<EligibilityRecord>,
    /// Address -> leaf index
    index: HashMap<Address, usize>,
}

impl DistributionTree {
    /// Build the commitment over `records`.
    ///
    /// Zero-amount records are dropped (with a warning) before leaf
    /// construction. Duplicate addresses are handled per `policy`. An empty
    /// effective set fails with `EmptySet`.
    pub fn build(records: &[EligibilityRecord], policy: DedupPolicy) -> Result<Self> {
        let mut committed: Vec<EligibilityRecord> = Vec::with_capacity(records.len());
        let mut index: HashMap<Address, usize> = HashMap::with_capacity(records.len());

        for record in records {
            if record.amount == 0 {
                warn!("Dropping zero-amount record for {}", record.address);
                continue;
            }
            match index.get(&record.address) {
                Some(&pos) => match policy {
                    DedupPolicy::Reject => {
                        return Err(MerkleError::DuplicateRecord(record.address));
                    }
                    DedupPolicy::LastWriteWins => {
                        debug!(
                            "Replacing amount for {} at leaf {} ({} -> {})",
                            record.address, pos, committed[pos].amount, record.amount
                        );
                        committed[pos] = *record;
                    }
                },
                None => {
                    index.insert(record.address, committed.len());
                    committed.push(*record);
                }
            }
        }

        if committed.is_empty() {
            return Err(MerkleError::EmptySet);
        }

        let mut current: Vec<Node> = committed
            .iter()
            .map(|r| leaf_hash(&r.address, r.amount))
            .collect();

        let mut levels = Vec::new();
        while current.len() > 1 {
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for chunk in current.chunks(2) {
                match chunk {
                    [left, right] => next.push(hash_pair(left, right)),
                    // Odd node carries up unchanged
                    [single] => next.push(*single),
                    _ => unreachable!("chunks(2) yields 1- or 2-element slices"),
                }
            }
            levels.push(current);
            current = next;
        }
        levels.push(current);

        debug!(
            "Built commitment over {} records ({} levels)",
            committed.len(),
            levels.len()
        );

        Ok(Self {
            levels,
            records: committed,
            index,
        })
    }

    /// The 32-byte root commitment.
    pub fn root(&self) -> Node {
        self.levels.last().expect("tree is never empty")[0]
    }

    /// Number of committed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// A built tree always holds at least one record.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Committed records in leaf order.
    pub fn records(&self) -> &[EligibilityRecord] {
        &self.records
    }

    /// Committed amount for `address`, if eligible.
    pub fn allocation(&self, address: &Address) -> Option<u128> {
        self.index.get(address).map(|&i| self.records[i].amount)
    }

    /// Sibling path from the address's leaf to the root.
    ///
    /// At a level where the node has no sibling (odd carry), no entry is
    /// added. Unknown addresses fail with `NotEligible`.
    pub fn proof(&self, address: &Address) -> Result<MerkleProof> {
        let mut idx = *self
            .index
            .get(address)
            .ok_or(MerkleError::NotEligible(*address))?;

        let mut nodes = Vec::new();
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = idx ^ 1;
            if sibling < level.len() {
                nodes.push(level[sibling]);
            }
            idx /= 2;
        }

        Ok(MerkleProof::new(nodes))
    }
}
