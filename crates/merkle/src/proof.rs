//! Membership proofs and standalone verification

use serde::{Deserialize, Serialize};
use skydrop_core::Address;

use crate::leaf::{hash_pair, leaf_hash, Node};

/// Ordered sibling path from a leaf to the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MerkleProof {
    nodes: Vec<Node>,
}

impl MerkleProof {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Hex rendering for display and JSON artifacts.
    pub fn to_hex(&self) -> Vec<String> {
        self.nodes.iter().map(|n| format!("0x{}", hex::encode(n))).collect()
    }

    /// Parse a proof from hex node strings (inverse of [`Self::to_hex`]).
    pub fn from_hex<S: AsRef<str>>(nodes: &[S]) -> Option<Self> {
        let mut out = Vec::with_capacity(nodes.len());
        for s in nodes {
            let s = s.as_ref();
            let cleaned = s.strip_prefix("0x").unwrap_or(s);
            let mut node = [0u8; 32];
            hex::decode_to_slice(cleaned, &mut node).ok()?;
            out.push(node);
        }
        Some(Self { nodes: out })
    }
}

/// Check a membership proof against a published root.
///
/// Recomputes the leaf from `(address, amount)` and folds the sibling path
/// with the same sorted-pair rule the builder uses. Shares no state with the
/// builder; this is the client-side self-check and the model of the external
/// verifier's logic.
pub fn verify(root: &Node, address: &Address, amount: u128, proof: &MerkleProof) -> bool {
    let candidate = proof
        .nodes
        .iter()
        .fold(leaf_hash(address, amount), |acc, node| hash_pair(&acc, node));
    candidate == *root
}
