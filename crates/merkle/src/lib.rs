//! Skydrop Merkle Commitment
//!
//! Binary hash tree over eligibility records and the membership-proof
//! protocol checked by the external claim verifier.
//!
//! The commitment is built once over the frozen `(address, amount)` list and
//! published as a single 32-byte root. Per-address proofs are derived on
//! demand from the immutable tree; `verify` folds a proof back to a candidate
//! root with no access to the builder, mirroring the on-chain check.
//!
//! Protocol conventions (pinned, not configurable):
//! - leaf = keccak256(address(20) || amount as 32-byte big-endian)
//! - internal node = keccak256(min(a, b) || max(a, b))
//! - the leaf list is NEVER sorted; leaf position is insertion order
//! - an unpaired node at any level is promoted unchanged

mod leaf;
mod proof;
mod tree;

pub use leaf::{hash_pair, leaf_hash, Node};
pub use proof::{verify, MerkleProof};
pub use tree::{DedupPolicy, DistributionTree};

use skydrop_core::Address;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MerkleError {
    #[error("Cannot build a commitment over an empty record set")]
    EmptySet,

    #[error("Duplicate record for address {0}")]
    DuplicateRecord(Address),

    #[error("Address {0} is not in the eligibility set")]
    NotEligible(Address),

    #[error("Proof for address {address} does not verify against the root")]
    ProofVerification { address: Address },
}

pub type Result<T> = std::result::Result<T, MerkleError>;
