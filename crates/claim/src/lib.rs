//! Skydrop Claim Boundary
//!
//! Everything that crosses from the commitment core to the external claim
//! verifier: the published distribution artifact (root + allocations), the
//! `(address, amount, proof)` claim package with its client-side self-check,
//! and a mock claim contract used for end-to-end testing. The live contract
//! holding the claimed-bitmap stays external; this crate only emits exactly
//! what it expects.

mod artifact;
mod contract;
mod package;

pub use artifact::PublishedDistribution;
pub use contract::MockClaimContract;
pub use package::{prepare_claim, ClaimPackage};

use skydrop_core::Address;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimError {
    #[error("Address {0} has already claimed")]
    AlreadyClaimed(Address),

    #[error(transparent)]
    Merkle(#[from] skydrop_merkle::MerkleError),

    #[error("Failed to read distribution artifact: {0}")]
    ReadArtifact(std::io::Error),

    #[error("Failed to write distribution artifact: {0}")]
    WriteArtifact(std::io::Error),

    #[error("Failed to parse distribution artifact: {0}")]
    ParseArtifact(serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClaimError>;
