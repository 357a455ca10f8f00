//! Claim packages
//!
//! The `(address, amount, proof)` triple the external verifier expects,
//! self-checked against the published root before it leaves this process. A
//! failed self-check is a hard error: it means a stale root, corrupted
//! data, or a protocol mismatch, and submitting it would only burn gas.

use serde::{Deserialize, Serialize};
use tracing::debug;

use skydrop_core::Address;
use skydrop_merkle::{verify, DistributionTree, MerkleError, MerkleProof, Node};

use crate::Result;

/// Exactly what the claim verifier consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPackage {
    pub address: Address,
    /// Committed amount in base units
    pub amount: u128,
    pub proof: MerkleProof,
}

impl ClaimPackage {
    /// JSON-friendly rendering with hex proof nodes, for handing to wallet
    /// tooling.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "address": self.address.to_checksum(),
            "amount": self.amount.to_string(),
            "proof": self.proof.to_hex(),
        })
    }
}

/// Derive and self-check a claim package for `address`.
///
/// The proof comes from the frozen tree; verification runs against
/// `published_root` (not the tree's own root) so a drifted or stale
/// publication is caught here rather than on-chain.
pub fn prepare_claim(
    tree: &DistributionTree,
    published_root: &Node,
    address: &Address,
) -> Result<ClaimPackage> {
    let proof = tree.proof(address)?;
    let amount = tree
        .allocation(address)
        .ok_or(MerkleError::NotEligible(*address))?;

    if !verify(published_root, address, amount, &proof) {
        return Err(MerkleError::ProofVerification { address: *address }.into());
    }

    debug!(
        "Prepared claim for {} ({} base units, {} proof nodes)",
        address,
        amount,
        proof.len()
    );

    Ok(ClaimPackage {
        address: *address,
        amount,
        proof,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClaimError;
    use skydrop_core::EligibilityRecord;
    use skydrop_merkle::DedupPolicy;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn sample_tree() -> DistributionTree {
        DistributionTree::build(
            &[
                EligibilityRecord::new(addr(1), 100),
                EligibilityRecord::new(addr(2), 200),
                EligibilityRecord::new(addr(3), 300),
            ],
            DedupPolicy::Reject,
        )
        .unwrap()
    }

    #[test]
    fn test_prepare_claim_self_checks() {
        let tree = sample_tree();
        let package = prepare_claim(&tree, &tree.root(), &addr(2)).unwrap();

        assert_eq!(package.amount, 200);
        assert!(verify(&tree.root(), &package.address, package.amount, &package.proof));
    }

    #[test]
    fn test_prepare_claim_not_eligible() {
        let tree = sample_tree();
        let result = prepare_claim(&tree, &tree.root(), &addr(9));
        assert!(matches!(
            result,
            Err(ClaimError::Merkle(MerkleError::NotEligible(_)))
        ));
    }

    #[test]
    fn test_prepare_claim_stale_root_is_hard_error() {
        let tree = sample_tree();
        let stale_root = [0xFF; 32];
        let result = prepare_claim(&tree, &stale_root, &addr(1));
        assert!(matches!(
            result,
            Err(ClaimError::Merkle(MerkleError::ProofVerification { .. }))
        ));
    }

    #[test]
    fn test_package_json_shape() {
        let tree = sample_tree();
        let package = prepare_claim(&tree, &tree.root(), &addr(1)).unwrap();
        let json = package.to_json();

        assert_eq!(
            json["address"],
            "0x0101010101010101010101010101010101010101"
        );
        assert_eq!(json["amount"], "100");
        assert!(json["proof"].as_array().unwrap().len() >= 1);
    }
}
