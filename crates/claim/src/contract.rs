//! Mock claim contract
//!
//! In-process stand-in for the external claim verifier: holds the published
//! root and the claimed set, verifies each submitted package the way the
//! on-chain check does, and enforces claim-once. Used by the CLI's mock mode
//! and the integration tests; the live contract is out of scope.

use std::collections::HashSet;

use tracing::info;

use skydrop_core::Address;
use skydrop_merkle::{verify, MerkleError, Node};

use crate::{ClaimError, ClaimPackage, Result};

/// Claimed-bitmap + proof verification, in memory.
#[derive(Debug)]
pub struct MockClaimContract {
    root: Node,
    claimed: HashSet<Address>,
}

impl MockClaimContract {
    /// Deploy with a published root.
    pub fn new(root: Node) -> Self {
        Self {
            root,
            claimed: HashSet::new(),
        }
    }

    /// The root this contract verifies against.
    pub fn root(&self) -> Node {
        self.root
    }

    /// Whether an address has exercised its claim.
    pub fn has_claimed(&self, address: &Address) -> bool {
        self.claimed.contains(address)
    }

    /// Number of exercised claims.
    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    /// Submit a claim: verify the proof, enforce claim-once, mark claimed.
    pub fn submit(&mut self, package: &ClaimPackage) -> Result<()> {
        if self.claimed.contains(&package.address) {
            return Err(ClaimError::AlreadyClaimed(package.address));
        }

        if !verify(&self.root, &package.address, package.amount, &package.proof) {
            return Err(MerkleError::ProofVerification {
                address: package.address,
            }
            .into());
        }

        self.claimed.insert(package.address);
        info!(
            "Claim accepted for {} ({} base units)",
            package.address, package.amount
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prepare_claim;
    use skydrop_core::EligibilityRecord;
    use skydrop_merkle::{DedupPolicy, DistributionTree};

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn sample_tree() -> DistributionTree {
        DistributionTree::build(
            &[
                EligibilityRecord::new(addr(1), 100),
                EligibilityRecord::new(addr(2), 200),
            ],
            DedupPolicy::Reject,
        )
        .unwrap()
    }

    #[test]
    fn test_claim_once_succeeds() {
        let tree = sample_tree();
        let mut contract = MockClaimContract::new(tree.root());

        let package = prepare_claim(&tree, &contract.root(), &addr(1)).unwrap();
        contract.submit(&package).unwrap();

        assert!(contract.has_claimed(&addr(1)));
        assert!(!contract.has_claimed(&addr(2)));
        assert_eq!(contract.claimed_count(), 1);
    }

    #[test]
    fn test_second_claim_rejected() {
        let tree = sample_tree();
        let mut contract = MockClaimContract::new(tree.root());

        let package = prepare_claim(&tree, &contract.root(), &addr(1)).unwrap();
        contract.submit(&package).unwrap();

        let result = contract.submit(&package);
        assert!(matches!(result, Err(ClaimError::AlreadyClaimed(a)) if a == addr(1)));
        assert_eq!(contract.claimed_count(), 1);
    }

    #[test]
    fn test_tampered_amount_rejected() {
        let tree = sample_tree();
        let mut contract = MockClaimContract::new(tree.root());

        let mut package = prepare_claim(&tree, &contract.root(), &addr(1)).unwrap();
        package.amount += 1;

        let result = contract.submit(&package);
        assert!(matches!(
            result,
            Err(ClaimError::Merkle(MerkleError::ProofVerification { .. }))
        ));
        assert!(!contract.has_claimed(&addr(1)));
    }

    #[test]
    fn test_claim_against_wrong_root_rejected() {
        let tree = sample_tree();
        let mut contract = MockClaimContract::new([0xEE; 32]);

        // Bypass prepare_claim's self-check to model a stale client
        let package = ClaimPackage {
            address: addr(1),
            amount: 100,
            proof: tree.proof(&addr(1)).unwrap(),
        };
        assert!(contract.submit(&package).is_err());
    }
}
