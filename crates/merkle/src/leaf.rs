//! Leaf and pair hashing
//!
//! The byte layout here is the protocol: the claim verifier recomputes the
//! leaf from `(claimer, amount)` with exactly this packing. Any deviation in
//! width, byte order, or concatenation produces proofs that fail on-chain.

use sha3::{Digest, Keccak256};
use skydrop_core::Address;

/// A 32-byte tree node value.
pub type Node = [u8; 32];

/// Amount as a 32-byte big-endian unsigned integer (zero-extended u128).
fn amount_be32(amount: u128) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[16..].copy_from_slice(&amount.to_be_bytes());
    out
}

/// Hash one eligibility record into its leaf.
///
/// `keccak256(address(20 bytes) || amount(32 bytes big-endian))`, no
/// separators, no length prefix.
pub fn leaf_hash(address: &Address, amount: u128) -> Node {
    let digest = Keccak256::new()
        .chain_update(address.as_bytes())
        .chain_update(amount_be32(amount))
        .finalize();
    digest.into()
}

/// Hash a sibling pair into its parent.
///
/// Children are byte-sorted before concatenation, so a verifier can fold a
/// proof without tracking left/right position.
pub fn hash_pair(a: &Node, b: &Node) -> Node {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let digest = Keccak256::new().chain_update(lo).chain_update(hi).finalize();
    digest.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn test_amount_be32_layout() {
        let bytes = amount_be32(1);
        assert_eq!(bytes[31], 1);
        assert_eq!(&bytes[..31], &[0u8; 31]);

        let bytes = amount_be32(0x0102);
        assert_eq!(bytes[30], 1);
        assert_eq!(bytes[31], 2);
    }

    #[test]
    fn test_leaf_hash_matches_manual_packing() {
        let address = addr(0xAA);
        let amount = 100 * 10u128.pow(18);

        let mut packed = Vec::with_capacity(52);
        packed.extend_from_slice(address.as_bytes());
        packed.extend_from_slice(&amount_be32(amount));
        assert_eq!(packed.len(), 52);

        let expected: Node = Keccak256::digest(&packed).into();
        assert_eq!(leaf_hash(&address, amount), expected);
    }

    #[test]
    fn test_leaf_hash_known_vector() {
        // keccak256(0x11 * 20 || be32(1)) - pins the exact byte layout
        let leaf = leaf_hash(&addr(0x11), 1);
        let mut packed = [0u8; 52];
        packed[..20].copy_from_slice(&[0x11; 20]);
        packed[51] = 1;
        let expected: Node = Keccak256::digest(packed).into();
        assert_eq!(leaf, expected);
    }

    #[test]
    fn test_leaf_distinct_per_record() {
        assert_ne!(leaf_hash(&addr(1), 100), leaf_hash(&addr(2), 100));
        assert_ne!(leaf_hash(&addr(1), 100), leaf_hash(&addr(1), 101));
    }

    #[test]
    fn test_hash_pair_is_order_independent() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_eq!(hash_pair(&a, &b), hash_pair(&b, &a));
    }

    #[test]
    fn test_hash_pair_sorts_by_bytes() {
        let lo = [1u8; 32];
        let hi = [2u8; 32];
        let expected: Node = Keccak256::new()
            .chain_update(lo)
            .chain_update(hi)
            .finalize()
            .into();
        assert_eq!(hash_pair(&hi, &lo), expected);
    }

    #[test]
    fn test_hash_pair_equal_children() {
        let a = [7u8; 32];
        let expected: Node = Keccak256::new().chain_update(a).chain_update(a).finalize().into();
        assert_eq!(hash_pair(&a, &a), expected);
    }
}
