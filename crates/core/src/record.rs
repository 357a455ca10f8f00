//! Eligibility records

use serde::{Deserialize, Serialize};

use crate::Address;

/// One address's entitlement in a distribution.
///
/// Addresses are unique within a commitment; the amount is in integer base
/// units (post decimal scaling) and must be positive to be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRecord {
    /// Claiming address
    pub address: Address,
    /// Entitlement in base units
    pub amount: u128,
}

impl EligibilityRecord {
    pub fn new(address: Address, amount: u128) -> Self {
        Self { address, amount }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serde_roundtrip() {
        let record = EligibilityRecord::new(Address::from_bytes([0xAB; 20]), 1_000_000);
        let json = serde_json::to_string(&record).unwrap();
        let parsed: EligibilityRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
