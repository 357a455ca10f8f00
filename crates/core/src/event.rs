//! Balance events
//!
//! Every data source (fungible transfer logs, NFT transfer logs, derivative
//! trading records) reduces to the same capability: signed deltas applied to
//! a running per-address balance, in timestamp order. The variants carry the
//! source-specific fields; `deltas()` is the single reduction path.

use serde::{Deserialize, Serialize};

use crate::Address;

/// A balance-affecting event from one of the extraction sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BalanceEvent {
    /// Token transfer; zero address as `from` mints, as `to` burns.
    FungibleTransfer {
        from: Address,
        to: Address,
        /// Quantity in base units
        quantity: u128,
    },
    /// NFT transfer; each item counts as one balance unit.
    NftTransfer {
        from: Address,
        to: Address,
        count: u64,
    },
    /// Derivative trading activity; volume accrues to the account.
    DerivativePosition {
        account: Address,
        /// Cumulative traded volume in base units
        volume: u128,
    },
}

/// A balance event with its source timestamp (unix seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampedEvent {
    pub timestamp: u64,
    #[serde(flatten)]
    pub event: BalanceEvent,
}

impl BalanceEvent {
    /// Signed per-address deltas for this event.
    ///
    /// Transfers from/to the zero address emit only the minted/burned side.
    pub fn deltas(&self) -> Vec<(Address, i128)> {
        match self {
            BalanceEvent::FungibleTransfer { from, to, quantity } => {
                let mut out = Vec::with_capacity(2);
                if !from.is_zero() {
                    out.push((*from, -(*quantity as i128)));
                }
                if !to.is_zero() {
                    out.push((*to, *quantity as i128));
                }
                out
            }
            BalanceEvent::NftTransfer { from, to, count } => {
                let mut out = Vec::with_capacity(2);
                if !from.is_zero() {
                    out.push((*from, -(*count as i128)));
                }
                if !to.is_zero() {
                    out.push((*to, *count as i128));
                }
                out
            }
            BalanceEvent::DerivativePosition { account, volume } => {
                vec![(*account, *volume as i128)]
            }
        }
    }
}
