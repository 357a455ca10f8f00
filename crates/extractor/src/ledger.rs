//! Balance ledger
//!
//! Reduces timestamp-ordered balance events to the final per-address
//! balances. One reduction path for every source kind via
//! [`BalanceEvent::deltas`].

use std::collections::HashMap;

use tracing::{debug, warn};

use skydrop_core::{Address, EligibilityRecord, TimestampedEvent};

/// Running per-address balances, built from a frozen event history.
#[derive(Debug, Default)]
pub struct BalanceLedger {
    balances: HashMap<Address, u128>,
    /// First-seen order, so the emitted record list is deterministic
    order: Vec<Address>,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event history in timestamp order.
    ///
    /// Events are sorted by timestamp (stable, so same-timestamp events keep
    /// their source order) before application.
    pub fn from_events(mut events: Vec<TimestampedEvent>) -> Self {
        events.sort_by_key(|e| e.timestamp);

        let mut ledger = Self::new();
        for entry in &events {
            ledger.apply(entry);
        }
        debug!(
            "Ledger applied {} events over {} addresses",
            events.len(),
            ledger.order.len()
        );
        ledger
    }

    /// Apply a single event's deltas.
    pub fn apply(&mut self, entry: &TimestampedEvent) {
        for (address, delta) in entry.event.deltas() {
            let balance = match self.balances.get(&address) {
                Some(b) => *b,
                None => {
                    self.order.push(address);
                    0
                }
            };

            let updated = if delta >= 0 {
                balance.saturating_add(delta as u128)
            } else {
                let debit = delta.unsigned_abs();
                if debit > balance {
                    // Partial source history can debit below zero; clamp
                    // rather than poison the whole build
                    warn!(
                        "Balance underflow for {} at t={} ({} - {}), clamping to 0",
                        address, entry.timestamp, balance, debit
                    );
                    0
                } else {
                    balance - debit
                }
            };

            self.balances.insert(address, updated);
        }
    }

    /// Current balance for an address (0 if never seen).
    pub fn balance(&self, address: &Address) -> u128 {
        self.balances.get(address).copied().unwrap_or(0)
    }

    /// Number of addresses ever seen.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Eligibility records for all positive balances, in first-seen order.
    ///
    /// Zero balances (fully transferred out) are excluded here; the
    /// commitment builder would drop them anyway.
    pub fn records(&self) -> Vec<EligibilityRecord> {
        self.order
            .iter()
            .filter_map(|address| {
                let balance = self.balances[address];
                (balance > 0).then(|| EligibilityRecord::new(*address, balance))
            })
            .collect()
    }
}
