//! CSV transfer-dump source
//!
//! Column layout: `timestamp,from,to,quantity` with a header line. Quantities
//! are human decimal strings, scaled by the configured decimals. Under the
//! lenient policy a malformed row is excluded and logged; under strict it
//! fails the whole ingest.

use std::path::Path;

use tracing::warn;

use skydrop_core::{units, Address, BalanceEvent, TimestampedEvent};

use crate::{ExtractorError, Result};

/// Read and parse a transfer dump from disk.
pub fn read_transfer_dump(path: &Path, decimals: u32, strict: bool) -> Result<Vec<TimestampedEvent>> {
    let content = std::fs::read_to_string(path)?;
    parse_transfer_csv(&content, decimals, strict)
}

/// Parse transfer-dump CSV content.
pub fn parse_transfer_csv(content: &str, decimals: u32, strict: bool) -> Result<Vec<TimestampedEvent>> {
    let mut events = Vec::new();
    let mut dropped = 0usize;

    for (line_idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        // Header line
        if line_idx == 0 && trimmed.starts_with("timestamp") {
            continue;
        }

        match parse_row(trimmed, decimals) {
            Ok(event) => events.push(event),
            Err(reason) => {
                if strict {
                    return Err(ExtractorError::MalformedRow {
                        line: line_idx + 1,
                        reason,
                    });
                }
                warn!("Skipping malformed row at line {}: {}", line_idx + 1, reason);
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        warn!("Dropped {} malformed rows from transfer dump", dropped);
    }

    Ok(events)
}

fn parse_row(row: &str, decimals: u32) -> std::result::Result<TimestampedEvent, String> {
    let columns: Vec<&str> = row.split(',').map(str::trim).collect();
    if columns.len() != 4 {
        return Err(format!("expected 4 columns, got {}", columns.len()));
    }

    let timestamp: u64 = columns[0]
        .parse()
        .map_err(|_| format!("bad timestamp {:?}", columns[0]))?;
    let from = Address::parse_any(columns[1]).map_err(|e| e.to_string())?;
    let to = Address::parse_any(columns[2]).map_err(|e| e.to_string())?;
    let quantity = units::parse_units(columns[3], decimals).map_err(|e| e.to_string())?;

    Ok(TimestampedEvent {
        timestamp,
        event: BalanceEvent::FungibleTransfer { from, to, quantity },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR_A: &str = "0x1111111111111111111111111111111111111111";
    const ADDR_B: &str = "0x2222222222222222222222222222222222222222";
    const ZERO: &str = "0x0000000000000000000000000000000000000000";

    #[test]
    fn test_parse_basic_dump() {
        let content = format!(
            "timestamp,from,to,quantity\n1000,{ZERO},{ADDR_A},100\n1001,{ADDR_A},{ADDR_B},25.5\n"
        );
        let events = parse_transfer_csv(&content, 6, true).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].timestamp, 1000);
        match &events[1].event {
            BalanceEvent::FungibleTransfer { quantity, .. } => assert_eq!(*quantity, 25_500_000),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_blank_lines_skipped() {
        let content = format!("timestamp,from,to,quantity\n\n1000,{ZERO},{ADDR_A},1\n\n");
        let events = parse_transfer_csv(&content, 0, true).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_missing_header_tolerated() {
        let content = format!("1000,{ZERO},{ADDR_A},1\n");
        let events = parse_transfer_csv(&content, 0, true).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_strict_fails_on_malformed_row() {
        let content = format!("timestamp,from,to,quantity\n1000,{ZERO},{ADDR_A}\n");
        let result = parse_transfer_csv(&content, 0, true);
        assert!(matches!(
            result,
            Err(ExtractorError::MalformedRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_lenient_skips_malformed_row() {
        let content = format!(
            "timestamp,from,to,quantity\nnot-a-timestamp,{ZERO},{ADDR_A},1\n1000,{ZERO},{ADDR_B},2\n"
        );
        let events = parse_transfer_csv(&content, 0, false).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp, 1000);
    }

    #[test]
    fn test_bad_quantity_reported() {
        let content = format!("timestamp,from,to,quantity\n1000,{ZERO},{ADDR_A},12.3.4\n");
        assert!(parse_transfer_csv(&content, 6, true).is_err());
    }
}
