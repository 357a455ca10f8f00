use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Address checksum mismatch: {0}")]
    ChecksumMismatch(String),

    #[error("Zero address not allowed")]
    ZeroAddress,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    #[error("Amount {value} has more than {decimals} fractional digits")]
    PrecisionLoss { value: String, decimals: u32 },
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_address() {
        let err = CoreError::InvalidAddress("0x1234".to_string());
        assert_eq!(err.to_string(), "Invalid address: 0x1234");
    }

    #[test]
    fn test_error_display_checksum_mismatch() {
        let err = CoreError::ChecksumMismatch("0xAbCd".to_string());
        assert_eq!(err.to_string(), "Address checksum mismatch: 0xAbCd");
    }

    #[test]
    fn test_error_display_zero_address() {
        let err = CoreError::ZeroAddress;
        assert_eq!(err.to_string(), "Zero address not allowed");
    }

    #[test]
    fn test_error_display_invalid_amount() {
        let err = CoreError::InvalidAmount("1.2.3".to_string());
        assert_eq!(err.to_string(), "Invalid amount: 1.2.3");
    }

    #[test]
    fn test_error_display_precision_loss() {
        let err = CoreError::PrecisionLoss {
            value: "0.0000001".to_string(),
            decimals: 6,
        };
        assert_eq!(
            err.to_string(),
            "Amount 0.0000001 has more than 6 fractional digits"
        );
    }

    #[test]
    fn test_result_type_ok() {
        let result: Result<u128> = Ok(42);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), 42);
    }
}
