//! Per-error retry policy.
//!
//! One table decides what each failure does to its unit of work, instead
//! of retry/skip decisions scattered through control flow.

use ferry_types::FerryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// Rotate the source endpoint and retry the same unit, up to the
    /// configured ceiling.
    RetryWithRotation,
    /// Skip the unit without retrying; the run continues.
    SkipUnit,
    /// Terminal for the unit; retrying would repeat the failure.
    FailUnit,
}

pub fn disposition(error: &FerryError) -> ErrorDisposition {
    match error {
        FerryError::MissingDestination { .. } | FerryError::InsufficientFunds { .. } => {
            ErrorDisposition::SkipUnit
        }
        FerryError::Submission(_) | FerryError::ReceiptTimeout { .. } => {
            ErrorDisposition::RetryWithRotation
        }
        FerryError::TransactionReverted { .. } => ErrorDisposition::FailUnit,
        _ => ErrorDisposition::FailUnit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_types::NetworkId;

    #[test]
    fn test_policy_table() {
        assert_eq!(
            disposition(&FerryError::MissingDestination {
                wallet: "Wallet1".into(),
                network: NetworkId::Babylon,
            }),
            ErrorDisposition::SkipUnit
        );
        assert_eq!(
            disposition(&FerryError::InsufficientFunds {
                asset: "USDC".into(),
                required: "0.01".into(),
                available: "0".into(),
            }),
            ErrorDisposition::SkipUnit
        );
        assert_eq!(
            disposition(&FerryError::Submission("nonce too low".into())),
            ErrorDisposition::RetryWithRotation
        );
        assert_eq!(
            disposition(&FerryError::ReceiptTimeout { attempts: 30 }),
            ErrorDisposition::RetryWithRotation
        );
        assert_eq!(
            disposition(&FerryError::TransactionReverted {
                tx_hash: "0xabc".into(),
            }),
            ErrorDisposition::FailUnit
        );
        assert_eq!(
            disposition(&FerryError::Config("bad".into())),
            ErrorDisposition::FailUnit
        );
    }
}
