//! # Session Error Types
//!
//! Error types for the stateful cart layer.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Session Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Contract      │  │   Snapshot      │  │     Checkout            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidEnvelope│  │  SnapshotIo     │  │  Cart (empty cart)      │ │
//! │  │  UnknownAction  │  │  SnapshotFormat │  │  Customer (validation)  │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Not here: a malformed payload for a KNOWN action. That is a           │
//! │  validation rejection, reported through Outcome::Rejected.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session error type.
///
/// ## Design Principles
/// - Contract violations (unknown action tags) are errors, loudly
/// - Payload problems are not errors; see `Outcome::Rejected`
#[derive(Debug, Error)]
pub enum SessionError {
    /// The action envelope itself is not `{ "type": string, "payload": ... }`.
    #[error("Invalid action envelope: {0}")]
    InvalidEnvelope(String),

    /// The envelope names an action the cart doesn't define.
    #[error("Unknown cart action: {0}")]
    UnknownAction(String),

    /// Reading or writing the snapshot file failed.
    #[error("Snapshot I/O failed: {0}")]
    SnapshotIo(#[from] std::io::Error),

    /// The snapshot file is not a valid cart.
    #[error("Invalid snapshot: {0}")]
    SnapshotFormat(#[from] serde_json::Error),
}

/// Errors while packaging an order from the cart.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart can't be ordered (e.g. it is empty).
    #[error(transparent)]
    Cart(#[from] CoreError),

    /// Guest contact details are incomplete.
    #[error("Invalid customer details: {0}")]
    Customer(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SessionError::UnknownAction("APPLY_COUPON".to_string());
        assert_eq!(err.to_string(), "Unknown cart action: APPLY_COUPON");

        let err = CheckoutError::from(CoreError::EmptyCart);
        assert_eq!(err.to_string(), "Cart is empty");
    }
}
