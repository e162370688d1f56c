//! Ordering error types.

use thiserror::Error;

/// Errors that can occur while composing and pricing orders.
#[derive(Error, Debug)]
pub enum OrderingError {
    /// Catalog item not found.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Border not offered by the item.
    #[error("Border not found on item: {0}")]
    BorderNotFound(String),

    /// Border selected on an item that does not take one.
    #[error("Item does not accept a border: {0}")]
    BorderNotAllowed(String),

    /// A variation group is outside its selection bounds.
    #[error("Selection invalid: {message}")]
    GroupSelection { message: String },

    /// A per-half choice is still pending; the increment was never committed.
    #[error("Half choice pending for the current increment")]
    HalfChoicePending,

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Line index out of range.
    #[error("No cart line at index {0}")]
    LineIndexOutOfRange(usize),

    /// An order must carry at least one line.
    #[error("Order has no lines")]
    EmptyOrder,

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Order persistence failed; the caller should retry the submission.
    #[error("Order persistence failed: {0}")]
    Persistence(String),

    /// Cart snapshot storage failed.
    #[error("Snapshot storage error: {0}")]
    Snapshot(#[from] forno_kv::KvError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
