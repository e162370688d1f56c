//! Typed key-value snapshot storage for Fornello.
//!
//! Provides automatic JSON serialization over pluggable backends so the
//! ordering engine can persist small snapshots (the cart, mostly) without
//! caring where they land.
//!
//! # Example
//!
//! ```rust,ignore
//! use forno_kv::{Kv, kv_key};
//!
//! let kv = Kv::memory();
//! kv.set(&kv_key!("cart", session_id), &snapshot)?;
//! let restored: Option<CartSnapshot> = kv.get(&kv_key!("cart", session_id))?;
//! ```

mod error;
mod store;

pub use error::KvError;
pub use store::{Backend, FileBackend, Kv, MemoryBackend};

/// Build a namespaced storage key.
///
/// # Example
///
/// ```rust
/// use forno_kv::kv_key;
///
/// let key = kv_key!("cart", "session-42");
/// assert_eq!(key, "cart:session-42");
/// ```
#[macro_export]
macro_rules! kv_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
