//! Checkout module.
//!
//! Contains order records, the collaborator seams and the finalizer that
//! re-derives every price before anything is persisted.

mod finalize;
mod order;

pub use finalize::{FinalizeRequest, NotificationSink, OrderFinalizer, OrderRepository};
pub use order::{Address, Order, OrderLine, OrderStatus, OrderVariation, PaymentMethod};
