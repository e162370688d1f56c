//! Order composition and pricing engine for Fornello.
//!
//! This crate provides the core of a restaurant ordering application:
//!
//! - **Catalog**: read-only items, variation groups, variations, borders
//! - **Combo**: half-and-half flavor combination
//! - **Selection**: the dialog-shaped state machine configuring one item
//! - **Cart**: composition store with merge semantics and durable snapshots
//! - **Pricing**: the one calculator every money surface goes through
//! - **Checkout**: order finalization against external collaborators
//!
//! # Example
//!
//! ```rust,ignore
//! use forno_ordering::prelude::*;
//!
//! let view = CatalogView::load(&catalog_source).await?;
//! let item = view.item(&item_id).cloned().expect("item on menu");
//!
//! let mut session = SelectionSession::new(item, &view);
//! session.increase(&size_group, &large);
//! let line = session.confirm(&view)?;
//!
//! let mut cart = CartStore::new(kv);
//! cart.add_line(line, 1, &view)?;
//! println!("subtotal: {}", cart.subtotal());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod combo;
pub mod pricing;
pub mod selection;

pub use error::OrderingError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::OrderingError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        Border, CatalogItem, CatalogSource, CatalogView, GroupStatus, Variation, VariationGroup,
    };

    // Combo
    pub use crate::combo::{CombinedItem, Combination, FlavorRef};

    // Selection
    pub use crate::selection::{IncreaseOutcome, SelectionPhase, SelectionSession};

    // Cart
    pub use crate::cart::{
        CartLine, CartSnapshot, CartStore, Coupon, CouponValue, HalfSelection, LineKind,
        LinePatch, SelectedBorder, SelectedGroup, SelectedVariation,
    };

    // Pricing
    pub use crate::pricing::{cart_totals, line_pricing, line_total, CartTotals, LinePricing};

    // Checkout
    pub use crate::checkout::{
        Address, FinalizeRequest, NotificationSink, Order, OrderFinalizer, OrderLine,
        OrderRepository, OrderStatus, OrderVariation, PaymentMethod,
    };
}
