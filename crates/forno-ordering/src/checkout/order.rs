//! Order types.

use crate::cart::{HalfSelection, SelectedBorder};
use crate::combo::Combination;
use crate::ids::{ItemId, OrderId, VariationId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, awaiting the kitchen.
    #[default]
    Pending,
    /// Order accepted by the restaurant.
    Confirmed,
    /// Order being prepared.
    Preparing,
    /// Order left for delivery.
    OutForDelivery,
    /// Order delivered or picked up.
    Completed,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::OutForDelivery => "Out for delivery",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Check if the order can still be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Preparing
        )
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cash,
    /// Card on delivery.
    Card,
    /// Paid online at submission.
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Online => "online",
        }
    }
}

/// A delivery address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub zip: String,
    /// Landmark or note for the courier.
    pub reference: Option<String>,
}

impl Address {
    /// Create a new address.
    pub fn new(
        street: impl Into<String>,
        number: impl Into<String>,
        neighborhood: impl Into<String>,
        city: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            number: number.into(),
            complement: None,
            neighborhood: neighborhood.into(),
            city: city.into(),
            zip: zip.into(),
            reference: None,
        }
    }
}

/// An immutable order record.
///
/// Every line is a fully resolved snapshot; later catalog edits never
/// change what was sold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier, assigned by the repository.
    pub id: OrderId,
    /// Human-readable order number.
    pub order_number: String,
    /// Order status.
    pub status: OrderStatus,
    /// Payment method.
    pub payment: PaymentMethod,
    /// Delivery address.
    pub address: Address,
    /// Resolved lines.
    pub lines: Vec<OrderLine>,
    /// Sum of line subtotals, before discount.
    pub subtotal: Money,
    /// Order-level discount.
    pub discount_total: Money,
    /// Delivery fee charged.
    pub freight_total: Money,
    /// Grand total charged.
    pub grand_total: Money,
    /// Order currency.
    pub currency: Currency,
    /// Coupon code applied, for audit.
    pub coupon_code: Option<String>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
    /// Unix timestamp when cancelled (if applicable).
    pub cancelled_at: Option<i64>,
}

impl Order {
    /// Generate a new order number.
    pub fn generate_order_number() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        format!("ORD-{}", ts)
    }

    /// Get total item count.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Cancel the order. Returns false once past the point of no return.
    pub fn cancel(&mut self) -> bool {
        if !self.status.can_cancel() {
            return false;
        }
        self.status = OrderStatus::Cancelled;
        self.cancelled_at = Some(current_timestamp());
        self.updated_at = current_timestamp();
        true
    }

    /// Update order status.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = current_timestamp();
    }
}

/// A resolved line in an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Catalog item sold (synthetic for half pizzas).
    pub item_id: ItemId,
    /// Item name at order time.
    pub name: String,
    /// Quantity ordered.
    pub quantity: u32,
    /// Unit price at order time.
    pub unit_price: Money,
    /// Resolved variation entries.
    pub variations: Vec<OrderVariation>,
    /// Border at order time.
    pub border: Option<SelectedBorder>,
    /// Combination descriptor for half pizzas.
    pub combination: Option<Combination>,
    /// Whether this line waived the delivery fee.
    pub free_delivery: bool,
    /// Recomputed line subtotal.
    pub subtotal: Money,
}

/// A resolved variation entry, recorded for audit and display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderVariation {
    pub variation_id: VariationId,
    pub name: String,
    pub quantity: u32,
    /// Price per unit resolved at order time.
    pub unit_price: Money,
    pub half: Option<HalfSelection>,
}

/// Get current Unix timestamp.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        let now = current_timestamp();
        Order {
            id: OrderId::new("ord-1"),
            order_number: Order::generate_order_number(),
            status: OrderStatus::Pending,
            payment: PaymentMethod::Cash,
            address: Address::new("Rua Augusta", "1200", "Consolação", "São Paulo", "01304-001"),
            lines: Vec::new(),
            subtotal: Money::default(),
            discount_total: Money::default(),
            freight_total: Money::default(),
            grand_total: Money::default(),
            currency: Currency::BRL,
            coupon_code: None,
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        }
    }

    #[test]
    fn test_order_number_generation() {
        assert!(Order::generate_order_number().starts_with("ORD-"));
    }

    #[test]
    fn test_status_can_cancel() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(OrderStatus::Preparing.can_cancel());
        assert!(!OrderStatus::OutForDelivery.can_cancel());
        assert!(!OrderStatus::Completed.can_cancel());
    }

    #[test]
    fn test_cancel_sets_timestamps() {
        let mut order = sample_order();
        assert!(order.cancel());
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.cancelled_at.is_some());

        // Terminal; a second cancel is refused.
        assert!(!order.cancel());
    }
}
