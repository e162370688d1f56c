//! Order finalization.
//!
//! Recomputes every price from catalog data at submission time; nothing
//! the client declared about totals is ever trusted.

use crate::cart::{CartLine, Coupon};
use crate::catalog::CatalogView;
use crate::checkout::order::{current_timestamp, Address, Order, OrderLine, OrderStatus, OrderVariation, PaymentMethod};
use crate::error::OrderingError;
use crate::ids::OrderId;
use crate::money::Money;
use crate::pricing;
use async_trait::async_trait;
use tracing::{error, info};

/// Persists order records.
///
/// Implementations must reject malformed records rather than coerce them;
/// the finalizer supplies fully resolved, price-complete records.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: &Order) -> Result<OrderId, OrderingError>;
}

/// Post-persistence side effects. Fire-and-forget from the engine's
/// perspective; failures must not roll back order creation.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, order: &Order) -> Result<(), OrderingError>;
    async fn evaluate_loyalty(&self, order: &Order) -> Result<(), OrderingError>;
}

/// Everything a submission carries besides the cart lines.
#[derive(Debug, Clone)]
pub struct FinalizeRequest {
    pub lines: Vec<CartLine>,
    pub address: Address,
    pub payment: PaymentMethod,
    pub coupon: Option<Coupon>,
    /// Delivery fee quoted by the freight collaborator. Ignored when any
    /// line waives delivery.
    pub freight: Money,
    /// Initial status override; point-of-sale flows submit completed
    /// orders directly. Defaults to pending.
    pub initial_status: Option<OrderStatus>,
}

/// Turns cart lines into persisted, immutable orders.
pub struct OrderFinalizer<R, N> {
    repository: R,
    notifications: N,
}

impl<R: OrderRepository, N: NotificationSink> OrderFinalizer<R, N> {
    pub fn new(repository: R, notifications: N) -> Self {
        Self {
            repository,
            notifications,
        }
    }

    /// Finalize a submission.
    ///
    /// Not internally retried and no deduplication key is derived; the
    /// caller must not submit the same user action twice. On persistence
    /// failure the error propagates, the cart is untouched and no side
    /// effects run.
    pub async fn finalize(
        &self,
        request: FinalizeRequest,
        view: &CatalogView,
    ) -> Result<Order, OrderingError> {
        if request.lines.is_empty() {
            return Err(OrderingError::EmptyOrder);
        }

        let currency = request.lines[0].unit_price.currency;
        let mut lines = Vec::with_capacity(request.lines.len());
        let mut subtotal = Money::zero(currency);

        for line in &request.lines {
            let resolved = resolve_line(line, view)?;
            subtotal = subtotal
                .try_add(&resolved.subtotal)
                .ok_or(OrderingError::Overflow)?;
            lines.push(resolved);
        }

        let discount = request
            .coupon
            .as_ref()
            .map(|c| c.discount_for(&subtotal))
            .unwrap_or_else(|| Money::zero(currency));

        let freight = if lines.iter().any(|l| l.free_delivery) {
            Money::zero(currency)
        } else {
            request.freight
        };

        let grand_total = subtotal
            .try_subtract(&discount)
            .and_then(|m| m.try_add(&freight))
            .ok_or(OrderingError::Overflow)?
            .clamp_non_negative();

        let now = current_timestamp();
        let mut order = Order {
            id: OrderId::generate(),
            order_number: Order::generate_order_number(),
            status: request.initial_status.unwrap_or_default(),
            payment: request.payment,
            address: request.address,
            lines,
            subtotal,
            discount_total: discount,
            freight_total: freight,
            grand_total,
            currency,
            coupon_code: request.coupon.map(|c| c.code),
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        };

        order.id = self.repository.create(&order).await?;
        info!(
            order = %order.id,
            total = %order.grand_total,
            status = order.status.as_str(),
            "order persisted"
        );

        // Side effects run only after the order exists; their failures are
        // logged and never surface to the customer.
        if let Err(e) = self.notifications.notify(&order).await {
            error!(order = %order.id, error = %e, "order notification failed");
        }
        if let Err(e) = self.notifications.evaluate_loyalty(&order).await {
            error!(order = %order.id, error = %e, "loyalty evaluation failed");
        }

        Ok(order)
    }
}

/// Resolve one cart line into its audited order form, recomputing the
/// subtotal through the shared calculator.
fn resolve_line(line: &CartLine, view: &CatalogView) -> Result<OrderLine, OrderingError> {
    let subtotal = pricing::line_total(line, view)?;

    let variations = line
        .groups
        .iter()
        .flat_map(|group| group.variations.iter())
        .filter(|v| v.quantity > 0)
        .map(|v| OrderVariation {
            variation_id: v.variation_id.clone(),
            name: v.name.clone(),
            quantity: v.quantity,
            unit_price: pricing::additional_price(v, view),
            half: v.half,
        })
        .collect();

    Ok(OrderLine {
        item_id: line.item_id.clone(),
        name: line.name.clone(),
        quantity: line.quantity,
        unit_price: line.unit_price,
        variations,
        border: line.border.clone(),
        combination: line.kind.combination().cloned(),
        free_delivery: line.free_delivery,
        subtotal,
    })
}
