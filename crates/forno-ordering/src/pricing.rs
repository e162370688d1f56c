//! Shared pricing calculator.
//!
//! The single source of truth wherever money is displayed or persisted:
//! the live preview, the cart store and order finalization all price lines
//! through this module and must agree to the cent.

use crate::cart::{CartLine, Coupon, HalfSelection, SelectedVariation};
use crate::catalog::CatalogView;
use crate::error::OrderingError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a single line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    /// Base unit price after the price-from rule.
    pub unit: Money,
    /// Sum of variation contributions for one unit.
    pub variations: Money,
    /// Border contribution for one unit.
    pub border: Money,
    /// Units on the line.
    pub quantity: u32,
    /// (unit + variations + border) * quantity.
    pub total: Money,
}

/// Totals for a set of lines plus an optional coupon.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CartTotals {
    /// Sum of all line totals.
    pub subtotal: Money,
    /// Coupon discount, capped at the subtotal.
    pub discount: Money,
    /// Subtotal minus discount, never negative.
    pub total: Money,
}

impl CartTotals {
    /// Totals of an empty cart.
    pub fn empty(view: &CatalogView) -> Self {
        let zero = Money::zero(view.currency());
        Self {
            subtotal: zero,
            discount: zero,
            total: zero,
        }
    }
}

/// Effective price of a selected variation.
///
/// The price captured on the line wins; rows without one (snapshots
/// predating capture) resolve live against the catalog, where unknown ids
/// price at zero.
pub fn additional_price(variation: &SelectedVariation, view: &CatalogView) -> Money {
    variation
        .additional_price
        .unwrap_or_else(|| view.price_of(&variation.variation_id))
}

/// Contribution multiplier for a variation row.
///
/// A whole-pizza selection on a half-and-half line is applied to both
/// halves and charged twice.
fn half_multiplier(line: &CartLine, variation: &SelectedVariation) -> i64 {
    if line.kind.is_half_pizza() && variation.half == Some(HalfSelection::Whole) {
        2
    } else {
        1
    }
}

/// Total for one line.
pub fn line_total(line: &CartLine, view: &CatalogView) -> Result<Money, OrderingError> {
    Ok(line_pricing(line, view)?.total)
}

/// Full pricing breakdown for one line.
pub fn line_pricing(line: &CartLine, view: &CatalogView) -> Result<LinePricing, OrderingError> {
    let currency = line.unit_price.currency;

    let unit = if line.kind.is_half_pizza() {
        line.unit_price
    } else if line.price_from {
        Money::zero(currency)
    } else {
        line.unit_price
    };

    let mut variations = Money::zero(currency);
    for group in &line.groups {
        for variation in group.variations.iter().filter(|v| v.quantity > 0) {
            let contribution = additional_price(variation, view)
                .try_multiply(variation.quantity as i64)
                .and_then(|m| m.try_multiply(half_multiplier(line, variation)))
                .ok_or(OrderingError::Overflow)?;
            variations = variations
                .try_add(&contribution)
                .ok_or(OrderingError::Overflow)?;
        }
    }

    let border = line
        .border
        .as_ref()
        .map(|b| b.additional_price)
        .unwrap_or_else(|| Money::zero(currency));

    let total = unit
        .try_add(&variations)
        .and_then(|m| m.try_add(&border))
        .and_then(|m| m.try_multiply(line.quantity as i64))
        .ok_or(OrderingError::Overflow)?;

    Ok(LinePricing {
        unit,
        variations,
        border,
        quantity: line.quantity,
        total,
    })
}

/// Totals for a set of lines with an optional coupon applied once at
/// order level.
pub fn cart_totals(
    lines: &[CartLine],
    coupon: Option<&Coupon>,
    view: &CatalogView,
) -> Result<CartTotals, OrderingError> {
    let currency = lines
        .first()
        .map(|l| l.unit_price.currency)
        .unwrap_or_else(|| view.currency());

    let mut subtotal = Money::zero(currency);
    for line in lines {
        let total = line_total(line, view)?;
        subtotal = subtotal.try_add(&total).ok_or(OrderingError::Overflow)?;
    }

    let discount = coupon
        .map(|c| c.discount_for(&subtotal))
        .unwrap_or_else(|| Money::zero(currency));

    let total = subtotal
        .try_subtract(&discount)
        .ok_or(OrderingError::Overflow)?
        .clamp_non_negative();

    Ok(CartTotals {
        subtotal,
        discount,
        total,
    })
}
