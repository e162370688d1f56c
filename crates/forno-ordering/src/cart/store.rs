//! Cart composition store.

use crate::cart::{CartLine, CartSnapshot, Coupon, SelectedBorder, SelectedGroup};
use crate::catalog::CatalogView;
use crate::error::OrderingError;
use crate::ids::ItemId;
use crate::money::Money;
use crate::pricing::{self, CartTotals};
use forno_kv::Kv;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default storage key for the cart snapshot.
const DEFAULT_SNAPSHOT_KEY: &str = "cart:default";

/// Partial update applied to a line in place (edit path).
///
/// Identity is not re-derived after an edit; the line keeps its position
/// and is never re-merged into another line.
#[derive(Debug, Clone, Default)]
pub struct LinePatch {
    pub quantity: Option<u32>,
    pub groups: Option<Vec<SelectedGroup>>,
    pub border: Option<Option<SelectedBorder>>,
}

/// The session's cart.
///
/// Owned by a single session; every mutation recomputes the derived totals
/// and writes the durable snapshot before returning. Business rules were
/// already enforced by the selection flow, so mutations here never reject
/// on those grounds.
pub struct CartStore {
    lines: Vec<CartLine>,
    coupon: Option<Coupon>,
    kv: Arc<Kv>,
    snapshot_key: String,
    totals: CartTotals,
}

impl CartStore {
    /// Create an empty cart persisting through the given store.
    pub fn new(kv: Arc<Kv>) -> Self {
        Self {
            lines: Vec::new(),
            coupon: None,
            kv,
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            totals: CartTotals::default(),
        }
    }

    /// Use a custom snapshot key (e.g., per session).
    pub fn with_snapshot_key(mut self, key: impl Into<String>) -> Self {
        self.snapshot_key = key.into();
        self
    }

    /// Lines currently in the cart.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// The applied coupon, if any.
    pub fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    /// Sum of all line totals.
    pub fn subtotal(&self) -> Money {
        self.totals.subtotal
    }

    /// Coupon discount on the subtotal.
    pub fn discount_amount(&self) -> Money {
        self.totals.discount
    }

    /// Subtotal minus discount, never negative.
    pub fn final_total(&self) -> Money {
        self.totals.total
    }

    /// Add a configured line, merging onto an existing line when the item,
    /// selections and border all match.
    pub fn add_line(
        &mut self,
        mut line: CartLine,
        quantity: u32,
        view: &CatalogView,
    ) -> Result<(), OrderingError> {
        if quantity == 0 {
            return Err(OrderingError::InvalidQuantity(0));
        }
        Self::enrich(&mut line, view);
        line.quantity = quantity;

        let key = line.identity_key();
        if let Some(existing) = self.lines.iter_mut().find(|l| l.identity_key() == key) {
            existing.quantity += quantity;
        } else {
            self.lines.push(line);
        }
        self.after_mutation(view)
    }

    /// Remove the first line of an item. Returns whether a line was removed.
    pub fn remove_line(
        &mut self,
        item_id: &ItemId,
        view: &CatalogView,
    ) -> Result<bool, OrderingError> {
        let Some(index) = self.lines.iter().position(|l| &l.item_id == item_id) else {
            return Ok(false);
        };
        self.lines.remove(index);
        self.after_mutation(view)?;
        Ok(true)
    }

    /// Add one unit to the first line of an item.
    pub fn increment(
        &mut self,
        item_id: &ItemId,
        view: &CatalogView,
    ) -> Result<bool, OrderingError> {
        let Some(line) = self.lines.iter_mut().find(|l| &l.item_id == item_id) else {
            return Ok(false);
        };
        line.quantity += 1;
        self.after_mutation(view)?;
        Ok(true)
    }

    /// Remove one unit from the first line of an item; at quantity one the
    /// line is removed instead.
    pub fn decrement(
        &mut self,
        item_id: &ItemId,
        view: &CatalogView,
    ) -> Result<bool, OrderingError> {
        let Some(index) = self.lines.iter().position(|l| &l.item_id == item_id) else {
            return Ok(false);
        };
        if self.lines[index].quantity <= 1 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity -= 1;
        }
        self.after_mutation(view)?;
        Ok(true)
    }

    /// Replace fields of the line at `index` (edit flow).
    pub fn update_line_by_index(
        &mut self,
        index: usize,
        patch: LinePatch,
        view: &CatalogView,
    ) -> Result<(), OrderingError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(OrderingError::LineIndexOutOfRange(index))?;

        if let Some(quantity) = patch.quantity {
            if quantity == 0 {
                return Err(OrderingError::InvalidQuantity(0));
            }
            line.quantity = quantity;
        }
        if let Some(groups) = patch.groups {
            line.groups = groups;
        }
        if let Some(border) = patch.border {
            line.border = border;
        }
        Self::enrich(line, view);
        self.after_mutation(view)
    }

    /// Empty the cart and drop any applied coupon.
    pub fn clear(&mut self, view: &CatalogView) -> Result<(), OrderingError> {
        self.lines.clear();
        self.coupon = None;
        self.after_mutation(view)
    }

    /// Apply a validated coupon descriptor.
    pub fn apply_coupon(
        &mut self,
        coupon: Coupon,
        view: &CatalogView,
    ) -> Result<(), OrderingError> {
        self.coupon = Some(coupon);
        self.after_mutation(view)
    }

    /// Remove the applied coupon.
    pub fn remove_coupon(&mut self, view: &CatalogView) -> Result<(), OrderingError> {
        self.coupon = None;
        self.after_mutation(view)
    }

    /// Restore the cart from its durable snapshot against a fresh catalog.
    ///
    /// Called once by the host at startup. Lines whose item is missing or
    /// unavailable are dropped; when anything was dropped the stored
    /// snapshot is reset to empty rather than patched, while surviving
    /// lines stay in memory. Returns the number of dropped lines.
    pub fn rehydrate(&mut self, view: &CatalogView) -> Result<usize, OrderingError> {
        let snapshot: CartSnapshot = self
            .kv
            .get(&self.snapshot_key)?
            .unwrap_or_default();

        let saved = snapshot.lines.len();
        self.lines = snapshot
            .lines
            .iter()
            .filter_map(|line| {
                let restored = line.restore(view);
                if restored.is_none() {
                    warn!(item = %line.item_id, "dropping cart line no longer in catalog");
                }
                restored
            })
            .collect();

        let dropped = saved - self.lines.len();
        if dropped > 0 {
            self.kv.set(&self.snapshot_key, &CartSnapshot::default())?;
        }
        self.recompute_totals(view)?;
        debug!(restored = self.lines.len(), dropped, "cart rehydrated");
        Ok(dropped)
    }

    /// Fill in any name or price a line's selections are missing, from the
    /// authoritative catalog.
    fn enrich(line: &mut CartLine, view: &CatalogView) {
        for group in &mut line.groups {
            for variation in &mut group.variations {
                if variation.additional_price.is_none() {
                    variation.additional_price = Some(view.price_of(&variation.variation_id));
                }
                if variation.name.is_empty() {
                    if let Some(live) = view.variation(&variation.variation_id) {
                        variation.name = live.name.clone();
                    }
                }
            }
        }
    }

    fn after_mutation(&mut self, view: &CatalogView) -> Result<(), OrderingError> {
        self.recompute_totals(view)?;
        self.kv
            .set(&self.snapshot_key, &CartSnapshot::of(&self.lines))?;
        debug!(
            lines = self.lines.len(),
            items = self.item_count(),
            subtotal = %self.totals.subtotal,
            "cart updated"
        );
        Ok(())
    }

    fn recompute_totals(&mut self, view: &CatalogView) -> Result<(), OrderingError> {
        self.totals = pricing::cart_totals(&self.lines, self.coupon.as_ref(), view)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{LineKind, SelectedVariation};
    use crate::catalog::{Border, CatalogItem};
    use crate::ids::{BorderId, GroupId, VariationId};
    use crate::money::Currency;

    fn brl(cents: i64) -> Money {
        Money::new(cents, Currency::BRL)
    }

    fn view() -> CatalogView {
        let mut item = CatalogItem::new(ItemId::new("margherita"), "Margherita", brl(3000));
        item.is_pizza = true;
        item.borders = vec![Border::new(BorderId::new("catupiry"), "Catupiry", brl(800))];
        CatalogView::new(vec![item], Vec::new())
    }

    fn line(view: &CatalogView, border: Option<&str>) -> CartLine {
        let item = view.item(&ItemId::new("margherita")).unwrap();
        let border = border
            .and_then(|id| item.border(&BorderId::new(id)))
            .map(SelectedBorder::from_border);
        CartLine::new(item, Vec::new(), border, LineKind::Standard)
    }

    fn store() -> CartStore {
        CartStore::new(Arc::new(Kv::memory()))
    }

    #[test]
    fn test_same_configuration_merges() {
        let view = view();
        let mut cart = store();
        cart.add_line(line(&view, None), 1, &view).unwrap();
        cart.add_line(line(&view, None), 2, &view).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_different_border_stays_distinct() {
        let view = view();
        let mut cart = store();
        cart.add_line(line(&view, None), 1, &view).unwrap();
        cart.add_line(line(&view, Some("catupiry")), 1, &view).unwrap();

        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_different_selection_stays_distinct() {
        let view = view();
        let mut cart = store();
        cart.add_line(line(&view, None), 1, &view).unwrap();

        let mut configured = line(&view, None);
        let mut group = SelectedGroup::new(GroupId::new("toppings"), "Toppings");
        group
            .variations
            .push(SelectedVariation::new(VariationId::new("olives"), 1));
        configured.groups.push(group);
        cart.add_line(configured, 1, &view).unwrap();

        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_increment_decrement_remove() {
        let view = view();
        let id = ItemId::new("margherita");
        let mut cart = store();
        cart.add_line(line(&view, None), 1, &view).unwrap();

        assert!(cart.increment(&id, &view).unwrap());
        assert_eq!(cart.item_count(), 2);

        assert!(cart.decrement(&id, &view).unwrap());
        assert_eq!(cart.item_count(), 1);

        // Decrement below one removes the line.
        assert!(cart.decrement(&id, &view).unwrap());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_with_coupon() {
        let view = view();
        let mut cart = store();
        cart.add_line(line(&view, None), 2, &view).unwrap();
        assert_eq!(cart.subtotal().amount_cents, 6000);

        cart.apply_coupon(Coupon::percentage("SAVE10", 10.0), &view).unwrap();
        assert_eq!(cart.discount_amount().amount_cents, 600);
        assert_eq!(cart.final_total().amount_cents, 5400);
    }

    #[test]
    fn test_clear_drops_coupon() {
        let view = view();
        let mut cart = store();
        cart.add_line(line(&view, None), 1, &view).unwrap();
        cart.apply_coupon(Coupon::percentage("SAVE10", 10.0), &view).unwrap();

        cart.clear(&view).unwrap();
        assert!(cart.is_empty());
        assert!(cart.coupon().is_none());
        assert!(cart.final_total().is_zero());
    }

    #[test]
    fn test_update_line_by_index() {
        let view = view();
        let mut cart = store();
        cart.add_line(line(&view, None), 1, &view).unwrap();

        let item = view.item(&ItemId::new("margherita")).unwrap();
        let border = item
            .border(&BorderId::new("catupiry"))
            .map(SelectedBorder::from_border);
        cart.update_line_by_index(
            0,
            LinePatch {
                border: Some(border),
                ..LinePatch::default()
            },
            &view,
        )
        .unwrap();

        assert!(cart.lines()[0].border.is_some());
        assert_eq!(cart.subtotal().amount_cents, 3800);

        let err = cart.update_line_by_index(5, LinePatch::default(), &view);
        assert!(matches!(err, Err(OrderingError::LineIndexOutOfRange(5))));
    }

    #[test]
    fn test_persistence_roundtrip() {
        let view = view();
        let kv = Arc::new(Kv::memory());

        let mut cart = CartStore::new(kv.clone());
        cart.add_line(line(&view, Some("catupiry")), 2, &view).unwrap();
        let subtotal = cart.subtotal();

        let mut restored = CartStore::new(kv);
        let dropped = restored.rehydrate(&view).unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(restored.lines().len(), 1);
        assert_eq!(restored.lines()[0].quantity, 2);
        assert_eq!(restored.subtotal(), subtotal);
    }

    #[test]
    fn test_rehydrate_drops_stale_and_resets_snapshot() {
        let view = view();
        let kv = Arc::new(Kv::memory());

        let mut cart = CartStore::new(kv.clone());
        cart.add_line(line(&view, None), 1, &view).unwrap();

        let mut ghost = line(&view, None);
        ghost.item_id = ItemId::new("retired-pizza");
        // Distinct identity, so it lands on its own line.
        cart.add_line(ghost, 1, &view).unwrap();
        assert_eq!(cart.lines().len(), 2);

        let mut restored = CartStore::new(kv.clone());
        let dropped = restored.rehydrate(&view).unwrap();
        assert_eq!(dropped, 1);

        // The surviving line is intact in memory.
        assert_eq!(restored.lines().len(), 1);
        assert_eq!(restored.lines()[0].item_id, ItemId::new("margherita"));

        // The stored snapshot was reset wholesale, not patched.
        let stored: CartSnapshot = kv.get(DEFAULT_SNAPSHOT_KEY).unwrap().unwrap();
        assert!(stored.lines.is_empty());
    }
}
