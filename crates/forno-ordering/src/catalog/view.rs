//! Read-only view over externally supplied catalog data.

use crate::cart::SelectedGroup;
use crate::catalog::{Border, CatalogItem, GroupStatus, Variation, VariationGroup};
use crate::error::OrderingError;
use crate::ids::{BorderId, ItemId, VariationId};
use crate::money::{Currency, Money};
use async_trait::async_trait;
use std::collections::HashMap;

/// Source of catalog snapshots.
///
/// Returns current, possibly-stale data; unavailable entries are filtered
/// through the `available` flags rather than omitted.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn all_items(&self) -> Result<Vec<CatalogItem>, OrderingError>;
    async fn all_variations(&self) -> Result<Vec<Variation>, OrderingError>;
}

/// In-memory view over a catalog snapshot.
///
/// No side effects and no network calls; every query answers from the
/// snapshot taken at construction.
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    items: Vec<CatalogItem>,
    variations: HashMap<VariationId, Variation>,
    currency: Currency,
}

impl CatalogView {
    /// Build a view from a catalog snapshot.
    pub fn new(items: Vec<CatalogItem>, variations: Vec<Variation>) -> Self {
        let currency = items
            .first()
            .map(|i| i.base_price.currency)
            .unwrap_or_default();
        let variations = variations.into_iter().map(|v| (v.id.clone(), v)).collect();
        Self {
            items,
            variations,
            currency,
        }
    }

    /// Fetch a fresh snapshot from a catalog source.
    pub async fn load(source: &dyn CatalogSource) -> Result<Self, OrderingError> {
        let items = source.all_items().await?;
        let variations = source.all_variations().await?;
        Ok(Self::new(items, variations))
    }

    /// All items in the snapshot.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// The snapshot's currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Look up an item by id.
    pub fn item(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Whether an item is present and available.
    pub fn is_item_orderable(&self, id: &ItemId) -> bool {
        self.item(id).map(|i| i.available).unwrap_or(false)
    }

    /// Look up a variation by id.
    pub fn variation(&self, id: &VariationId) -> Option<&Variation> {
        self.variations.get(id)
    }

    /// Look up a border offered by an item.
    pub fn border_of(&self, item_id: &ItemId, border_id: &BorderId) -> Option<&Border> {
        self.item(item_id).and_then(|i| i.border(border_id))
    }

    /// Variations of a group that are available and applicable to the item.
    pub fn variations_for_group(
        &self,
        group: &VariationGroup,
        item: &CatalogItem,
    ) -> Vec<&Variation> {
        group
            .variation_ids
            .iter()
            .filter_map(|id| self.variations.get(id))
            .filter(|v| v.available && v.applies_to_categories(&item.category_ids))
            .collect()
    }

    /// Price of a variation.
    ///
    /// Unknown ids price at zero so stale references stay harmless.
    pub fn price_of(&self, id: &VariationId) -> Money {
        self.variations
            .get(id)
            .map(|v| v.additional_price)
            .unwrap_or_else(|| Money::zero(self.currency))
    }

    /// Aggregate selection status for a group.
    pub fn group_status(&self, group: &VariationGroup, selection: &SelectedGroup) -> GroupStatus {
        let total = selection.total_quantity();
        GroupStatus {
            total,
            min: group.min_required,
            max: group.max_allowed,
            valid: group.accepts(total),
        }
    }

    /// Render the group's message for the current selection.
    pub fn message(&self, group: &VariationGroup, selection: &SelectedGroup) -> String {
        group.render_message(selection.total_quantity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::SelectedVariation;
    use crate::ids::{CategoryId, GroupId};

    fn sample_view() -> CatalogView {
        let pizzas = CategoryId::new("pizzas");

        let mut size = Variation::new(
            VariationId::new("size-large"),
            "Large",
            Money::new(1000, Currency::BRL),
        );
        size.applies_to = vec![pizzas.clone()];

        let mut off = Variation::new(
            VariationId::new("off-menu"),
            "Off menu",
            Money::new(100, Currency::BRL),
        );
        off.available = false;

        let mut group = VariationGroup::new(GroupId::new("size"), "Size", 1, 1);
        group.variation_ids = vec![VariationId::new("size-large"), VariationId::new("off-menu")];

        let mut item = CatalogItem::new(
            ItemId::new("pizza-margherita"),
            "Margherita",
            Money::new(3000, Currency::BRL),
        );
        item.category_ids = vec![pizzas];
        item.variation_groups = vec![group];

        CatalogView::new(vec![item], vec![size, off])
    }

    #[test]
    fn test_variations_for_group_filters() {
        let view = sample_view();
        let item = view.item(&ItemId::new("pizza-margherita")).unwrap();
        let group = &item.variation_groups[0];

        let variations = view.variations_for_group(group, item);
        assert_eq!(variations.len(), 1);
        assert_eq!(variations[0].name, "Large");
    }

    #[test]
    fn test_price_of_unknown_is_zero() {
        let view = sample_view();
        assert!(view.price_of(&VariationId::new("ghost")).is_zero());
        assert_eq!(
            view.price_of(&VariationId::new("size-large")).amount_cents,
            1000
        );
    }

    #[test]
    fn test_group_status() {
        let view = sample_view();
        let item = view.item(&ItemId::new("pizza-margherita")).unwrap();
        let group = &item.variation_groups[0];

        let empty = SelectedGroup::new(group.id.clone(), group.name.clone());
        let status = view.group_status(group, &empty);
        assert!(!status.valid);
        assert_eq!(status.total, 0);

        let mut selected = empty.clone();
        selected
            .variations
            .push(SelectedVariation::new(VariationId::new("size-large"), 1));
        assert!(view.group_status(group, &selected).valid);
    }

    #[test]
    fn test_item_orderable() {
        let view = sample_view();
        assert!(view.is_item_orderable(&ItemId::new("pizza-margherita")));
        assert!(!view.is_item_orderable(&ItemId::new("ghost")));
    }
}
