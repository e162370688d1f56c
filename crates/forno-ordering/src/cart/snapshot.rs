//! Minimal persisted form of the cart.
//!
//! Snapshots carry ids, quantities and structure only. Names and prices are
//! re-resolved against a fresh catalog on rehydration, so a price change
//! while the cart slept never leaks a stale total.

use crate::cart::{CartLine, HalfSelection, LineKind, SelectedBorder, SelectedGroup, SelectedVariation};
use crate::catalog::{CatalogItem, CatalogView};
use crate::combo::{self, Combination};
use crate::ids::{BorderId, GroupId, ItemId, VariationId};
use serde::{Deserialize, Serialize};

/// The durable cart snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CartSnapshot {
    pub lines: Vec<SavedLine>,
}

impl CartSnapshot {
    /// Snapshot the given lines.
    pub fn of(lines: &[CartLine]) -> Self {
        Self {
            lines: lines.iter().map(SavedLine::of).collect(),
        }
    }
}

/// One persisted line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedLine {
    pub item_id: ItemId,
    pub quantity: u32,
    pub groups: Vec<SavedGroup>,
    pub border_id: Option<BorderId>,
    pub combination: Option<Combination>,
    pub half_pizza: bool,
}

/// Persisted selections of one group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedGroup {
    pub group_id: GroupId,
    pub variations: Vec<SavedVariation>,
}

/// One persisted selection row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedVariation {
    pub variation_id: VariationId,
    pub quantity: u32,
    pub half: Option<HalfSelection>,
}

impl SavedLine {
    /// Reduce a cart line to its persisted form.
    pub fn of(line: &CartLine) -> Self {
        Self {
            item_id: line.item_id.clone(),
            quantity: line.quantity,
            groups: line
                .groups
                .iter()
                .map(|g| SavedGroup {
                    group_id: g.group_id.clone(),
                    variations: g
                        .variations
                        .iter()
                        .map(|v| SavedVariation {
                            variation_id: v.variation_id.clone(),
                            quantity: v.quantity,
                            half: v.half,
                        })
                        .collect(),
                })
                .collect(),
            border_id: line.border.as_ref().map(|b| b.border_id.clone()),
            combination: line.kind.combination().cloned(),
            half_pizza: line.kind.is_half_pizza(),
        }
    }

    /// Re-attach this line to a fresh catalog.
    ///
    /// Returns `None` when the underlying item (or either combination
    /// flavor) is missing or unavailable; the caller drops the line.
    pub fn restore(&self, view: &CatalogView) -> Option<CartLine> {
        let (item, kind) = self.resolve_item(view)?;

        let groups = self
            .groups
            .iter()
            .map(|saved| {
                let name = item
                    .variation_groups
                    .iter()
                    .find(|g| g.id == saved.group_id)
                    .map(|g| g.name.clone())
                    .unwrap_or_default();
                let mut group = SelectedGroup::new(saved.group_id.clone(), name);
                group.variations = saved
                    .variations
                    .iter()
                    .map(|v| SelectedVariation {
                        variation_id: v.variation_id.clone(),
                        name: view
                            .variation(&v.variation_id)
                            .map(|live| live.name.clone())
                            .unwrap_or_default(),
                        quantity: v.quantity,
                        additional_price: Some(view.price_of(&v.variation_id)),
                        half: v.half,
                    })
                    .collect();
                group
            })
            .collect();

        let border = self
            .border_id
            .as_ref()
            .and_then(|id| item.border(id))
            .map(SelectedBorder::from_border);

        let mut line = CartLine::new(&item, groups, border, kind);
        line.quantity = self.quantity;
        Some(line)
    }

    /// Resolve the live item this line points at.
    ///
    /// Standard lines attach to the catalog item; half-pizza lines
    /// re-synthesize the combined item from both flavors so the combined
    /// price reflects the fresh catalog.
    fn resolve_item(&self, view: &CatalogView) -> Option<(CatalogItem, LineKind)> {
        if self.half_pizza {
            let combination = self.combination.as_ref()?;
            if !view.is_item_orderable(&combination.first.id)
                || !view.is_item_orderable(&combination.second.id)
            {
                return None;
            }
            let first = view.item(&combination.first.id)?;
            let second = view.item(&combination.second.id)?;
            let combined = combo::combine(first, second, view);
            Some((combined.item, LineKind::HalfPizza(combined.combination)))
        } else {
            if !view.is_item_orderable(&self.item_id) {
                return None;
            }
            let item = view.item(&self.item_id)?.clone();
            Some((item, LineKind::Standard))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};

    fn view_with_item(available: bool) -> CatalogView {
        let mut item = CatalogItem::new(
            ItemId::new("margherita"),
            "Margherita",
            Money::new(3000, Currency::BRL),
        );
        item.available = available;
        CatalogView::new(vec![item], Vec::new())
    }

    fn saved_line() -> SavedLine {
        SavedLine {
            item_id: ItemId::new("margherita"),
            quantity: 2,
            groups: Vec::new(),
            border_id: None,
            combination: None,
            half_pizza: false,
        }
    }

    #[test]
    fn test_restore_reattaches_to_live_item() {
        let view = view_with_item(true);
        let line = saved_line().restore(&view).unwrap();
        assert_eq!(line.name, "Margherita");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price.amount_cents, 3000);
    }

    #[test]
    fn test_restore_drops_missing_item() {
        let view = CatalogView::new(Vec::new(), Vec::new());
        assert!(saved_line().restore(&view).is_none());
    }

    #[test]
    fn test_restore_drops_unavailable_item() {
        let view = view_with_item(false);
        assert!(saved_line().restore(&view).is_none());
    }

    #[test]
    fn test_snapshot_carries_no_prices() {
        let view = view_with_item(true);
        let line = saved_line().restore(&view).unwrap();
        let snapshot = CartSnapshot::of(&[line]);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(!json.contains("amount_cents"));
        assert!(!json.contains("Margherita"));
    }
}
