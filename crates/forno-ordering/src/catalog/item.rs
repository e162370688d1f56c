//! Catalog item and border types.

use crate::catalog::VariationGroup;
use crate::ids::{BorderId, CategoryId, ItemId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// An item on the menu.
///
/// Authored externally and read-only to the ordering engine. Cart lines and
/// orders carry snapshots of the fields they need, never references back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    /// Unique item identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Base price.
    ///
    /// Informational only when `price_from` is set; such items contribute
    /// zero base price to any total.
    pub base_price: Money,
    /// Whether the base price is a "from" price.
    pub price_from: bool,
    /// Whether this item is a pizza (enables border selection).
    pub is_pizza: bool,
    /// Whether this item can be combined half-and-half with another flavor.
    pub allows_combination: bool,
    /// Maximum number of flavors in a combination.
    pub max_flavors: u8,
    /// Whether delivery is free for this item.
    pub free_delivery: bool,
    /// Whether the item can currently be ordered.
    pub available: bool,
    /// Categories this item belongs to.
    pub category_ids: Vec<CategoryId>,
    /// Variation groups, in display order.
    pub variation_groups: Vec<VariationGroup>,
    /// Borders offered by this item (pizza only).
    pub borders: Vec<Border>,
    /// Sort position of the border section among the groups.
    pub border_position: i32,
}

impl CatalogItem {
    /// Create a new available item.
    pub fn new(id: ItemId, name: impl Into<String>, base_price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            base_price,
            price_from: false,
            is_pizza: false,
            allows_combination: false,
            max_flavors: 1,
            free_delivery: false,
            available: true,
            category_ids: Vec::new(),
            variation_groups: Vec::new(),
            borders: Vec::new(),
            border_position: 0,
        }
    }

    /// Whether the item requires the selection dialog before reaching the cart.
    pub fn has_groups(&self) -> bool {
        !self.variation_groups.is_empty()
    }

    /// Look up one of this item's borders.
    pub fn border(&self, border_id: &BorderId) -> Option<&Border> {
        self.borders.iter().find(|b| &b.id == border_id)
    }

    /// Borders currently offered.
    pub fn available_borders(&self) -> impl Iterator<Item = &Border> {
        self.borders.iter().filter(|b| b.available)
    }
}

/// A pizza border (stuffed crust) option.
///
/// Exactly zero-or-one border may be attached to a line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Border {
    /// Unique border identifier.
    pub id: BorderId,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Price added on top of the line.
    pub additional_price: Money,
    /// Whether the border can currently be ordered.
    pub available: bool,
}

impl Border {
    /// Create a new available border.
    pub fn new(id: BorderId, name: impl Into<String>, additional_price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            additional_price,
            available: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_item_creation() {
        let item = CatalogItem::new(
            ItemId::new("pizza-margherita"),
            "Margherita",
            Money::new(3000, Currency::BRL),
        );
        assert!(item.available);
        assert!(!item.has_groups());
        assert_eq!(item.max_flavors, 1);
    }

    #[test]
    fn test_border_lookup() {
        let mut item = CatalogItem::new(
            ItemId::new("pizza-margherita"),
            "Margherita",
            Money::new(3000, Currency::BRL),
        );
        item.is_pizza = true;
        item.borders.push(Border::new(
            BorderId::new("catupiry"),
            "Catupiry",
            Money::new(800, Currency::BRL),
        ));

        assert!(item.border(&BorderId::new("catupiry")).is_some());
        assert!(item.border(&BorderId::new("cheddar")).is_none());
        assert_eq!(item.available_borders().count(), 1);
    }
}
