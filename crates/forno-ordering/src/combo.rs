//! Half-and-half flavor combination.
//!
//! Combines two combination-eligible catalog items into one derived item
//! priced at the larger flavor's large-tier price.

use crate::catalog::{CatalogItem, CatalogView};
use crate::ids::ItemId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Size tier used for combinations.
const COMBINATION_SIZE: &str = "large";

/// Reference to one flavor of a combination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlavorRef {
    pub id: ItemId,
    pub name: String,
}

impl FlavorRef {
    pub fn of(item: &CatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
        }
    }
}

/// Descriptor of a half-and-half combination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Combination {
    /// First flavor (the triggering item).
    pub first: FlavorRef,
    /// Second flavor. May equal the first; a same-flavor pair is a
    /// degenerate whole combination and is permitted.
    pub second: FlavorRef,
    /// Size tier of the combination.
    pub size: String,
}

/// A synthesized catalog item representing a half-and-half pizza.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombinedItem {
    /// The derived item: combined price, AND-combined delivery waiver,
    /// groups restricted to those offered on half pizzas.
    pub item: CatalogItem,
    /// The combination descriptor carried onto the cart line.
    pub combination: Combination,
}

impl CombinedItem {
    /// Whether the derived item still needs the selection dialog.
    pub fn needs_selection(&self) -> bool {
        self.item.has_groups()
    }
}

/// Items eligible as combination flavors.
pub fn combination_candidates(view: &CatalogView) -> Vec<&CatalogItem> {
    view.items()
        .iter()
        .filter(|i| i.available && i.allows_combination && i.max_flavors >= 2)
        .collect()
}

/// Large-tier price of a flavor.
///
/// The first variation across the item's groups whose name contains the
/// large size marker supplies the price; items without one fall back to
/// their base price.
pub fn large_tier_price(item: &CatalogItem, view: &CatalogView) -> Money {
    for group in &item.variation_groups {
        for variation_id in &group.variation_ids {
            if let Some(variation) = view.variation(variation_id) {
                let name = variation.name.to_lowercase();
                if name.contains(COMBINATION_SIZE) || name.contains("grande") {
                    return variation.additional_price;
                }
            }
        }
    }
    item.base_price
}

/// Synthesize the half-and-half item for two flavors.
///
/// Price is the larger of the two large-tier prices, never the sum.
/// Delivery is free only when both flavors waive it.
pub fn combine(first: &CatalogItem, second: &CatalogItem, view: &CatalogView) -> CombinedItem {
    let price = large_tier_price(first, view).max_of(&large_tier_price(second, view));

    let combination = Combination {
        first: FlavorRef::of(first),
        second: FlavorRef::of(second),
        size: COMBINATION_SIZE.to_string(),
    };

    let groups = first
        .variation_groups
        .iter()
        .filter(|g| g.apply_to_half_pizza)
        .cloned()
        .collect();

    // Deterministic id so the same pair merges onto one cart line.
    let id = ItemId::new(format!("combo:{}:{}", first.id, second.id));

    let mut item = CatalogItem::new(
        id,
        format!(
            "Half-and-Half (Large) — ½ {} + ½ {}",
            first.name, second.name
        ),
        price,
    );
    item.is_pizza = true;
    item.free_delivery = first.free_delivery && second.free_delivery;
    item.category_ids = first.category_ids.clone();
    item.variation_groups = groups;
    item.borders = first.borders.clone();
    item.border_position = first.border_position;

    CombinedItem { item, combination }
}
