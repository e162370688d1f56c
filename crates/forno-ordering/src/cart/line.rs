//! Cart line and selection types.

use crate::catalog::{Border, CatalogItem};
use crate::combo::Combination;
use crate::ids::{BorderId, GroupId, ItemId, VariationId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Which part of a half-and-half pizza a selection targets.
///
/// Meaningful only on combined lines whose group allows per-half targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HalfSelection {
    /// First half only.
    FirstHalf,
    /// Second half only.
    SecondHalf,
    /// Both halves; the variation is charged twice.
    Whole,
}

impl HalfSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            HalfSelection::FirstHalf => "half1",
            HalfSelection::SecondHalf => "half2",
            HalfSelection::Whole => "whole",
        }
    }
}

/// One selected variation row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedVariation {
    /// The variation selected.
    pub variation_id: VariationId,
    /// Name captured at selection time, for display.
    pub name: String,
    /// Units selected.
    pub quantity: u32,
    /// Price captured at confirm time. Absent on snapshots predating
    /// capture; pricing then falls back to a live catalog lookup.
    pub additional_price: Option<Money>,
    /// Per-half target on combined lines.
    pub half: Option<HalfSelection>,
}

impl SelectedVariation {
    pub fn new(variation_id: VariationId, quantity: u32) -> Self {
        Self {
            variation_id,
            name: String::new(),
            quantity,
            additional_price: None,
            half: None,
        }
    }
}

/// Selections within one variation group. Only rows with quantity above
/// zero are kept on a line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedGroup {
    /// The group selected from.
    pub group_id: GroupId,
    /// Group name captured for display.
    pub name: String,
    /// Selected rows, in group display order.
    pub variations: Vec<SelectedVariation>,
}

impl SelectedGroup {
    pub fn new(group_id: GroupId, name: impl Into<String>) -> Self {
        Self {
            group_id,
            name: name.into(),
            variations: Vec::new(),
        }
    }

    /// Sum of selected quantities across the group.
    pub fn total_quantity(&self) -> u32 {
        self.variations.iter().map(|v| v.quantity).sum()
    }
}

/// The border attached to a line, captured at selection time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedBorder {
    pub border_id: BorderId,
    pub name: String,
    pub additional_price: Money,
}

impl SelectedBorder {
    pub fn from_border(border: &Border) -> Self {
        Self {
            border_id: border.id.clone(),
            name: border.name.clone(),
            additional_price: border.additional_price,
        }
    }
}

/// What kind of product a line represents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LineKind {
    /// A regular catalog item.
    Standard,
    /// A half-and-half pizza synthesized from two flavors.
    HalfPizza(Combination),
}

impl LineKind {
    pub fn is_half_pizza(&self) -> bool {
        matches!(self, LineKind::HalfPizza(_))
    }

    /// The combination descriptor, when present.
    pub fn combination(&self) -> Option<&Combination> {
        match self {
            LineKind::Standard => None,
            LineKind::HalfPizza(c) => Some(c),
        }
    }
}

/// One configured, priced instance of a catalog item inside the cart.
///
/// Carries a snapshot of the item fields pricing needs; the catalog stays
/// authoritative for anything not captured here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// The underlying catalog item (synthetic for half pizzas).
    pub item_id: ItemId,
    /// Item name at selection time.
    pub name: String,
    /// Unit price. For half pizzas this is the combined price.
    pub unit_price: Money,
    /// Whether the unit price is informational only.
    pub price_from: bool,
    /// Whether this line waives the delivery fee.
    pub free_delivery: bool,
    /// Units of this configuration.
    pub quantity: u32,
    /// Selections with quantity above zero, group display order.
    pub groups: Vec<SelectedGroup>,
    /// At most one border.
    pub border: Option<SelectedBorder>,
    /// Standard or half-and-half.
    pub kind: LineKind,
}

impl CartLine {
    /// Create a one-unit line for an item with the given configuration.
    pub fn new(
        item: &CatalogItem,
        groups: Vec<SelectedGroup>,
        border: Option<SelectedBorder>,
        kind: LineKind,
    ) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.base_price,
            price_from: item.price_from,
            free_delivery: item.free_delivery,
            quantity: 1,
            groups,
            border,
            kind,
        }
    }

    /// Identity key for merge semantics: two lines are the same line iff
    /// item id, serialized selections and border id all match.
    pub fn identity_key(&self) -> String {
        let selections = serde_json::to_string(&self.groups).unwrap_or_default();
        let border = self
            .border
            .as_ref()
            .map(|b| b.border_id.as_str())
            .unwrap_or("");
        format!("{}|{}|{}", self.item_id, selections, border)
    }
}
