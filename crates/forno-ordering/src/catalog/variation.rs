//! Variation and variation group types.

use crate::ids::{CategoryId, GroupId, VariationId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Default message shown when a group has no custom template.
const DEFAULT_MESSAGE_TEMPLATE: &str = "Choose between {min} and {max} options ({count} selected)";

/// A group of variations with selection cardinality rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariationGroup {
    /// Unique group identifier.
    pub id: GroupId,
    /// Customer-facing display name.
    pub name: String,
    /// Internal name, not shown to customers.
    pub internal_name: String,
    /// Minimum required selections across the group.
    pub min_required: u32,
    /// Maximum allowed selections across the group.
    pub max_allowed: u32,
    /// Message template with `{min}`, `{max}` and `{count}` placeholders.
    pub message_template: Option<String>,
    /// Whether this group is offered on half-and-half pizzas.
    pub apply_to_half_pizza: bool,
    /// Whether selections in this group can target one half of a combination.
    pub allow_per_half: bool,
    /// Variations belonging to this group, in display order.
    pub variation_ids: Vec<VariationId>,
}

impl VariationGroup {
    /// Create a new group.
    pub fn new(
        id: GroupId,
        name: impl Into<String>,
        min_required: u32,
        max_allowed: u32,
    ) -> Self {
        let name = name.into();
        Self {
            id,
            internal_name: name.clone(),
            name,
            min_required,
            max_allowed,
            message_template: None,
            apply_to_half_pizza: false,
            allow_per_half: false,
            variation_ids: Vec::new(),
        }
    }

    /// Whether `total` selections satisfy this group's bounds.
    pub fn accepts(&self, total: u32) -> bool {
        total >= self.min_required && total <= self.max_allowed
    }

    /// Render the group's message for the given selection count.
    pub fn render_message(&self, count: u32) -> String {
        let template = self
            .message_template
            .as_deref()
            .unwrap_or(DEFAULT_MESSAGE_TEMPLATE);
        template
            .replace("{min}", &self.min_required.to_string())
            .replace("{max}", &self.max_allowed.to_string())
            .replace("{count}", &count.to_string())
    }
}

/// An add-on or modifier with its own price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variation {
    /// Unique variation identifier.
    pub id: VariationId,
    /// Display name.
    pub name: String,
    /// Price added per unit selected. Never negative.
    pub additional_price: Money,
    /// Whether the variation can currently be ordered.
    pub available: bool,
    /// Categories this variation applies to. Empty means all categories.
    pub applies_to: Vec<CategoryId>,
}

impl Variation {
    /// Create a new available variation.
    pub fn new(id: VariationId, name: impl Into<String>, additional_price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            additional_price,
            available: true,
            applies_to: Vec::new(),
        }
    }

    /// Whether this variation applies to an item in the given categories.
    pub fn applies_to_categories(&self, category_ids: &[CategoryId]) -> bool {
        self.applies_to.is_empty() || self.applies_to.iter().any(|c| category_ids.contains(c))
    }
}

/// Aggregate selection status for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStatus {
    /// Sum of selected quantities across the group.
    pub total: u32,
    /// Minimum required selections.
    pub min: u32,
    /// Maximum allowed selections.
    pub max: u32,
    /// Whether the total satisfies the bounds.
    pub valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_group_accepts() {
        let group = VariationGroup::new(GroupId::new("size"), "Size", 1, 1);
        assert!(!group.accepts(0));
        assert!(group.accepts(1));
        assert!(!group.accepts(2));
    }

    #[test]
    fn test_message_template() {
        let mut group = VariationGroup::new(GroupId::new("toppings"), "Toppings", 0, 3);
        group.message_template = Some("Pick up to {max} toppings, {count} so far".to_string());
        assert_eq!(group.render_message(2), "Pick up to 3 toppings, 2 so far");
    }

    #[test]
    fn test_default_message_template() {
        let group = VariationGroup::new(GroupId::new("size"), "Size", 1, 1);
        assert_eq!(
            group.render_message(0),
            "Choose between 1 and 1 options (0 selected)"
        );
    }

    #[test]
    fn test_variation_category_applicability() {
        let mut variation = Variation::new(
            VariationId::new("extra-cheese"),
            "Extra cheese",
            Money::new(400, Currency::BRL),
        );
        let pizzas = CategoryId::new("pizzas");
        let drinks = CategoryId::new("drinks");

        // Empty applies_to means every category.
        assert!(variation.applies_to_categories(&[drinks.clone()]));

        variation.applies_to = vec![pizzas.clone()];
        assert!(variation.applies_to_categories(&[pizzas]));
        assert!(!variation.applies_to_categories(&[drinks]));
    }
}
