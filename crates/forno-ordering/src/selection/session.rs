//! Variation selection state machine.

use crate::cart::{CartLine, HalfSelection, LineKind, SelectedBorder, SelectedGroup, SelectedVariation};
use crate::catalog::{CatalogItem, CatalogView, GroupStatus, VariationGroup};
use crate::combo::{CombinedItem, Combination};
use crate::error::OrderingError;
use crate::ids::{BorderId, GroupId, VariationId};
use crate::money::Money;
use crate::pricing;

/// Observable phase of a selection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    /// Dialog opened, no quantities set.
    Empty,
    /// At least one selection made.
    Editing,
    /// An increment is paused until a half is chosen.
    ChoosingHalf,
}

/// Result of an increase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncreaseOutcome {
    /// The increment was committed.
    Incremented,
    /// The increment is parked until `choose_half` commits it.
    NeedsHalfChoice,
    /// The group is at its maximum, or another increment is pending.
    Blocked,
}

/// One selectable row inside a group.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRow {
    pub variation_id: VariationId,
    /// Name at dialog-open time, for display while selecting.
    pub name: String,
    /// Price at dialog-open time, for the live preview.
    pub additional_price: Money,
    pub quantity: u32,
    pub half: Option<HalfSelection>,
}

#[derive(Debug, Clone)]
struct GroupState {
    def: VariationGroup,
    rows: Vec<SelectionRow>,
}

impl GroupState {
    fn total(&self) -> u32 {
        self.rows.iter().map(|r| r.quantity).sum()
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingIncrement {
    group_index: usize,
    row_index: usize,
}

/// An in-progress configuration of one catalog item.
///
/// Owns a snapshot of the item (synthetic for half pizzas) and one row per
/// available variation per group. Confirming re-reads every name and price
/// from the catalog; nothing held here is trusted at the boundary.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    item: CatalogItem,
    combination: Option<Combination>,
    groups: Vec<GroupState>,
    border: Option<BorderId>,
    pending: Option<PendingIncrement>,
}

impl SelectionSession {
    /// Open a session for a standard item.
    pub fn new(item: CatalogItem, view: &CatalogView) -> Self {
        let groups = Self::seed_groups(&item, view);
        Self {
            item,
            combination: None,
            groups,
            border: None,
            pending: None,
        }
    }

    /// Open a session for a half-and-half combination.
    pub fn for_combination(combined: CombinedItem, view: &CatalogView) -> Self {
        let groups = Self::seed_groups(&combined.item, view);
        Self {
            item: combined.item,
            combination: Some(combined.combination),
            groups,
            border: None,
            pending: None,
        }
    }

    /// Open a session seeded from an existing cart line (edit mode).
    ///
    /// Quantities and per-half tags carry over; rows the catalog no longer
    /// offers are simply absent.
    pub fn edit(item: CatalogItem, line: &CartLine, view: &CatalogView) -> Self {
        let combination = line.kind.combination().cloned();
        let mut groups = Self::seed_groups(&item, view);

        for selected_group in &line.groups {
            if let Some(group) = groups.iter_mut().find(|g| g.def.id == selected_group.group_id) {
                for selected in &selected_group.variations {
                    if let Some(row) = group
                        .rows
                        .iter_mut()
                        .find(|r| r.variation_id == selected.variation_id)
                    {
                        row.quantity = selected.quantity;
                        row.half = selected.half;
                    }
                }
            }
        }

        Self {
            item,
            combination,
            groups,
            border: line.border.as_ref().map(|b| b.border_id.clone()),
            pending: None,
        }
    }

    fn seed_groups(item: &CatalogItem, view: &CatalogView) -> Vec<GroupState> {
        item.variation_groups
            .iter()
            .map(|group| {
                let rows = view
                    .variations_for_group(group, item)
                    .into_iter()
                    .map(|v| SelectionRow {
                        variation_id: v.id.clone(),
                        name: v.name.clone(),
                        additional_price: v.additional_price,
                        quantity: 0,
                        half: None,
                    })
                    .collect();
                GroupState {
                    def: group.clone(),
                    rows,
                }
            })
            .collect()
    }

    /// The item being configured.
    pub fn item(&self) -> &CatalogItem {
        &self.item
    }

    /// Current phase.
    pub fn phase(&self) -> SelectionPhase {
        if self.pending.is_some() {
            SelectionPhase::ChoosingHalf
        } else if self.groups.iter().any(|g| g.total() > 0) {
            SelectionPhase::Editing
        } else {
            SelectionPhase::Empty
        }
    }

    /// Groups and their rows, in display order.
    pub fn groups(&self) -> impl Iterator<Item = (&VariationGroup, &[SelectionRow])> {
        self.groups.iter().map(|g| (&g.def, g.rows.as_slice()))
    }

    /// The currently selected border id.
    pub fn border(&self) -> Option<&BorderId> {
        self.border.as_ref()
    }

    /// Attempt to add one unit of a variation.
    pub fn increase(&mut self, group_id: &GroupId, variation_id: &VariationId) -> IncreaseOutcome {
        if self.pending.is_some() {
            return IncreaseOutcome::Blocked;
        }

        let Some(group_index) = self.groups.iter().position(|g| &g.def.id == group_id) else {
            return IncreaseOutcome::Blocked;
        };
        let group = &self.groups[group_index];
        if group.total() >= group.def.max_allowed {
            return IncreaseOutcome::Blocked;
        }
        let Some(row_index) = group
            .rows
            .iter()
            .position(|r| &r.variation_id == variation_id)
        else {
            return IncreaseOutcome::Blocked;
        };

        if self.combination.is_some() && group.def.allow_per_half {
            self.pending = Some(PendingIncrement {
                group_index,
                row_index,
            });
            return IncreaseOutcome::NeedsHalfChoice;
        }

        self.groups[group_index].rows[row_index].quantity += 1;
        IncreaseOutcome::Incremented
    }

    /// Commit the pending increment with the chosen half.
    ///
    /// Returns false when no increment is pending.
    pub fn choose_half(&mut self, half: HalfSelection) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let row = &mut self.groups[pending.group_index].rows[pending.row_index];
        row.quantity += 1;
        row.half = Some(half);
        true
    }

    /// Discard the pending increment without committing it.
    pub fn cancel_half_choice(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Remove one unit of a variation. The half tag clears once the row
    /// returns to zero.
    pub fn decrease(&mut self, group_id: &GroupId, variation_id: &VariationId) -> bool {
        if self.pending.is_some() {
            return false;
        }
        let Some(group) = self.groups.iter_mut().find(|g| &g.def.id == group_id) else {
            return false;
        };
        let Some(row) = group
            .rows
            .iter_mut()
            .find(|r| &r.variation_id == variation_id)
        else {
            return false;
        };
        if row.quantity == 0 {
            return false;
        }
        row.quantity -= 1;
        if row.quantity == 0 {
            row.half = None;
        }
        true
    }

    /// Select a border, replacing any previous choice. `None` clears it.
    pub fn select_border(&mut self, border_id: Option<BorderId>) -> Result<(), OrderingError> {
        let Some(border_id) = border_id else {
            self.border = None;
            return Ok(());
        };
        if !self.item.is_pizza {
            return Err(OrderingError::BorderNotAllowed(self.item.id.to_string()));
        }
        let exists = self
            .item
            .available_borders()
            .any(|b| b.id == border_id);
        if !exists {
            return Err(OrderingError::BorderNotFound(border_id.to_string()));
        }
        self.border = Some(border_id);
        Ok(())
    }

    /// Selection status for one group.
    pub fn group_status(&self, group_id: &GroupId) -> Option<GroupStatus> {
        self.groups.iter().find(|g| &g.def.id == group_id).map(|g| {
            let total = g.total();
            GroupStatus {
                total,
                min: g.def.min_required,
                max: g.def.max_allowed,
                valid: g.def.accepts(total),
            }
        })
    }

    /// The group's message rendered for the current selection count.
    pub fn message(&self, group_id: &GroupId) -> Option<String> {
        self.groups
            .iter()
            .find(|g| &g.def.id == group_id)
            .map(|g| g.def.render_message(g.total()))
    }

    /// Whether every group satisfies its bounds and no increment is pending.
    pub fn is_valid(&self) -> bool {
        self.pending.is_none() && self.groups.iter().all(|g| g.def.accepts(g.total()))
    }

    /// Whether confirm is currently enabled.
    pub fn can_confirm(&self) -> bool {
        self.is_valid()
    }

    /// Message of the first group violating its bounds.
    pub fn invalid_message(&self) -> Option<String> {
        self.groups
            .iter()
            .find(|g| !g.def.accepts(g.total()))
            .map(|g| g.def.render_message(g.total()))
    }

    /// Live preview of the configured line's total.
    ///
    /// Uses the same calculator as the cart and finalization so the three
    /// surfaces agree to the cent.
    pub fn preview_total(&self, view: &CatalogView) -> Result<Money, OrderingError> {
        pricing::line_total(&self.build_line(view), view)
    }

    /// Confirm the configuration and produce a cart line.
    ///
    /// Zero-quantity rows are dropped and every kept row is re-enriched
    /// with the authoritative catalog name and price.
    pub fn confirm(&self, view: &CatalogView) -> Result<CartLine, OrderingError> {
        if self.pending.is_some() {
            return Err(OrderingError::HalfChoicePending);
        }
        if let Some(message) = self.invalid_message() {
            return Err(OrderingError::GroupSelection { message });
        }
        Ok(self.build_line(view))
    }

    /// Discard the in-progress configuration.
    pub fn cancel(self) {}

    fn build_line(&self, view: &CatalogView) -> CartLine {
        let groups = self
            .groups
            .iter()
            .filter_map(|group| {
                let variations: Vec<SelectedVariation> = group
                    .rows
                    .iter()
                    .filter(|r| r.quantity > 0)
                    .map(|r| SelectedVariation {
                        variation_id: r.variation_id.clone(),
                        name: view
                            .variation(&r.variation_id)
                            .map(|v| v.name.clone())
                            .unwrap_or_else(|| r.name.clone()),
                        quantity: r.quantity,
                        additional_price: Some(view.price_of(&r.variation_id)),
                        half: r.half,
                    })
                    .collect();
                if variations.is_empty() {
                    None
                } else {
                    let mut selected = SelectedGroup::new(group.def.id.clone(), group.def.name.clone());
                    selected.variations = variations;
                    Some(selected)
                }
            })
            .collect();

        let border = self
            .border
            .as_ref()
            .and_then(|id| self.item.border(id))
            .map(SelectedBorder::from_border);

        let kind = match &self.combination {
            Some(c) => LineKind::HalfPizza(c.clone()),
            None => LineKind::Standard,
        };

        CartLine::new(&self.item, groups, border, kind)
    }
}
