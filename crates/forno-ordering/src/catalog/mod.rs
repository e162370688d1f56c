//! Menu catalog module.
//!
//! Read-only types for items, variation groups, variations and borders,
//! plus the in-memory view the rest of the engine queries.

mod item;
mod variation;
mod view;

pub use item::{Border, CatalogItem};
pub use variation::{GroupStatus, Variation, VariationGroup};
pub use view::{CatalogSource, CatalogView};
