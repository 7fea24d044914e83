//! Checklist configuration model.
//!
//! Holds the actor rows, task rows, columns and per-cell types of one
//! workflow step, and converts between that state and the step document
//! the workflow API stores.

mod error;
mod hydrate;
mod model;
mod serialize;
mod types;

pub use error::ChecklistError;
pub use hydrate::{hydrate, Hydrated};
pub use model::{ActorField, CellKey, ChecklistModel, Edit};
pub use serialize::{custom_cell_key, http_date, serialize, serialize_step, PLACEHOLDER};
pub use types::*;
