//! Resource graph: the parameters and resources a template declares.
//!
//! The graph is read-only input to the indexer. It is deserialized from
//! the `resources` block of a service document and keeps every field it
//! does not interpret, so a resolved service serializes back unchanged.

mod input;
mod kind;

pub use input::{Parameter, Resource, ResourceGraph};
pub use kind::ResourceKind;
