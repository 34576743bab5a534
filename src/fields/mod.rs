//! Mapped fields
//!
//! The in-memory registry of user-placed form fields, machine-safe name
//! synthesis, and the single-field editing surface.

mod editor;
mod naming;
mod registry;
mod types;

pub use editor::apply_patch;
pub use naming::{normalize_name, placeholder_token};
pub use registry::FieldRegistry;
pub use types::{FieldPatch, MappedField};
