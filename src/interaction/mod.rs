//! Interaction flows
//!
//! Translates pointer gestures into field-registry mutations: the
//! drag-and-drop lifecycle over rendered pages, and click-to-place from
//! the palette. The drag payload is a single typed contract: the field
//! kind's token string, decoded with [`FieldKind::from_token`].
//!
//! [`FieldKind::from_token`]: crate::palette::FieldKind::from_token

mod controller;

pub use controller::InteractionController;
