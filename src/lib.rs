//! Fieldmap Engine Library
//!
//! Core engine for a signature/form-template authoring tool: load a PDF or
//! Word document, overlay interactive form fields onto rendered pages (PDF)
//! or an editable HTML transcript (Word), and produce a normalized list of
//! mapped fields with page-relative geometry.
//!
//! # Modules
//!
//! - `document`: load/render pipeline, converter and renderer seams
//! - `fields`: mapped-field registry, naming, editing surface
//! - `interaction`: drag-and-drop and click-to-place flows
//! - `geometry`: coordinate normalization and field-size presets
//! - `palette`: the catalog of placeable field kinds
//! - `state`: the session state object all of the above operate on

pub mod config;
pub mod document;
pub mod fields;
pub mod geometry;
pub mod interaction;
pub mod palette;
pub mod state;
