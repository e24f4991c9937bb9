//! Form engine for `.docx` templates
//!
//! - [`extract`]: derive a [`TemplateSchema`](form_types::TemplateSchema)
//!   of sections, fields, anchors and rules from a template
//! - [`fill`]: write form data into a copy of the template at each field's
//!   anchor, reporting values that could not be placed
//! - [`render`]: produce a PDF copy through an external converter
//! - [`service`]: the generation pipeline tying these to external stores

pub mod config;
pub mod errors;
pub mod extract;
pub mod fill;
pub mod render;
pub mod service;

pub use config::EngineConfig;
pub use errors::EngineError;
pub use extract::{extract, extract_from_bytes, extract_from_path, generate_field_id};
pub use fill::{fill, fill_document, fill_with_options, FillOptions, FilledDocument};
pub use render::{
    render_to_fixed_layout, FixedLayoutRenderer, RenderConfig, RenderError, SofficeRenderer,
};
pub use service::{
    generate, DocumentService, FormDataStore, FormRecord, GenerateRequest, GeneratedPathSink,
    SchemaStore, TemplateRecord,
};
