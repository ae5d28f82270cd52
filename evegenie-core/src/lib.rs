//! Infer [Eve](https://python-eve.org) resource schemas from example JSON.
//!
//! The input is an object mapping each endpoint name to an example document. Every
//! field of every document is classified, recursively for nested objects and lists,
//! and the result can be read back as structured data, as JSON text, or rendered
//! into a ready-to-load `settings.py` module.
//!
//! ```
//! use evegenie_core::{EveGenie, FieldSchema};
//!
//! let genie = EveGenie::new(r#"{"user": {"name": "Turtle Man", "weapon": "objectid:artifact"}}"#)
//!     .unwrap();
//! assert_eq!(genie["user"].get("name"), Some(&FieldSchema::String));
//! assert_eq!(
//!     genie.to_string(),
//!     r#"{"user":{"schema":{"name":{"type":"string"},"weapon":{"type":"objectid","data_relation":{"resource":"artifact","field":"_id","embeddable":true}}}}}"#
//! );
//! ```

pub mod error;
pub mod format;
pub mod genie;
pub mod schema;
pub mod settings;
pub mod value;

// Re-export commonly used items
pub use error::{GenieError, Result};
pub use genie::{EveGenie, EveGenieBuilder, GenieInput};
pub use schema::classify::{classify, detect_string_format, FieldType, StringFormat};
pub use schema::{
    DataRelation, DebugVerbosity, EndpointSchema, FieldSchema, GenieConfig, SchemaBuilder,
};
pub use settings::{endpoint_identifiers, python_identifier, render_settings, SettingsConfig};
pub use value::ExampleValue;

/// Helper function to infer Eve schemas from JSON text
pub fn infer_eve_schema(json: &str, config: Option<GenieConfig>) -> Result<EveGenie> {
    EveGenie::with_config(json, &config.unwrap_or_default())
}

/// Create a default inference configuration
pub fn default_config() -> GenieConfig {
    GenieConfig::default()
}

#[cfg(test)]
mod tests {
    mod inference;
}
