//! JSON Schema generation for the Orientation Lock configuration.

use crate::config::OrientationConfig;

/// Generates a JSON Schema for the configuration.
///
/// The schema includes all configuration options with their types,
/// descriptions, and default values.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(OrientationConfig);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert(
            "$id".to_string(),
            serde_json::json!("https://orientation-lock.dev/orientation-lock.schema.json"),
        );
    }

    schema
}

/// Generates a pretty-printed JSON Schema string for the configuration.
#[must_use]
pub fn generate_schema_json() -> String {
    let schema = generate_schema();
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// Returns the schema as printed by the `schema` command.
#[must_use]
pub fn print_schema() -> String { generate_schema_json() }
