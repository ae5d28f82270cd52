pub mod classify;
pub mod core;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::error::{GenieError, Result};
use crate::value::ExampleValue;
use crate::{debug, debug_verbose};
use classify::{classify, detect_string_format, FieldType, StringFormat};
pub use self::core::{DebugVerbosity, GenieConfig, DEFAULT_MAX_DEPTH};

/// Key inside an example sub-object that opts it out of strict field validation.
pub const ALLOW_UNKNOWN_KEY: &str = "allow_unknown";

/// Link from an `objectid` field to the endpoint it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataRelation {
    pub resource: String,
    pub field: String,
    pub embeddable: bool,
}

impl DataRelation {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            field: "_id".to_string(),
            embeddable: true,
        }
    }
}

/// Inferred schema of a single field.
///
/// Each variant carries only the keys Eve expects for that kind of field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSchema {
    String,
    Boolean,
    /// `range` is set when the example was an integer range string such as `"1-10"`.
    Integer { range: Option<(i64, i64)> },
    Float { range: Option<(f64, f64)> },
    ObjectId { relation: DataRelation },
    Dict { fields: IndexMap<String, FieldSchema> },
    /// Schema of the last element seen; `None` for an empty example list.
    List { element: Option<Box<FieldSchema>> },
    Nullable,
    AllowUnknown(bool),
}

impl FieldSchema {
    /// The `type` this schema declares, or `None` for nullable and allow-unknown schemas.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            FieldSchema::String => Some(FieldType::String),
            FieldSchema::Boolean => Some(FieldType::Boolean),
            FieldSchema::Integer { .. } => Some(FieldType::Integer),
            FieldSchema::Float { .. } => Some(FieldType::Float),
            FieldSchema::ObjectId { .. } => Some(FieldType::ObjectId),
            FieldSchema::Dict { .. } => Some(FieldType::Dict),
            FieldSchema::List { .. } => Some(FieldType::List),
            FieldSchema::Nullable | FieldSchema::AllowUnknown(_) => None,
        }
    }

    /// Render as the mapping Eve loads, keys in their canonical order.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(field_type) = self.field_type() {
            map.insert("type".to_string(), json!(field_type.as_str()));
        }
        match self {
            FieldSchema::String | FieldSchema::Boolean => {}
            FieldSchema::Integer { range } => {
                if let Some((min, max)) = range {
                    map.insert("min".to_string(), json!(min));
                    map.insert("max".to_string(), json!(max));
                }
            }
            FieldSchema::Float { range } => {
                if let Some((min, max)) = range {
                    map.insert("min".to_string(), json!(min));
                    map.insert("max".to_string(), json!(max));
                }
            }
            FieldSchema::ObjectId { relation } => {
                map.insert(
                    "data_relation".to_string(),
                    json!({
                        "resource": relation.resource,
                        "field": relation.field,
                        "embeddable": relation.embeddable,
                    }),
                );
            }
            FieldSchema::Dict { fields } => {
                map.insert("schema".to_string(), fields_to_value(fields));
            }
            FieldSchema::List { element } => {
                let schema = element
                    .as_ref()
                    .map_or_else(|| Value::Object(Map::new()), |e| e.to_value());
                map.insert("schema".to_string(), schema);
            }
            FieldSchema::Nullable => {
                map.insert("nullable".to_string(), Value::Bool(true));
            }
            FieldSchema::AllowUnknown(flag) => {
                map.insert(ALLOW_UNKNOWN_KEY.to_string(), Value::Bool(*flag));
            }
        }
        Value::Object(map)
    }
}

impl Serialize for FieldSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn fields_to_value(fields: &IndexMap<String, FieldSchema>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(name, schema)| (name.clone(), schema.to_value()))
            .collect(),
    )
}

/// Schema of one endpoint, wrapped under the fixed `schema` key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointSchema {
    pub schema: IndexMap<String, FieldSchema>,
}

impl EndpointSchema {
    pub fn get(&self, field: &str) -> Option<&FieldSchema> {
        self.schema.get(field)
    }

    pub fn to_value(&self) -> Value {
        json!({ "schema": fields_to_value(&self.schema) })
    }
}

impl Serialize for EndpointSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Recursive builder turning example values into field schemas.
pub struct SchemaBuilder<'a> {
    config: &'a GenieConfig,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(config: &'a GenieConfig) -> Self {
        Self { config }
    }

    /// Build the schema of every field of one endpoint's example document, in order.
    #[cfg_attr(feature = "trace", tracing::instrument(skip(self, document)))]
    pub fn build_endpoint(
        &self,
        name: &str,
        document: &IndexMap<String, ExampleValue>,
    ) -> Result<EndpointSchema> {
        debug!(self.config, "endpoint '{}': {} field(s)", name, document.len());
        let schema = document
            .iter()
            .map(|(field, value)| Ok((field.clone(), self.build_field(field, value, 1)?)))
            .collect::<Result<IndexMap<_, _>>>()?;
        Ok(EndpointSchema { schema })
    }

    /// Build the schema of one example value found at the top of an endpoint document.
    pub fn build_item(&self, value: &ExampleValue) -> Result<FieldSchema> {
        self.build_at(value, 1)
    }

    fn build_field(&self, field: &str, value: &ExampleValue, depth: usize) -> Result<FieldSchema> {
        let schema = self.build_at(value, depth)?;
        debug_verbose!(
            self.config,
            "{:indent$}{}: {} -> {}",
            "",
            field,
            classify(value),
            schema.field_type().map_or("untyped", |t| t.as_str()),
            indent = depth * 2
        );
        Ok(schema)
    }

    fn build_at(&self, value: &ExampleValue, depth: usize) -> Result<FieldSchema> {
        if depth > self.config.max_depth {
            return Err(GenieError::MaxDepthExceeded {
                depth,
                max: self.config.max_depth,
            });
        }

        let schema = match value {
            ExampleValue::Null => FieldSchema::Nullable,
            ExampleValue::Boolean(_) => FieldSchema::Boolean,
            ExampleValue::Integer(_) => FieldSchema::Integer { range: None },
            ExampleValue::Float(_) => FieldSchema::Float { range: None },
            ExampleValue::Mapping(fields) => self.build_dict(fields, depth)?,
            ExampleValue::Sequence(items) => {
                // Lists are assumed homogeneous: the last element's schema stands for all.
                let mut element = None;
                for item in items {
                    element = Some(Box::new(self.build_at(item, depth + 1)?));
                }
                if items.len() > 1 {
                    debug_verbose!(
                        self.config,
                        "list of {} elements keeps the schema of the last one",
                        items.len()
                    );
                }
                FieldSchema::List { element }
            }
            ExampleValue::String(s) => match detect_string_format(s) {
                StringFormat::ObjectId(resource) => {
                    debug!(self.config, "objectid reference to '{}'", resource);
                    FieldSchema::ObjectId {
                        relation: DataRelation::new(resource),
                    }
                }
                StringFormat::IntRange(min, max) => FieldSchema::Integer {
                    range: Some((int_bound(min, s)?, int_bound(max, s)?)),
                },
                StringFormat::FloatRange(min, max) => FieldSchema::Float {
                    range: Some((min, max)),
                },
                StringFormat::Plain => FieldSchema::String,
            },
        };
        Ok(schema)
    }

    fn build_dict(
        &self,
        fields: &IndexMap<String, ExampleValue>,
        depth: usize,
    ) -> Result<FieldSchema> {
        if let Some(ExampleValue::Boolean(flag)) = fields.get(ALLOW_UNKNOWN_KEY) {
            debug!(
                self.config,
                "allow_unknown = {} replaces a dict of {} key(s)",
                flag,
                fields.len()
            );
            return Ok(FieldSchema::AllowUnknown(*flag));
        }

        let fields = fields
            .iter()
            .map(|(name, value)| Ok((name.clone(), self.build_field(name, value, depth + 1)?)))
            .collect::<Result<IndexMap<_, _>>>()?;
        Ok(FieldSchema::Dict { fields })
    }
}

/// Range bounds share the scalar integer width; wider digits are rejected like a
/// wide scalar integer.
fn int_bound(digits: &str, source: &str) -> Result<i64> {
    digits.parse().map_err(|_| {
        GenieError::TypeClassification(format!(
            "integer range '{}' outside the signed 64-bit range",
            source
        ))
    })
}
