use std::fmt;
use std::fs;
use std::ops::Index;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::debug;
use crate::error::{GenieError, Result};
use crate::format::format_endpoint;
use crate::schema::{EndpointSchema, GenieConfig, SchemaBuilder};
use crate::settings::{render_settings, SettingsConfig};
use crate::value::{decode_at, ExampleValue};

/// Example data handed to the inferrer: endpoint name -> example document.
#[derive(Debug, Clone)]
pub enum GenieInput {
    /// Raw JSON text, parsed with key order preserved.
    Text(String),
    /// Parsed JSON object.
    Json(Map<String, Value>),
    /// Already-decoded example documents.
    Examples(IndexMap<String, ExampleValue>),
}

impl From<&str> for GenieInput {
    fn from(text: &str) -> Self {
        GenieInput::Text(text.to_string())
    }
}

impl From<String> for GenieInput {
    fn from(text: String) -> Self {
        GenieInput::Text(text)
    }
}

impl From<Map<String, Value>> for GenieInput {
    fn from(map: Map<String, Value>) -> Self {
        GenieInput::Json(map)
    }
}

impl From<IndexMap<String, ExampleValue>> for GenieInput {
    fn from(map: IndexMap<String, ExampleValue>) -> Self {
        GenieInput::Examples(map)
    }
}

impl TryFrom<Value> for GenieInput {
    type Error = GenieError;

    /// Only JSON strings (treated as JSON text) and objects are accepted.
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(GenieInput::Text(text)),
            Value::Object(map) => Ok(GenieInput::Json(map)),
            other => Err(GenieError::InputType(json_kind(&other).to_string())),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Eve schemas inferred from example data, one per endpoint, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EveGenie {
    endpoints: IndexMap<String, EndpointSchema>,
}

impl EveGenie {
    /// Infer schemas from JSON text, a parsed JSON object, or decoded examples.
    pub fn new(input: impl Into<GenieInput>) -> Result<Self> {
        Self::with_config(input, &GenieConfig::default())
    }

    pub fn with_config(input: impl Into<GenieInput>, config: &GenieConfig) -> Result<Self> {
        Self::from_input(input.into(), config)
    }

    pub fn builder() -> EveGenieBuilder {
        EveGenieBuilder::default()
    }

    /// Infer schemas from a JSON file. A missing file is reported as missing input.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().filename(path.as_ref()).build()
    }

    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    fn from_input(input: GenieInput, config: &GenieConfig) -> Result<Self> {
        let documents = match input {
            GenieInput::Text(text) => {
                let value: Value = serde_json::from_str(&text)?;
                decode_documents(expect_object(value)?, config)?
            }
            GenieInput::Json(map) => decode_documents(map, config)?,
            GenieInput::Examples(examples) => examples
                .into_iter()
                .map(|(name, document)| match document {
                    ExampleValue::Mapping(fields) => Ok((name, fields)),
                    other => Err(endpoint_not_mapping(&name, other.kind())),
                })
                .collect::<Result<IndexMap<_, _>>>()?,
        };
        Self::from_documents(&documents, config)
    }

    fn from_documents(
        documents: &IndexMap<String, IndexMap<String, ExampleValue>>,
        config: &GenieConfig,
    ) -> Result<Self> {
        let builder = SchemaBuilder::new(config);
        let endpoints = documents
            .iter()
            .map(|(name, document)| Ok((name.clone(), builder.build_endpoint(name, document)?)))
            .collect::<Result<IndexMap<_, _>>>()?;
        debug!(config, "inferred {} endpoint schema(s)", endpoints.len());
        Ok(Self { endpoints })
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn get(&self, endpoint: &str) -> Option<&EndpointSchema> {
        self.endpoints.get(endpoint)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, EndpointSchema> {
        self.endpoints.iter()
    }

    pub fn endpoints(&self) -> &IndexMap<String, EndpointSchema> {
        &self.endpoints
    }

    /// The root output as a plain JSON object.
    pub fn to_map(&self) -> Map<String, Value> {
        self.endpoints
            .iter()
            .map(|(name, schema)| (name.clone(), schema.to_value()))
            .collect()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    /// Render one endpoint schema as a Python literal for the settings module.
    pub fn format_endpoint(&self, endpoint: &EndpointSchema) -> String {
        format_endpoint(endpoint)
    }

    /// Endpoint name -> Python literal, the mapping the settings template consumes.
    pub fn formatted_endpoints(&self) -> IndexMap<String, String> {
        self.endpoints
            .iter()
            .map(|(name, schema)| (name.clone(), format_endpoint(schema)))
            .collect()
    }

    pub fn render_settings(&self, config: &SettingsConfig) -> String {
        render_settings(self, config)
    }
}

fn expect_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(GenieError::InputType(format!(
            "top-level JSON is {}, expected an object of endpoints",
            json_kind(&other)
        ))),
    }
}

fn endpoint_not_mapping(name: &str, kind: &str) -> GenieError {
    GenieError::InputType(format!(
        "endpoint '{}' is {}, expected a mapping of fields",
        name, kind
    ))
}

fn decode_documents(
    map: Map<String, Value>,
    config: &GenieConfig,
) -> Result<IndexMap<String, IndexMap<String, ExampleValue>>> {
    map.into_iter()
        .map(|(name, document)| {
            let fields = match document {
                Value::Object(fields) => fields,
                other => return Err(endpoint_not_mapping(&name, json_kind(&other))),
            };
            let fields = fields
                .iter()
                .map(|(field, value)| Ok((field.clone(), decode_at(value, 1, config.max_depth)?)))
                .collect::<Result<IndexMap<_, _>>>()?;
            Ok((name, fields))
        })
        .collect()
}

impl Index<&str> for EveGenie {
    type Output = EndpointSchema;

    /// Panics if the endpoint does not exist, like `IndexMap`'s own indexing.
    fn index(&self, endpoint: &str) -> &EndpointSchema {
        &self.endpoints[endpoint]
    }
}

impl<'a> IntoIterator for &'a EveGenie {
    type Item = (&'a String, &'a EndpointSchema);
    type IntoIter = indexmap::map::Iter<'a, String, EndpointSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.endpoints.iter()
    }
}

impl Serialize for EveGenie {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Compact JSON text of the root output.
impl fmt::Display for EveGenie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// Builder mirroring the two ways of supplying examples: in-memory data or a file.
///
/// In-memory data takes precedence; the file is only read when no data was given.
#[derive(Debug, Default)]
pub struct EveGenieBuilder {
    data: Option<GenieInput>,
    filename: Option<PathBuf>,
    config: GenieConfig,
}

impl EveGenieBuilder {
    pub fn data(mut self, data: impl Into<GenieInput>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn filename(mut self, path: impl Into<PathBuf>) -> Self {
        self.filename = Some(path.into());
        self
    }

    pub fn config(mut self, config: GenieConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<EveGenie> {
        let data = match (self.data, self.filename) {
            (Some(data), _) => Some(data),
            (None, Some(path)) if path.is_file() => {
                debug!(self.config, "reading examples from {}", path.display());
                Some(GenieInput::Text(fs::read_to_string(&path)?.trim().to_string()))
            }
            (None, _) => None,
        };

        match data {
            Some(input) => EveGenie::from_input(input, &self.config),
            None => Err(GenieError::InputType("no data supplied".to_string())),
        }
    }
}
