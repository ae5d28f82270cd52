//! Maps example values to Eve schema type tags.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::value::ExampleValue;

static OBJECT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^objectid:\s*(.+)$").expect("valid objectid pattern"));
static INT_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\s*-\s*([0-9]+)$").expect("valid integer range pattern"));
static FLOAT_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9.]+)\s*-\s*([0-9.]+)$").expect("valid float range pattern")
});

/// Eve schema type tag.
///
/// `Null` never appears as a `type` in the output; it routes a field to the
/// nullable schema instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Dict,
    List,
    ObjectId,
    Null,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Dict => "dict",
            FieldType::List => "list",
            FieldType::ObjectId => "objectid",
            FieldType::Null => "null",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Special string forms recognised in example data.
#[derive(Debug, Clone, PartialEq)]
pub enum StringFormat<'a> {
    /// `objectid:<resource>`, a reference to another endpoint.
    ObjectId(&'a str),
    /// `<low>-<high>` with integer bounds, kept as the matched digits.
    /// Conversion to `i64` happens in the builder, which rejects overflow.
    IntRange(&'a str, &'a str),
    /// `<low>-<high>` with float bounds.
    FloatRange(f64, f64),
    Plain,
}

impl StringFormat<'_> {
    pub fn field_type(&self) -> FieldType {
        match self {
            StringFormat::ObjectId(_) => FieldType::ObjectId,
            StringFormat::IntRange(..) => FieldType::Integer,
            StringFormat::FloatRange(..) => FieldType::Float,
            StringFormat::Plain => FieldType::String,
        }
    }
}

/// Detect the special form of a string, checking object references first, then
/// integer ranges, then float ranges.
///
/// The resource name of an object reference is trimmed and may end up empty
/// (`"objectid:   "`). A float range whose bounds do not parse as `f64` (such as
/// `"1.2.3-4"`) stays a plain string.
pub fn detect_string_format(s: &str) -> StringFormat<'_> {
    if let Some(caps) = OBJECT_ID.captures(s) {
        let resource = caps.get(1).map_or("", |m| m.as_str()).trim();
        return StringFormat::ObjectId(resource);
    }
    if let Some(caps) = INT_RANGE.captures(s) {
        if let (Some(low), Some(high)) = (caps.get(1), caps.get(2)) {
            return StringFormat::IntRange(low.as_str(), high.as_str());
        }
    }
    if let Some((low, high)) = parse_float_range(s) {
        return StringFormat::FloatRange(low, high);
    }
    StringFormat::Plain
}

fn parse_float_range(s: &str) -> Option<(f64, f64)> {
    let caps = FLOAT_RANGE.captures(s)?;
    let low = caps.get(1)?.as_str().parse().ok()?;
    let high = caps.get(2)?.as_str().parse().ok()?;
    Some((low, high))
}

/// Classify one example value.
///
/// Booleans are matched before any numeric kind, so `true` is never an integer.
pub fn classify(value: &ExampleValue) -> FieldType {
    match value {
        ExampleValue::Boolean(_) => FieldType::Boolean,
        ExampleValue::Integer(_) => FieldType::Integer,
        ExampleValue::Float(_) => FieldType::Float,
        ExampleValue::Mapping(_) => FieldType::Dict,
        ExampleValue::Sequence(_) => FieldType::List,
        ExampleValue::Null => FieldType::Null,
        ExampleValue::String(s) => detect_string_format(s).field_type(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(classify(&"snowman".into()), FieldType::String);
        assert_eq!(classify(&"☃".into()), FieldType::String);
        assert_eq!(classify(&true.into()), FieldType::Boolean);
        assert_eq!(classify(&false.into()), FieldType::Boolean);
        assert_eq!(classify(&42i64.into()), FieldType::Integer);
        assert_eq!(classify(&4.2f64.into()), FieldType::Float);
        assert_eq!(classify(&ExampleValue::Null), FieldType::Null);
    }

    #[test]
    fn test_container_kinds() {
        let mut fields = IndexMap::new();
        fields.insert("a".to_string(), ExampleValue::from("b"));
        assert_eq!(classify(&ExampleValue::Mapping(fields)), FieldType::Dict);
        assert_eq!(classify(&vec![1i64, 2, 3].into()), FieldType::List);
    }

    #[test]
    fn test_classification_is_pure() {
        for value in [
            ExampleValue::from("objectid:test"),
            ExampleValue::from("1-10"),
            ExampleValue::from(7i64),
        ] {
            assert_eq!(classify(&value), classify(&value));
        }
    }

    #[test]
    fn test_objectid_strings() {
        assert_eq!(classify(&"objectid:test".into()), FieldType::ObjectId);
        assert_eq!(
            detect_string_format("objectid:artifact"),
            StringFormat::ObjectId("artifact")
        );
        assert_eq!(
            detect_string_format("objectid: artifact"),
            StringFormat::ObjectId("artifact")
        );
        // Prefix is case-sensitive and anchored
        assert_eq!(detect_string_format("ObjectId:artifact"), StringFormat::Plain);
        assert_eq!(detect_string_format("my objectid:artifact"), StringFormat::Plain);
        assert_eq!(detect_string_format("objectid:   "), StringFormat::ObjectId(""));
        assert_eq!(classify(&"objectid:   ".into()), FieldType::ObjectId);
        // `.+` needs at least one character after the prefix
        assert_eq!(detect_string_format("objectid:"), StringFormat::Plain);
    }

    #[test]
    fn test_range_strings() {
        assert_eq!(classify(&"1-10".into()), FieldType::Integer);
        assert_eq!(detect_string_format("1-10"), StringFormat::IntRange("1", "10"));
        assert_eq!(detect_string_format("5 - 25"), StringFormat::IntRange("5", "25"));
        assert_eq!(classify(&"0.0-1.0".into()), FieldType::Float);
        assert_eq!(
            detect_string_format("0.0-1.0"),
            StringFormat::FloatRange(0.0, 1.0)
        );
        assert_eq!(detect_string_format("2-3.5"), StringFormat::FloatRange(2.0, 3.5));
    }

    #[test]
    fn test_range_lookalikes_stay_strings() {
        assert_eq!(detect_string_format("1.2.3-4"), StringFormat::Plain);
        assert_eq!(detect_string_format("-1-10"), StringFormat::Plain);
        assert_eq!(detect_string_format("1-10 apples"), StringFormat::Plain);
        assert_eq!(detect_string_format("2024-01-15"), StringFormat::Plain);
    }

    #[test]
    fn test_oversized_int_range_stays_integer() {
        let s = "1-99999999999999999999";
        assert_eq!(
            detect_string_format(s),
            StringFormat::IntRange("1", "99999999999999999999")
        );
        assert_eq!(classify(&s.into()), FieldType::Integer);
    }

    #[test]
    fn test_field_type_serde_names() {
        assert_eq!(
            serde_json::to_value(FieldType::ObjectId).unwrap(),
            serde_json::json!("objectid")
        );
        let tags: Vec<FieldType> =
            serde_json::from_str(r#"["string", "integer", "float", "dict", "null"]"#).unwrap();
        assert_eq!(
            tags,
            [
                FieldType::String,
                FieldType::Integer,
                FieldType::Float,
                FieldType::Dict,
                FieldType::Null
            ]
        );
        for tag in tags {
            assert_eq!(serde_json::to_value(tag).unwrap(), tag.as_str());
        }
    }
}
