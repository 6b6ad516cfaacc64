//! Wire types for the OTAPI `service-json` endpoints.
//!
//! Product records are kept as open JSON maps ([`RawProduct`]) because the
//! marketplace ships wildly inconsistent shapes across providers; the
//! extractors in [`crate::extract`] read them field by field. Envelopes and
//! categories are typed since their shape is stable.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One loosely-structured product record as returned by search or detail
/// calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawProduct(Map<String, Value>);

impl RawProduct {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wraps a JSON value, returning `None` unless it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The upstream item id, stringified when the upstream sends a number.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match field(&self.0, "Id")? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for RawProduct {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Application-level status code carried by every OTAPI envelope.
///
/// The upstream sends either `0` or a string such as `"Ok"` / `"NotFound"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Numeric(i64),
    Text(String),
}

impl ErrorCode {
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            ErrorCode::Numeric(code) => *code == 0,
            ErrorCode::Text(code) => code == "0" || code == "Ok",
        }
    }
}

impl Default for ErrorCode {
    fn default() -> Self {
        ErrorCode::Text(String::new())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Numeric(code) => write!(f, "{code}"),
            ErrorCode::Text(code) => f.write_str(code),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchItemsFrameResponse {
    #[serde(default)]
    pub error_code: ErrorCode,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub result: Option<SearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResult {
    #[serde(default)]
    pub items: Option<ItemFrame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemFrame {
    #[serde(default)]
    pub content: Vec<RawProduct>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemFullInfoResponse {
    #[serde(default)]
    pub error_code: ErrorCode,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(rename = "OtapiItemFullInfo", default)]
    pub item: Option<RawProduct>,
}

/// A category node as returned by the navigation endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawCategory {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub external_id: Option<String>,
    #[serde(default)]
    pub is_parent: Option<bool>,
    #[serde(default)]
    pub is_hidden: Option<bool>,
    #[serde(default)]
    pub provider_type: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub parent_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub parent_category_id: Option<String>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub subcategories: Option<Vec<RawCategory>>,
    #[serde(default)]
    pub children: Option<Vec<RawCategory>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContentList<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
}

/// Shared envelope of the category navigation endpoints. Each endpoint fills
/// a different subset of the list fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryListResponse {
    #[serde(default)]
    pub error_code: ErrorCode,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub category_info_list: Option<ContentList<RawCategory>>,
    #[serde(default)]
    pub content: Option<Vec<RawCategory>>,
    #[serde(default)]
    pub category_path: Option<Vec<RawCategory>>,
    #[serde(default)]
    pub request_id: Option<Value>,
    #[serde(default)]
    pub request_time: Option<Value>,
}

impl CategoryListResponse {
    /// Takes the first populated list: `CategoryInfoList.Content`, then
    /// `Content`, then `CategoryPath`.
    #[must_use]
    pub fn take_categories(&mut self) -> Vec<RawCategory> {
        if let Some(list) = self.category_info_list.take() {
            if !list.content.is_empty() {
                return list.content;
            }
        }
        if let Some(content) = self.content.take().filter(|c| !c.is_empty()) {
            return content;
        }
        self.category_path.take().unwrap_or_default()
    }
}

/// Accepts either a JSON string or number and yields it as a string.
fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Field access helpers over open JSON maps
// ---------------------------------------------------------------------------

/// A `{Name, Value}` pair from a record's `FeaturedValues` list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FeaturedValue {
    pub name: String,
    pub value: String,
}

impl FeaturedValue {
    pub(crate) fn name_lower(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Non-null value of `key`.
pub(crate) fn field<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|v| !v.is_null())
}

/// Trimmed, non-empty string value of `key`.
pub(crate) fn text_field<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    field(record, key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Object entries of the array under `key`; non-object entries are skipped.
pub(crate) fn objects<'a>(
    record: &'a Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Map<String, Value>> {
    field(record, key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// Renders a scalar JSON value as text. Objects and arrays yield `None`.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn featured_values(record: &Map<String, Value>) -> Vec<FeaturedValue> {
    objects(record, "FeaturedValues")
        .filter_map(|entry| {
            let name = text_field(entry, "Name")?.to_owned();
            let value = field(entry, "Value").and_then(scalar_text)?;
            Some(FeaturedValue { name, value })
        })
        .collect()
}

/// Variant configurations: `ConfiguredItems`, falling back to
/// `ItemConfigurations` when the former is absent or empty.
pub(crate) fn configurations(record: &Map<String, Value>) -> Vec<&Map<String, Value>> {
    ["ConfiguredItems", "ItemConfigurations"]
        .iter()
        .map(|key| objects(record, key).collect::<Vec<_>>())
        .find(|configs| !configs.is_empty())
        .unwrap_or_default()
}
