use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The parts of a feature layer's service definition needed for labeling:
/// fields with their domains, and the subtype table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSchema {
    #[serde(alias = "id")]
    pub layer_id: i64,
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype_field: Option<String>,
    #[serde(default)]
    pub subtypes: Vec<Subtype>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

/// Subtype records carry their per-field domains as raw JSON. They are only
/// turned into [`Domain`] values when a label is actually requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtype {
    pub code: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub domains: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Domain {
    #[serde(rename = "codedValue")]
    CodedValue(CodedValueDomain),
    #[serde(rename = "range")]
    Range(RangeDomain),
    #[serde(rename = "inherited")]
    Inherited,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodedValueDomain {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub coded_values: Vec<CodedValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodedValue {
    pub name: String,
    pub code: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeDomain {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub range: Vec<f64>,
}

impl Domain {
    /// Reifies a raw domain definition. Malformed entries are logged and
    /// treated as absent.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        match serde_json::from_value::<Domain>(raw.clone()) {
            Ok(domain) => Some(domain),
            Err(e) => {
                tracing::warn!("Ignoring malformed domain definition: {}", e);
                None
            }
        }
    }

    pub fn as_coded(&self) -> Option<&CodedValueDomain> {
        match self {
            Domain::CodedValue(coded) => Some(coded),
            _ => None,
        }
    }
}

impl CodedValueDomain {
    /// Display name for a stored code. Numeric codes compare by value, so a
    /// stored `7` matches an attribute of `7.0` or `"7"`.
    pub fn get_name(&self, code: &Value) -> Option<&str> {
        self.coded_values
            .iter()
            .find(|cv| codes_equal(&cv.code, code))
            .map(|cv| cv.name.as_str())
    }
}

fn codes_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x == y,
        _ => match (code_as_f64(a), code_as_f64(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

fn code_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
