//! Case-insensitive field discovery over feature attributes.
//!
//! Geodatabase field names come back as `GlobalID`, `GLOBALID` or `globalid`
//! depending on the source. Every lookup here lowercases both sides and the
//! first key in the mapping's own order wins.

use crate::domain::model::FeatureAttributes;
use crate::utils::error::{Result, UnetError};
use serde_json::Value;
use std::collections::HashMap;

/// A required attribute with the error label used when it is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredField {
    pub name: &'static str,
    pub label: &'static str,
}

pub const GLOBAL_ID: RequiredField = RequiredField {
    name: "globalid",
    label: "Global Id",
};
pub const ASSET_TYPE: RequiredField = RequiredField {
    name: "assettype",
    label: "Asset Type",
};
pub const ASSET_GROUP: RequiredField = RequiredField {
    name: "assetgroup",
    label: "Asset Group",
};
pub const OBJECT_ID: RequiredField = RequiredField {
    name: "objectid",
    label: "Object Id",
};

/// First key among `keys` that equals `target` ignoring case.
pub fn find_key<'a, I>(keys: I, target: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    let target = target.to_lowercase();
    keys.into_iter()
        .find(|k| k.to_lowercase() == target)
        .map(String::as_str)
}

pub fn find_field_key<'a>(attributes: &'a FeatureAttributes, target: &str) -> Option<&'a str> {
    find_key(attributes.keys(), target)
}

/// Lowercased key index over one attribute mapping, for callers that look up
/// several fields on the same feature.
#[derive(Debug)]
pub struct FieldIndex<'a> {
    attributes: &'a FeatureAttributes,
    folded: HashMap<String, &'a str>,
}

impl<'a> FieldIndex<'a> {
    pub fn new(attributes: &'a FeatureAttributes) -> Self {
        let mut folded = HashMap::with_capacity(attributes.len());
        for key in attributes.keys() {
            folded.entry(key.to_lowercase()).or_insert(key.as_str());
        }
        Self { attributes, folded }
    }

    pub fn key(&self, target: &str) -> Option<&'a str> {
        self.folded.get(&target.to_lowercase()).copied()
    }

    pub fn value(&self, target: &str) -> Option<&'a Value> {
        self.key(target).and_then(|key| self.attributes.get(key))
    }

    pub fn require_key(&self, field: RequiredField) -> Result<&'a str> {
        self.key(field.name)
            .ok_or_else(|| UnetError::missing_field(field.label))
    }

    pub fn require_value(&self, field: RequiredField) -> Result<&'a Value> {
        let key = self.require_key(field)?;
        self.attributes
            .get(key)
            .ok_or_else(|| UnetError::missing_field(field.label))
    }
}

/// Reads an integer code from an attribute value. Services return codes as
/// integers, but doubles and numeric strings show up too.
pub fn attribute_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Renders an attribute value the way it should appear in a label or id.
pub fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
