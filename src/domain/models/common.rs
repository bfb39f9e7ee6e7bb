use crate::domain::types::{AdditionalProperties, Tristate};
use crate::utils::error::{GalileoError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One segment of the path to the rejected input: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocItem {
    Key(String),
    Index(i64),
}

impl Serialize for LocItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            LocItem::Key(k) => serializer.serialize_str(k),
            LocItem::Index(i) => serializer.serialize_i64(*i),
        }
    }
}

impl<'de> Deserialize<'de> for LocItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(LocItem::Key(s)),
            Value::Number(n) => n
                .as_i64()
                .map(LocItem::Index)
                .ok_or_else(|| serde::de::Error::custom(format!("loc index out of range: {}", n))),
            other => Err(serde::de::Error::custom(format!(
                "loc item must be a string or an integer, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for LocItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocItem::Key(k) => f.write_str(k),
            LocItem::Index(i) => write!(f, "{}", i),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    pub loc: Vec<LocItem>,
    pub msg: String,
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

/// Body of a 422 answer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HttpValidationError {
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub detail: Tristate<Vec<ValidationErrorDetail>>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

impl fmt::Display for HttpValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details = match self.detail.as_value() {
            Some(details) if !details.is_empty() => details,
            _ => return f.write_str("no details provided"),
        };
        let rendered: Vec<String> = details
            .iter()
            .map(|d| {
                let path: Vec<String> = d.loc.iter().map(ToString::to_string).collect();
                format!("{}: {}", path.join("."), d.msg)
            })
            .collect();
        f.write_str(&rendered.join("; "))
    }
}

/// Removes the discriminator `field` from `object` and parses it.
///
/// A missing or `null` tag yields `Ok(None)` so callers can fall back to another
/// discriminator; a tag of the wrong JSON type or outside the declared set is an error.
pub(crate) fn take_tag<E>(object: &mut AdditionalProperties, field: &str) -> Result<Option<E>>
where
    E: FromStr<Err = GalileoError>,
{
    match object.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(tag)) => tag.parse().map(Some),
        Some(other) => Err(GalileoError::UnknownVariant {
            field: field.to_string(),
            value: other.to_string(),
            expected: "a string tag".to_string(),
        }),
    }
}

/// Encodes `body` and writes the discriminator back in.
pub(crate) fn with_tag<T: Serialize>(body: &T, field: &str, tag: &str) -> Result<Value> {
    let mut value = serde_json::to_value(body)?;
    if let Value::Object(object) = &mut value {
        object.insert(field.to_string(), Value::String(tag.to_string()));
    }
    Ok(value)
}

pub(crate) fn into_object(value: Value) -> Result<AdditionalProperties> {
    Ok(serde_json::from_value(value)?)
}
