//! Wire-level building blocks shared by every model.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unknown keys a model did not declare, kept so they survive a decode/encode cycle.
pub type AdditionalProperties = serde_json::Map<String, serde_json::Value>;

/// A JSON field that can be missing, explicitly `null`, or carry a value.
///
/// Fields of this type must be declared with
/// `#[serde(default, skip_serializing_if = "Tristate::is_absent")]` so that a
/// missing key decodes to [`Tristate::Absent`] and is omitted again on encode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Tristate<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Tristate<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Tristate::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Tristate::Null)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Tristate::Value(_))
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Tristate::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Collapses `Absent` and `Null` into `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Tristate::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Tristate<U> {
        match self {
            Tristate::Absent => Tristate::Absent,
            Tristate::Null => Tristate::Null,
            Tristate::Value(v) => Tristate::Value(f(v)),
        }
    }

    pub fn as_ref(&self) -> Tristate<&T> {
        match self {
            Tristate::Absent => Tristate::Absent,
            Tristate::Null => Tristate::Null,
            Tristate::Value(v) => Tristate::Value(v),
        }
    }

    /// `None` becomes an explicit `Null`, never `Absent`.
    pub fn from_nullable(value: Option<T>) -> Self {
        match value {
            Some(v) => Tristate::Value(v),
            None => Tristate::Null,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }
}

impl<T> From<T> for Tristate<T> {
    fn from(value: T) -> Self {
        Tristate::Value(value)
    }
}

impl<T: Serialize> Serialize for Tristate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tristate::Value(v) => serializer.serialize_some(v),
            // Absent is normally skipped by the field attribute; if it is not, null is the only encoding left.
            Tristate::Null | Tristate::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Tristate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Tristate::from_nullable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(default, skip_serializing_if = "Tristate::is_absent")]
        endpoint: Tristate<String>,
        #[serde(flatten)]
        additional_properties: AdditionalProperties,
    }

    #[test]
    fn test_absent_null_and_value_decode_differently() {
        let absent: Sample = serde_json::from_value(json!({})).unwrap();
        let null: Sample = serde_json::from_value(json!({"endpoint": null})).unwrap();
        let value: Sample = serde_json::from_value(json!({"endpoint": "https://x"})).unwrap();

        assert_eq!(absent.endpoint, Tristate::Absent);
        assert_eq!(null.endpoint, Tristate::Null);
        assert_eq!(value.endpoint, Tristate::Value("https://x".to_string()));
    }

    #[test]
    fn test_absent_is_omitted_and_null_is_kept_on_encode() {
        let absent = Sample {
            endpoint: Tristate::Absent,
            additional_properties: AdditionalProperties::new(),
        };
        let null = Sample {
            endpoint: Tristate::Null,
            additional_properties: AdditionalProperties::new(),
        };

        assert_eq!(serde_json::to_value(&absent).unwrap(), json!({}));
        assert_eq!(serde_json::to_value(&null).unwrap(), json!({"endpoint": null}));
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let raw = json!({"endpoint": null, "added_later": {"nested": [1, 2]}});
        let sample: Sample = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(sample.additional_properties.len(), 1);
        assert_eq!(serde_json::to_value(&sample).unwrap(), raw);
    }

    #[test]
    fn test_option_conversion_maps_none_to_null() {
        let t: Tristate<u32> = Tristate::from_nullable(None);
        assert!(t.is_null());
        assert_eq!(Tristate::from_nullable(Some(3)).into_option(), Some(3));
        assert_eq!(Tristate::<u32>::Absent.unwrap_or(7), 7);
    }
}
