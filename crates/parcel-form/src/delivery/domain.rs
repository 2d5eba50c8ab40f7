use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Weight in whole grams.
pub type Grams = u64;

/// Inclusive weight bounds shared by delivery types and delivery forms.
pub trait WeightBounded {
    fn min_weight(&self) -> Grams;
    fn max_weight(&self) -> Grams;

    fn accepts_weight(&self, weight: Grams) -> bool {
        self.min_weight() <= weight && weight <= self.max_weight()
    }
}

/// Shipping category offered for one tracking number class within a weight range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryType {
    pub id: u32,
    #[serde(deserialize_with = "deserialize_type_id")]
    pub tracker_number_type_id: String,
    pub min_weight: Grams,
    pub max_weight: Grams,
    pub label: String,
}

impl DeliveryType {
    pub fn serves(&self, class: TrackingNumberClass) -> bool {
        class
            .type_id()
            .is_some_and(|type_id| self.tracker_number_type_id == type_id)
    }
}

impl WeightBounded for DeliveryType {
    fn min_weight(&self) -> Grams {
        self.min_weight
    }

    fn max_weight(&self) -> Grams {
        self.max_weight
    }
}

/// Paperwork form valid within a weight range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryForm {
    pub id: u32,
    pub min_weight: Grams,
    pub max_weight: Grams,
    pub label: String,
}

impl WeightBounded for DeliveryForm {
    fn min_weight(&self) -> Grams {
        self.min_weight
    }

    fn max_weight(&self) -> Grams {
        self.max_weight
    }
}

/// Payload written back to the backend when submission is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostForm {
    pub tracking_number: String,
    pub weight: Grams,
    pub is_organization: bool,
}

/// Which numbering scheme a tracking number follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingNumberClass {
    /// 14 digits.
    Internal,
    /// Two letters, nine digits, two letters.
    External,
    Unknown,
}

impl TrackingNumberClass {
    pub const INTERNAL_TYPE_ID: &'static str = "0";
    pub const EXTERNAL_TYPE_ID: &'static str = "1";

    /// Catalog identifier used by `DeliveryType::tracker_number_type_id`.
    pub fn type_id(self) -> Option<&'static str> {
        match self {
            Self::Internal => Some(Self::INTERNAL_TYPE_ID),
            Self::External => Some(Self::EXTERNAL_TYPE_ID),
            Self::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TrackingNumberClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The backend is loose about whether the class id is a string or a number.
fn deserialize_type_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTypeId {
        Text(String),
        Number(u64),
    }

    match RawTypeId::deserialize(deserializer)? {
        RawTypeId::Text(value) => Ok(value.trim().to_string()),
        RawTypeId::Number(value) => Ok(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn delivery_type_accepts_numeric_class_id() {
        let parsed: DeliveryType = serde_json::from_value(json!({
            "id": 3,
            "trackerNumberTypeId": 1,
            "minWeight": 0,
            "maxWeight": 2000,
            "label": "Small packet"
        }))
        .expect("numeric class id parses");
        assert_eq!(parsed.tracker_number_type_id, "1");
        assert!(parsed.serves(TrackingNumberClass::External));
        assert!(!parsed.serves(TrackingNumberClass::Internal));
        assert!(!parsed.serves(TrackingNumberClass::Unknown));
    }

    #[test]
    fn post_form_serializes_camel_case() {
        let payload = PostForm {
            tracking_number: "12345678901234".to_string(),
            weight: 500,
            is_organization: false,
        };
        let value = serde_json::to_value(&payload).expect("serializes");
        assert_eq!(
            value,
            json!({
                "trackingNumber": "12345678901234",
                "weight": 500,
                "isOrganization": false
            })
        );
    }

    #[test]
    fn weight_bounds_are_inclusive() {
        let form = DeliveryForm {
            id: 1,
            min_weight: 100,
            max_weight: 200,
            label: "F-103".to_string(),
        };
        assert!(form.accepts_weight(100));
        assert!(form.accepts_weight(200));
        assert!(!form.accepts_weight(99));
        assert!(!form.accepts_weight(201));
    }
}
