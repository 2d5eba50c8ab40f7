use serde::{Deserialize, Serialize};

use super::domain::{DeliveryForm, DeliveryType, Grams, TrackingNumberClass, WeightBounded};

/// How the weight bounds combine with the category check when narrowing
/// delivery types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightGate {
    /// `class unknown || (category matches && weight fits)`: without a known
    /// class every type is kept regardless of weight.
    #[default]
    CategoryMatch,
    /// `(class unknown || category matches) && (no weight || weight fits)`.
    Independent,
}

impl WeightGate {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "category" | "category_match" => Some(Self::CategoryMatch),
            "independent" => Some(Self::Independent),
            _ => None,
        }
    }
}

fn fits(entry: &impl WeightBounded, weight: Option<Grams>) -> bool {
    weight.map_or(true, |weight| entry.accepts_weight(weight))
}

/// Narrow delivery types to a tracking number class and weight.
pub fn filter_delivery_types(
    types: Vec<DeliveryType>,
    class: Option<TrackingNumberClass>,
    weight: Option<Grams>,
    gate: WeightGate,
) -> Vec<DeliveryType> {
    let class = class.filter(|class| class.is_known());
    types
        .into_iter()
        .filter(|entry| match (gate, class) {
            (WeightGate::CategoryMatch, None) => true,
            (WeightGate::CategoryMatch, Some(class)) => entry.serves(class) && fits(entry, weight),
            (WeightGate::Independent, class) => {
                class.map_or(true, |class| entry.serves(class)) && fits(entry, weight)
            }
        })
        .collect()
}

/// Narrow delivery forms to those whose range contains `weight`; everything
/// passes when the weight is unknown.
pub fn filter_delivery_forms(forms: Vec<DeliveryForm>, weight: Option<Grams>) -> Vec<DeliveryForm> {
    forms
        .into_iter()
        .filter(|entry| fits(entry, weight))
        .collect()
}
