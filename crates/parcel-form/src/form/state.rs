use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::{
    validate_address, validate_required, validate_tracking_number, validate_weight,
    ValidationError,
};
use crate::delivery::{DeliveryForm, DeliveryType, Grams, TrackingNumberClass};

/// Controls that make up the shipment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    TrackingNumber,
    Weight,
    DepartureType,
    DepartureForm,
    Address,
    Recipient,
}

impl FieldName {
    pub const ALL: [FieldName; 6] = [
        FieldName::TrackingNumber,
        FieldName::Weight,
        FieldName::DepartureType,
        FieldName::DepartureForm,
        FieldName::Address,
        FieldName::Recipient,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::TrackingNumber => "trackingNumber",
            FieldName::Weight => "weight",
            FieldName::DepartureType => "departureType",
            FieldName::DepartureForm => "departureForm",
            FieldName::Address => "address",
            FieldName::Recipient => "recipient",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(raw.trim()))
    }

    /// Value a field holds on creation and after a reset.
    pub fn default_value(self) -> &'static str {
        match self {
            FieldName::Weight => "0",
            _ => "",
        }
    }

    /// Run the validators attached to this control.
    pub fn validate(self, value: &str) -> Result<(), ValidationError> {
        match self {
            FieldName::TrackingNumber => validate_tracking_number(value).map(|_| ()),
            FieldName::Weight => validate_weight(value).map(|_| ()),
            FieldName::Address => validate_address(value),
            FieldName::DepartureType | FieldName::DepartureForm | FieldName::Recipient => {
                validate_required(value)
            }
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a single control: `Pristine -> Touched -> Valid | Invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Pristine,
    Touched,
    Valid,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldState {
    pub value: String,
    pub touched: bool,
    pub dirty: bool,
    pub status: FieldStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
}

impl FieldState {
    fn new(name: FieldName) -> Self {
        Self {
            value: name.default_value().to_string(),
            touched: false,
            dirty: false,
            status: FieldStatus::Pristine,
            error: None,
        }
    }

    pub fn touch(&mut self) {
        self.touched = true;
        if self.status == FieldStatus::Pristine {
            self.status = FieldStatus::Touched;
        }
    }

    /// A change event: the value is replaced and the outcome recorded.
    pub(crate) fn change(&mut self, value: &str, outcome: Result<(), ValidationError>) {
        self.value = value.to_string();
        self.dirty = true;
        self.touched = true;
        self.settle(outcome);
    }

    pub(crate) fn settle(&mut self, outcome: Result<(), ValidationError>) {
        match outcome {
            Ok(()) => {
                self.status = FieldStatus::Valid;
                self.error = None;
            }
            Err(error) => {
                self.status = FieldStatus::Invalid;
                self.error = Some(error);
            }
        }
    }

    /// Error worth showing to the user; pristine controls stay quiet.
    pub fn visible_error(&self) -> Option<&ValidationError> {
        if self.touched || self.dirty {
            self.error.as_ref()
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == FieldStatus::Valid
    }
}

/// Everything the form shows: control values, validity flags, the narrowed
/// dropdown lists and the current selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub tracking_number: FieldState,
    pub weight: FieldState,
    pub departure_type: FieldState,
    pub departure_form: FieldState,
    pub address: FieldState,
    pub recipient: FieldState,
    pub delivery_types: Vec<DeliveryType>,
    pub delivery_forms: Vec<DeliveryForm>,
    pub selected_delivery_type: usize,
    pub selected_delivery_form: usize,
    pub is_tracking_number_valid: bool,
    pub is_weight_valid: bool,
    pub classification: TrackingNumberClass,
    /// Parsed weight, set only once the user entered a valid one.
    pub weight_grams: Option<Grams>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            tracking_number: FieldState::new(FieldName::TrackingNumber),
            weight: FieldState::new(FieldName::Weight),
            departure_type: FieldState::new(FieldName::DepartureType),
            departure_form: FieldState::new(FieldName::DepartureForm),
            address: FieldState::new(FieldName::Address),
            recipient: FieldState::new(FieldName::Recipient),
            delivery_types: Vec::new(),
            delivery_forms: Vec::new(),
            selected_delivery_type: 0,
            selected_delivery_form: 0,
            is_tracking_number_valid: false,
            is_weight_valid: false,
            classification: TrackingNumberClass::Unknown,
            weight_grams: None,
        }
    }
}

impl FormState {
    pub fn field(&self, name: FieldName) -> &FieldState {
        match name {
            FieldName::TrackingNumber => &self.tracking_number,
            FieldName::Weight => &self.weight,
            FieldName::DepartureType => &self.departure_type,
            FieldName::DepartureForm => &self.departure_form,
            FieldName::Address => &self.address,
            FieldName::Recipient => &self.recipient,
        }
    }

    pub fn field_mut(&mut self, name: FieldName) -> &mut FieldState {
        match name {
            FieldName::TrackingNumber => &mut self.tracking_number,
            FieldName::Weight => &mut self.weight,
            FieldName::DepartureType => &mut self.departure_type,
            FieldName::DepartureForm => &mut self.departure_form,
            FieldName::Address => &mut self.address,
            FieldName::Recipient => &mut self.recipient,
        }
    }

    pub fn is_valid(&self) -> bool {
        FieldName::ALL
            .into_iter()
            .all(|name| self.field(name).is_valid())
    }

    /// Errors of every control that currently fails validation.
    pub fn errors(&self) -> Vec<(FieldName, ValidationError)> {
        FieldName::ALL
            .into_iter()
            .filter_map(|name| {
                self.field(name)
                    .error
                    .clone()
                    .map(|error| (name, error))
            })
            .collect()
    }

    pub fn selected_delivery_type_id(&self) -> Option<u32> {
        self.departure_type.value.parse().ok()
    }

    pub fn selected_delivery_form_id(&self) -> Option<u32> {
        self.departure_form.value.parse().ok()
    }

    /// Mark every control touched and re-run its validators so pending
    /// messages become visible.
    pub(crate) fn touch_all(&mut self) {
        for name in FieldName::ALL {
            let field = self.field_mut(name);
            field.touch();
            let outcome = name.validate(&field.value);
            field.settle(outcome);
        }
    }

    /// Restore default values and selections. Touched flags survive, the lists
    /// stay as last fetched.
    pub(crate) fn reset(&mut self) {
        for name in FieldName::ALL {
            let field = self.field_mut(name);
            field.value = name.default_value().to_string();
            field.dirty = false;
            if field.touched {
                let outcome = name.validate(&field.value);
                field.settle(outcome);
            } else {
                field.status = FieldStatus::Pristine;
                field.error = None;
            }
        }
        self.selected_delivery_type = 0;
        self.selected_delivery_form = 0;
        self.is_tracking_number_valid = false;
        self.is_weight_valid = false;
        self.classification = TrackingNumberClass::Unknown;
        self.weight_grams = None;
    }
}
