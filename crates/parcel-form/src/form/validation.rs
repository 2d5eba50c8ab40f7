use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::delivery::{Grams, TrackingNumberClass};

static INTERNAL_TRACKING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{14}$").expect("invalid internal tracking number pattern")
});

static EXTERNAL_TRACKING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2}[0-9]{9}[A-Za-z]{2}$")
        .expect("invalid external tracking number pattern")
});

static POSTAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6}").expect("invalid postal prefix pattern"));

/// Keyed reason attached to the field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub key: &'static str,
    pub message: String,
}

impl ValidationError {
    pub const REQUIRED: &'static str = "required";
    pub const INVALID_PATTERN: &'static str = "invalidPattern";
    pub const INVALID_MESSAGE: &'static str = "invalidMessage";
    pub const NEGATIVE_WEIGHT: &'static str = "negativeWeight";
    pub const PATTERN: &'static str = "pattern";
    pub const NOT_AVAILABLE: &'static str = "notAvailable";

    fn new(key: &'static str, message: impl Into<String>) -> Self {
        Self {
            key,
            message: message.into(),
        }
    }

    pub fn required() -> Self {
        Self::new(Self::REQUIRED, "this field is required")
    }

    pub(crate) fn not_available() -> Self {
        Self::new(
            Self::NOT_AVAILABLE,
            "selection is not offered for this tracking number and weight",
        )
    }
}

pub fn classify_tracking_number(value: &str) -> TrackingNumberClass {
    if INTERNAL_TRACKING_NUMBER.is_match(value) {
        TrackingNumberClass::Internal
    } else if EXTERNAL_TRACKING_NUMBER.is_match(value) {
        TrackingNumberClass::External
    } else {
        TrackingNumberClass::Unknown
    }
}

/// Accepts 14-digit internal numbers and the 2+9+2 letter/digit external
/// format. Returns the class on success.
pub fn validate_tracking_number(value: &str) -> Result<TrackingNumberClass, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::required());
    }
    match classify_tracking_number(value) {
        TrackingNumberClass::Unknown => Err(ValidationError::new(
            ValidationError::INVALID_PATTERN,
            "tracking number did not pass validation",
        )),
        class => Ok(class),
    }
}

/// Parses a weight in whole grams. Decimal and exponent notation are fine as
/// long as the value is integral, e.g. `"500.0"` or `"1e3"`.
pub fn validate_weight(value: &str) -> Result<Grams, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required());
    }
    if let Ok(grams) = trimmed.parse::<Grams>() {
        return Ok(grams);
    }

    let not_integral = || {
        ValidationError::new(
            ValidationError::INVALID_MESSAGE,
            "weight must be a whole number (in grams)",
        )
    };

    let number = trimmed.parse::<f64>().map_err(|_| not_integral())?;
    if !number.is_finite() || number.fract() != 0.0 {
        return Err(not_integral());
    }
    if number < 0.0 {
        return Err(ValidationError::new(
            ValidationError::NEGATIVE_WEIGHT,
            "weight cannot be negative",
        ));
    }
    if number >= Grams::MAX as f64 {
        return Err(not_integral());
    }
    Ok(number as Grams)
}

/// Address must lead with a six digit postal code.
pub fn validate_address(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    if POSTAL_PREFIX.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(
            ValidationError::PATTERN,
            "address must start with a six digit postal code",
        ))
    }
}

pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::required())
    } else {
        Ok(())
    }
}
