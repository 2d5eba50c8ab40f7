//! Form state, validators and the controller reacting to change events.

pub mod controller;
pub mod router;
pub mod service;
pub mod state;
pub mod validation;

pub use controller::{
    evaluate_entry, FieldError, FormController, FormError, SubmissionStatus, SubmitOutcome,
};
pub use router::form_router;
pub use service::{FormService, SelectionList};
pub use state::{FieldName, FieldState, FieldStatus, FormState};
pub use validation::{
    classify_tracking_number, validate_address, validate_required, validate_tracking_number,
    validate_weight, ValidationError,
};
