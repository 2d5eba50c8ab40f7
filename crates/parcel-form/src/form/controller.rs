use std::sync::Arc;

use serde::Serialize;

use super::state::{FieldName, FormState};
use super::validation::{validate_tracking_number, validate_weight, ValidationError};
use crate::config::FormConfig;
use crate::delivery::{
    filter_delivery_forms, filter_delivery_types, DeliveryGateway, DeliveryType, GatewayError,
    Grams, PostForm, TrackingNumberClass,
};

/// Drives a `FormState` from change events, re-querying the gateway on every
/// tracking number or weight change.
pub struct FormController<G: ?Sized> {
    gateway: Arc<G>,
    config: FormConfig,
    state: FormState,
}

/// What happened to the payload when the form was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Sending is switched off; the form was only reset.
    Disabled,
    /// Tracking number or weight did not validate, nothing was sent.
    Skipped,
    Sent { payload: PostForm },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub submission: SubmissionStatus,
    /// Validation failures as they stood when the user pressed submit.
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FieldName,
    #[serde(flatten)]
    pub error: ValidationError,
}

/// Error raised by controller operations.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("{list} index {index} is out of range ({len} entries)")]
    SelectionOutOfRange {
        list: &'static str,
        index: usize,
        len: usize,
    },
    #[error("field '{0}' cannot be edited directly")]
    NotEditable(FieldName),
}

impl<G> FormController<G>
where
    G: DeliveryGateway + ?Sized,
{
    pub fn new(gateway: Arc<G>, config: FormConfig) -> Self {
        Self {
            gateway,
            config,
            state: FormState::default(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn config(&self) -> FormConfig {
        self.config
    }

    /// Fetch the unfiltered catalog, as the form does when it is first shown.
    pub async fn load(&mut self) -> Result<(), FormError> {
        let types = self.gateway.fetch_delivery_types().await?;
        let forms = self.gateway.fetch_delivery_forms().await?;
        tracing::debug!(
            types = types.len(),
            forms = forms.len(),
            "delivery catalog loaded"
        );
        self.state.delivery_types = types;
        self.state.delivery_forms = forms;
        self.reconcile_selections();
        Ok(())
    }

    /// Dispatch a change event by control name.
    pub async fn set_field(&mut self, field: FieldName, value: &str) -> Result<(), FormError> {
        match field {
            FieldName::TrackingNumber => self.set_tracking_number(value).await,
            FieldName::Weight => self.set_weight(value).await,
            FieldName::Address | FieldName::Recipient => {
                self.set_text(field, value);
                Ok(())
            }
            FieldName::DepartureType | FieldName::DepartureForm => {
                Err(FormError::NotEditable(field))
            }
        }
    }

    /// Tracking number change. A valid number narrows the delivery types to
    /// its class (and to the weight, once one was entered); an invalid one
    /// leaves the lists alone. Nothing is written until the fetch succeeded.
    pub async fn set_tracking_number(&mut self, value: &str) -> Result<(), FormError> {
        let outcome = validate_tracking_number(value);
        let narrowed = match &outcome {
            Ok(class) => Some(
                self.narrowed_delivery_types(Some(*class), self.state.weight_grams)
                    .await?,
            ),
            Err(_) => None,
        };

        self.state
            .tracking_number
            .change(value, outcome.as_ref().map(|_| ()).map_err(Clone::clone));
        match outcome {
            Ok(class) => {
                tracing::debug!(%class, "tracking number accepted");
                self.state.is_tracking_number_valid = true;
                self.state.classification = class;
            }
            Err(_) => {
                self.state.is_tracking_number_valid = false;
                self.state.classification = TrackingNumberClass::Unknown;
            }
        }
        if let Some(types) = narrowed {
            self.state.delivery_types = types;
            self.reconcile_selections();
        }
        Ok(())
    }

    /// Weight change. Both lists are re-fetched; an invalid weight drops the
    /// range filter instead of keeping the previous one.
    pub async fn set_weight(&mut self, value: &str) -> Result<(), FormError> {
        let outcome = validate_weight(value);
        let weight = outcome.as_ref().ok().copied();
        let class = self
            .state
            .is_tracking_number_valid
            .then_some(self.state.classification);

        let types = self.gateway.fetch_delivery_types().await?;
        let forms = self.gateway.fetch_delivery_forms().await?;

        self.state.weight.change(value, outcome.map(|_| ()));
        self.state.is_weight_valid = weight.is_some();
        self.state.weight_grams = weight;
        self.state.delivery_types =
            filter_delivery_types(types, class, weight, self.config.weight_gate);
        self.state.delivery_forms = filter_delivery_forms(forms, weight);
        tracing::debug!(
            ?weight,
            types = self.state.delivery_types.len(),
            forms = self.state.delivery_forms.len(),
            "delivery lists narrowed by weight"
        );
        self.reconcile_selections();
        Ok(())
    }

    pub fn set_address(&mut self, value: &str) {
        self.set_text(FieldName::Address, value);
    }

    pub fn set_recipient(&mut self, value: &str) {
        self.set_text(FieldName::Recipient, value);
    }

    fn set_text(&mut self, field: FieldName, value: &str) {
        let outcome = field.validate(value);
        self.state.field_mut(field).change(value, outcome);
    }

    pub fn select_delivery_type(&mut self, index: usize) -> Result<(), FormError> {
        let id = self
            .state
            .delivery_types
            .get(index)
            .map(|entry| entry.id)
            .ok_or(FormError::SelectionOutOfRange {
                list: "delivery type",
                index,
                len: self.state.delivery_types.len(),
            })?;
        self.state.selected_delivery_type = index;
        self.state
            .departure_type
            .change(&id.to_string(), Ok(()));
        Ok(())
    }

    pub fn select_delivery_form(&mut self, index: usize) -> Result<(), FormError> {
        let id = self
            .state
            .delivery_forms
            .get(index)
            .map(|entry| entry.id)
            .ok_or(FormError::SelectionOutOfRange {
                list: "delivery form",
                index,
                len: self.state.delivery_forms.len(),
            })?;
        self.state.selected_delivery_form = index;
        self.state
            .departure_form
            .change(&id.to_string(), Ok(()));
        Ok(())
    }

    /// Touch every control so its messages show, send the payload when
    /// enabled, then reset values and selections. A failed send leaves the
    /// form as it was.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, FormError> {
        let mut touched = self.state.clone();
        touched.touch_all();
        let errors = touched
            .errors()
            .into_iter()
            .map(|(field, error)| FieldError { field, error })
            .collect();

        let submission = if !self.config.submit_enabled {
            SubmissionStatus::Disabled
        } else {
            match self.payload() {
                Some(payload) => {
                    self.gateway.submit_form(&payload).await?;
                    SubmissionStatus::Sent { payload }
                }
                None => SubmissionStatus::Skipped,
            }
        };
        tracing::info!(?submission, "form submitted");

        touched.reset();
        self.state = touched;
        Ok(SubmitOutcome { submission, errors })
    }

    fn payload(&self) -> Option<PostForm> {
        if !self.state.is_tracking_number_valid {
            return None;
        }
        let weight: Grams = self.state.weight_grams?;
        Some(PostForm {
            tracking_number: self.state.tracking_number.value.clone(),
            weight,
            is_organization: false,
        })
    }

    async fn narrowed_delivery_types(
        &self,
        class: Option<TrackingNumberClass>,
        weight: Option<Grams>,
    ) -> Result<Vec<DeliveryType>, FormError> {
        let types = self.gateway.fetch_delivery_types().await?;
        let types = filter_delivery_types(types, class, weight, self.config.weight_gate);
        tracing::debug!(?class, ?weight, types = types.len(), "delivery types narrowed");
        Ok(types)
    }

    /// Keep selections pointing at entries that are still offered; drop the
    /// ones that fell out of the narrowed lists.
    fn reconcile_selections(&mut self) {
        let state = &mut self.state;

        if let Some(id) = state.selected_delivery_type_id() {
            match state.delivery_types.iter().position(|entry| entry.id == id) {
                Some(index) => state.selected_delivery_type = index,
                None => {
                    state.selected_delivery_type = 0;
                    state
                        .departure_type
                        .change("", Err(ValidationError::not_available()));
                }
            }
        }

        if let Some(id) = state.selected_delivery_form_id() {
            match state.delivery_forms.iter().position(|entry| entry.id == id) {
                Some(index) => state.selected_delivery_form = index,
                None => {
                    state.selected_delivery_form = 0;
                    state
                        .departure_form
                        .change("", Err(ValidationError::not_available()));
                }
            }
        }
    }
}

/// Run a one-off entry through a fresh controller: load the catalog, then
/// apply the tracking number and the weight as the user would type them.
pub async fn evaluate_entry<G>(
    gateway: Arc<G>,
    config: FormConfig,
    tracking_number: &str,
    weight: &str,
) -> Result<FormState, FormError>
where
    G: DeliveryGateway + ?Sized,
{
    let mut controller = FormController::new(gateway, config);
    controller.load().await?;
    controller.set_tracking_number(tracking_number).await?;
    controller.set_weight(weight).await?;
    Ok(controller.state)
}
