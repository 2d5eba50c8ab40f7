use std::sync::Arc;

use tokio::sync::Mutex;

use super::controller::{evaluate_entry, FormController, FormError, SubmitOutcome};
use super::state::{FieldName, FormState};
use crate::config::FormConfig;
use crate::delivery::DeliveryGateway;

/// Which dropdown a selection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionList {
    DeliveryType,
    DeliveryForm,
}

impl SelectionList {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "deliveryType" | "departureType" => Some(Self::DeliveryType),
            "deliveryForm" | "departureForm" => Some(Self::DeliveryForm),
            _ => None,
        }
    }
}

/// The single form session served over HTTP. Change events are applied one
/// at a time.
pub struct FormService<G> {
    gateway: Arc<G>,
    config: FormConfig,
    session: Mutex<FormController<G>>,
}

impl<G> FormService<G>
where
    G: DeliveryGateway + 'static,
{
    pub fn new(gateway: Arc<G>, config: FormConfig) -> Self {
        let session = Mutex::new(FormController::new(gateway.clone(), config));
        Self {
            gateway,
            config,
            session,
        }
    }

    /// Populate the dropdowns with the full catalog.
    pub async fn load(&self) -> Result<FormState, FormError> {
        let mut controller = self.session.lock().await;
        controller.load().await?;
        Ok(controller.state().clone())
    }

    pub async fn snapshot(&self) -> FormState {
        self.session.lock().await.state().clone()
    }

    pub async fn change(&self, field: FieldName, value: &str) -> Result<FormState, FormError> {
        let mut controller = self.session.lock().await;
        controller.set_field(field, value).await?;
        Ok(controller.state().clone())
    }

    pub async fn select(&self, list: SelectionList, index: usize) -> Result<FormState, FormError> {
        let mut controller = self.session.lock().await;
        match list {
            SelectionList::DeliveryType => controller.select_delivery_type(index)?,
            SelectionList::DeliveryForm => controller.select_delivery_form(index)?,
        }
        Ok(controller.state().clone())
    }

    pub async fn submit(&self) -> Result<(SubmitOutcome, FormState), FormError> {
        let mut controller = self.session.lock().await;
        let outcome = controller.submit().await?;
        Ok((outcome, controller.state().clone()))
    }

    /// Evaluate an entry on a throwaway controller; the session is untouched.
    pub async fn evaluate(&self, tracking_number: &str, weight: &str) -> Result<FormState, FormError> {
        evaluate_entry(self.gateway.clone(), self.config, tracking_number, weight).await
    }
}
