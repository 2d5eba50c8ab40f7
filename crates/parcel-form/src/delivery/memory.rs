use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::domain::{DeliveryForm, DeliveryType, PostForm};
use super::gateway::{DeliveryGateway, GatewayError};

/// Gateway double serving a fixed catalog and recording submissions.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDeliveryGateway {
    types: Arc<Mutex<Vec<DeliveryType>>>,
    forms: Arc<Mutex<Vec<DeliveryForm>>>,
    submissions: Arc<Mutex<Vec<PostForm>>>,
    fetches: Arc<AtomicUsize>,
    offline: Arc<AtomicBool>,
}

impl InMemoryDeliveryGateway {
    pub fn new(types: Vec<DeliveryType>, forms: Vec<DeliveryForm>) -> Self {
        Self {
            types: Arc::new(Mutex::new(types)),
            forms: Arc::new(Mutex::new(forms)),
            ..Self::default()
        }
    }

    /// Make every subsequent call fail as if the backend were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn submissions(&self) -> Vec<PostForm> {
        self.submissions
            .lock()
            .expect("submission mutex poisoned")
            .clone()
    }

    /// Number of read requests served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), GatewayError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("in-memory backend offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DeliveryGateway for InMemoryDeliveryGateway {
    async fn fetch_delivery_types(&self) -> Result<Vec<DeliveryType>, GatewayError> {
        self.check_online()?;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.types.lock().expect("catalog mutex poisoned").clone())
    }

    async fn fetch_delivery_forms(&self) -> Result<Vec<DeliveryForm>, GatewayError> {
        self.check_online()?;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.forms.lock().expect("catalog mutex poisoned").clone())
    }

    async fn submit_form(&self, payload: &PostForm) -> Result<(), GatewayError> {
        self.check_online()?;
        self.submissions
            .lock()
            .expect("submission mutex poisoned")
            .push(payload.clone());
        Ok(())
    }
}
