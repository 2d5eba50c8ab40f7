//! Remote access to the delivery catalog.
//!
//! The `DeliveryGateway` trait keeps the form controller independent of the
//! transport so it can be driven by in-memory doubles in tests.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::domain::{DeliveryForm, DeliveryType, PostForm};
use crate::config::BackendConfig;

/// Read and write operations against the delivery backend.
#[async_trait]
pub trait DeliveryGateway: Send + Sync {
    async fn fetch_delivery_types(&self) -> Result<Vec<DeliveryType>, GatewayError>;

    async fn fetch_delivery_forms(&self) -> Result<Vec<DeliveryForm>, GatewayError>;

    /// Fire-and-forget write; the response body is never inspected.
    async fn submit_form(&self, payload: &PostForm) -> Result<(), GatewayError>;
}

/// Failure talking to the delivery backend. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("unable to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("delivery backend unavailable: {0}")]
    Unavailable(String),
}

/// Production gateway speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDeliveryGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDeliveryGateway {
    pub const DELIVERY_TYPES_PATH: &'static str = "/deliveryTypes";
    pub const DELIVERY_FORMS_PATH: &'static str = "/deliveryForms";

    pub fn from_config(config: &BackendConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|source| GatewayError::Transport {
                url: config.base_url.clone(),
                source,
            })?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "fetching delivery catalog");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| {
                tracing::error!(url = %url, error = %source, "delivery catalog request failed");
                GatewayError::Transport {
                    url: url.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "delivery catalog rejected request");
            return Err(GatewayError::Status { url, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| GatewayError::Decode { url, source })
    }
}

#[async_trait]
impl DeliveryGateway for HttpDeliveryGateway {
    async fn fetch_delivery_types(&self) -> Result<Vec<DeliveryType>, GatewayError> {
        let types: Vec<DeliveryType> = self.get_json(Self::DELIVERY_TYPES_PATH).await?;
        tracing::debug!(count = types.len(), "delivery types received");
        Ok(types)
    }

    async fn fetch_delivery_forms(&self) -> Result<Vec<DeliveryForm>, GatewayError> {
        let forms: Vec<DeliveryForm> = self.get_json(Self::DELIVERY_FORMS_PATH).await?;
        tracing::debug!(count = forms.len(), "delivery forms received");
        Ok(forms)
    }

    #[tracing::instrument(skip(self, payload), fields(tracking_number = %payload.tracking_number))]
    async fn submit_form(&self, payload: &PostForm) -> Result<(), GatewayError> {
        let url = self.url(Self::DELIVERY_FORMS_PATH);
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(status = status.as_u16(), "form submitted");
        } else {
            tracing::warn!(status = status.as_u16(), "form submission not accepted");
        }
        Ok(())
    }
}
