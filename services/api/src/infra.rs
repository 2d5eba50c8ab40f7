use metrics_exporter_prometheus::PrometheusHandle;
use parcel_form::config::BackendConfig;
use parcel_form::delivery::HttpDeliveryGateway;
use parcel_form::error::AppError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn http_gateway(config: &BackendConfig) -> Result<Arc<HttpDeliveryGateway>, AppError> {
    let gateway = HttpDeliveryGateway::from_config(config)?;
    Ok(Arc::new(gateway))
}
