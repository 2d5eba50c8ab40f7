use crate::cli::ServeArgs;
use crate::infra::{http_gateway, AppState};
use crate::routes::with_form_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use parcel_form::config::AppConfig;
use parcel_form::error::AppError;
use parcel_form::form::FormService;
use parcel_form::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let gateway = http_gateway(&config.backend)?;
    let form_service = Arc::new(FormService::new(gateway, config.form));

    // An unreachable backend leaves the dropdowns empty until the next change.
    if let Err(err) = form_service.load().await {
        warn!(error = %err, backend = %config.backend.base_url, "initial catalog load failed");
    }

    let app = with_form_routes(form_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        backend = %config.backend.base_url,
        weight_gate = ?config.form.weight_gate,
        submit_enabled = config.form.submit_enabled,
        "parcel form service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
