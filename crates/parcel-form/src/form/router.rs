use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::controller::SubmitOutcome;
use super::service::{FormService, SelectionList};
use super::state::{FieldName, FormState};
use crate::delivery::DeliveryGateway;
use crate::error::AppError;

/// Router builder exposing the form session.
pub fn form_router<G>(service: Arc<FormService<G>>) -> Router
where
    G: DeliveryGateway + 'static,
{
    Router::new()
        .route("/api/v1/form", get(snapshot_handler::<G>))
        .route("/api/v1/form/fields/:field", put(field_handler::<G>))
        .route("/api/v1/form/selection/:list", put(selection_handler::<G>))
        .route("/api/v1/form/submit", post(submit_handler::<G>))
        .route("/api/v1/form/evaluate", post(evaluate_handler::<G>))
        .with_state(service)
}

/// New control value. Numbers are accepted so `{"value": 500}` works for the
/// weight.
#[derive(Debug, Deserialize)]
pub struct FieldInput {
    #[serde(default)]
    pub value: Value,
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectionInput {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub tracking_number: String,
    #[serde(default)]
    pub weight: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub outcome: SubmitOutcome,
    pub form: FormState,
}

fn not_found(kind: &str, name: &str) -> Response {
    let payload = json!({ "error": format!("unknown {kind} '{name}'") });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

pub(crate) async fn snapshot_handler<G>(State(service): State<Arc<FormService<G>>>) -> Json<FormState>
where
    G: DeliveryGateway + 'static,
{
    Json(service.snapshot().await)
}

pub(crate) async fn field_handler<G>(
    State(service): State<Arc<FormService<G>>>,
    Path(field): Path<String>,
    Json(input): Json<FieldInput>,
) -> Result<Response, AppError>
where
    G: DeliveryGateway + 'static,
{
    let Some(name) = FieldName::parse(&field) else {
        return Ok(not_found("field", &field));
    };
    let state = service.change(name, &value_text(&input.value)).await?;
    Ok(Json(state).into_response())
}

pub(crate) async fn selection_handler<G>(
    State(service): State<Arc<FormService<G>>>,
    Path(list): Path<String>,
    Json(input): Json<SelectionInput>,
) -> Result<Response, AppError>
where
    G: DeliveryGateway + 'static,
{
    let Some(target) = SelectionList::parse(&list) else {
        return Ok(not_found("list", &list));
    };
    let state = service.select(target, input.index).await?;
    Ok(Json(state).into_response())
}

pub(crate) async fn submit_handler<G>(
    State(service): State<Arc<FormService<G>>>,
) -> Result<Json<SubmitResponse>, AppError>
where
    G: DeliveryGateway + 'static,
{
    let (outcome, form) = service.submit().await?;
    Ok(Json(SubmitResponse { outcome, form }))
}

pub(crate) async fn evaluate_handler<G>(
    State(service): State<Arc<FormService<G>>>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<FormState>, AppError>
where
    G: DeliveryGateway + 'static,
{
    let state = service
        .evaluate(&request.tracking_number, &value_text(&request.weight))
        .await?;
    Ok(Json(state))
}
