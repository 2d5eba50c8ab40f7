mod common;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use common::*;
use parcel_form::config::BackendConfig;
use parcel_form::delivery::{DeliveryGateway, GatewayError, HttpDeliveryGateway, PostForm};
use serde_json::{json, Value};

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("backend serves");
    });
    format!("http://{addr}")
}

fn gateway_for(base_url: String) -> HttpDeliveryGateway {
    HttpDeliveryGateway::from_config(&BackendConfig {
        base_url,
        timeout_ms: 2_000,
    })
    .expect("client builds")
}

#[tokio::test]
async fn fetches_catalog_from_backend() {
    let posted: Arc<Mutex<Vec<Value>>> = Arc::default();
    let sink = posted.clone();
    let router = Router::new()
        .route(
            "/deliveryTypes",
            get(|| async {
                Json(json!([
                    { "id": 1, "trackerNumberTypeId": "0", "minWeight": 0, "maxWeight": 100, "label": "Registered letter" },
                    { "id": 4, "trackerNumberTypeId": 1, "minWeight": 0, "maxWeight": 2000, "label": "Small packet" }
                ]))
            }),
        )
        .route(
            "/deliveryForms",
            get(|| async { Json(serde_json::to_value(delivery_forms()).expect("fixture")) }).post(
                move |Json(body): Json<Value>| {
                    let sink = sink.clone();
                    async move {
                        sink.lock().expect("sink mutex").push(body);
                        StatusCode::CREATED
                    }
                },
            ),
        );
    let gateway = gateway_for(spawn_backend(router).await);

    let types = gateway.fetch_delivery_types().await.expect("types fetched");
    assert_eq!(type_ids(&types), vec![1, 4]);
    assert_eq!(types[1].tracker_number_type_id, "1");

    let forms = gateway.fetch_delivery_forms().await.expect("forms fetched");
    assert_eq!(forms, delivery_forms());

    gateway
        .submit_form(&PostForm {
            tracking_number: INTERNAL_NUMBER.to_string(),
            weight: 500,
            is_organization: false,
        })
        .await
        .expect("submission sent");
    assert_eq!(
        posted.lock().expect("sink mutex").as_slice(),
        &[json!({ "trackingNumber": INTERNAL_NUMBER, "weight": 500, "isOrganization": false })]
    );
}

#[tokio::test]
async fn error_status_is_surfaced_without_retry() {
    let router = Router::new().route(
        "/deliveryTypes",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    );
    let gateway = gateway_for(spawn_backend(router).await);

    match gateway.fetch_delivery_types().await {
        Err(GatewayError::Status { status, url }) => {
            assert_eq!(status.as_u16(), 503);
            assert!(url.ends_with("/deliveryTypes"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let router = Router::new().route("/deliveryForms", get(|| async { Json(json!({ "oops": true })) }));
    let gateway = gateway_for(spawn_backend(router).await);

    assert!(matches!(
        gateway.fetch_delivery_forms().await,
        Err(GatewayError::Decode { .. })
    ));
}

#[tokio::test]
async fn rejected_submission_is_not_an_error() {
    let router = Router::new().route(
        "/deliveryForms",
        axum::routing::post(|| async { StatusCode::BAD_REQUEST }),
    );
    let gateway = gateway_for(spawn_backend(router).await);

    gateway
        .submit_form(&PostForm {
            tracking_number: EXTERNAL_NUMBER.to_string(),
            weight: 10,
            is_organization: false,
        })
        .await
        .expect("fire and forget");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let gateway = gateway_for(format!("http://{addr}"));

    assert!(matches!(
        gateway.fetch_delivery_types().await,
        Err(GatewayError::Transport { .. })
    ));
}
