#![allow(dead_code)]

use std::sync::Arc;

use parcel_form::config::FormConfig;
use parcel_form::delivery::{DeliveryForm, DeliveryType, InMemoryDeliveryGateway};
use parcel_form::form::FormController;

pub const INTERNAL_NUMBER: &str = "12345678901234";
pub const EXTERNAL_NUMBER: &str = "AB123456789CD";

fn delivery_type(id: u32, type_id: &str, min: u64, max: u64, label: &str) -> DeliveryType {
    DeliveryType {
        id,
        tracker_number_type_id: type_id.to_string(),
        min_weight: min,
        max_weight: max,
        label: label.to_string(),
    }
}

fn delivery_form(id: u32, min: u64, max: u64, label: &str) -> DeliveryForm {
    DeliveryForm {
        id,
        min_weight: min,
        max_weight: max,
        label: label.to_string(),
    }
}

pub fn delivery_types() -> Vec<DeliveryType> {
    vec![
        delivery_type(1, "0", 0, 100, "Registered letter"),
        delivery_type(2, "0", 0, 20_000, "Parcel"),
        delivery_type(3, "0", 1_000, 31_500, "Heavy parcel"),
        delivery_type(4, "1", 0, 2_000, "Small packet"),
        delivery_type(5, "1", 0, 31_500, "EMS"),
    ]
}

pub fn delivery_forms() -> Vec<DeliveryForm> {
    vec![
        delivery_form(10, 0, 2_000, "Form 103"),
        delivery_form(11, 0, 20_000, "Form 116"),
        delivery_form(12, 2_001, 31_500, "CN 23"),
    ]
}

pub fn gateway() -> Arc<InMemoryDeliveryGateway> {
    Arc::new(InMemoryDeliveryGateway::new(delivery_types(), delivery_forms()))
}

pub async fn loaded_controller(
    gateway: Arc<InMemoryDeliveryGateway>,
    config: FormConfig,
) -> FormController<InMemoryDeliveryGateway> {
    let mut controller = FormController::new(gateway, config);
    controller.load().await.expect("catalog loads");
    controller
}

pub fn type_ids(types: &[DeliveryType]) -> Vec<u32> {
    types.iter().map(|entry| entry.id).collect()
}

pub fn form_ids(forms: &[DeliveryForm]) -> Vec<u32> {
    forms.iter().map(|entry| entry.id).collect()
}
