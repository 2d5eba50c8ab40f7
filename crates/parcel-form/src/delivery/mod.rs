//! Delivery catalog: domain types, the remote gateway and the pure filters
//! applied to what it returns.

pub mod domain;
pub mod filter;
pub mod gateway;
pub mod memory;

pub use domain::{
    DeliveryForm, DeliveryType, Grams, PostForm, TrackingNumberClass, WeightBounded,
};
pub use filter::{filter_delivery_forms, filter_delivery_types, WeightGate};
pub use gateway::{DeliveryGateway, GatewayError, HttpDeliveryGateway};
pub use memory::InMemoryDeliveryGateway;
