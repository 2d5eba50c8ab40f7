//! Shipment form core.
//!
//! A user types a tracking number and a weight; the form validates both,
//! re-queries the delivery catalog and narrows the delivery type and delivery
//! form dropdowns to the entries that fit.

pub mod config;
pub mod delivery;
pub mod error;
pub mod form;
pub mod telemetry;
