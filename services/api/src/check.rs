use crate::infra::http_gateway;
use clap::{Args, Subcommand};
use parcel_form::config::{AppConfig, BackendConfig};
use parcel_form::delivery::{DeliveryGateway, WeightGate};
use parcel_form::error::AppError;
use parcel_form::form::{evaluate_entry, FieldName, FormState};
use std::fmt::Write as _;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Tracking number: 14 digits or two letters, nine digits, two letters
    #[arg(long)]
    pub(crate) tracking_number: String,
    /// Weight in grams
    #[arg(long)]
    pub(crate) weight: String,
    /// Override the configured delivery backend URL
    #[arg(long)]
    pub(crate) base_url: Option<String>,
    /// Override how the weight combines with the category filter (category|independent)
    #[arg(long, value_parser = parse_weight_gate)]
    pub(crate) weight_gate: Option<WeightGate>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CatalogList {
    /// Delivery types with their tracking number class and weight range
    Types,
    /// Delivery forms with their weight range
    Forms,
}

fn parse_weight_gate(raw: &str) -> Result<WeightGate, String> {
    WeightGate::parse(raw).ok_or_else(|| format!("unknown weight gate '{raw}'"))
}

pub(crate) async fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let CheckArgs {
        tracking_number,
        weight,
        base_url,
        weight_gate,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(base_url) = base_url {
        config.backend.base_url = BackendConfig::normalize_base_url(&base_url)?;
    }
    if let Some(gate) = weight_gate {
        config.form.weight_gate = gate;
    }

    let gateway = http_gateway(&config.backend)?;
    let state = evaluate_entry(gateway, config.form, &tracking_number, &weight).await?;
    print!("{}", describe(&state));
    Ok(())
}

pub(crate) async fn run_catalog(list: CatalogList) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let gateway = http_gateway(&config.backend)?;

    match list {
        CatalogList::Types => {
            let types = gateway.fetch_delivery_types().await?;
            println!("Delivery types ({})", types.len());
            for entry in types {
                println!(
                    "- [{}] {} (class {}, {}-{} g)",
                    entry.id,
                    entry.label,
                    entry.tracker_number_type_id,
                    entry.min_weight,
                    entry.max_weight
                );
            }
        }
        CatalogList::Forms => {
            let forms = gateway.fetch_delivery_forms().await?;
            println!("Delivery forms ({})", forms.len());
            for entry in forms {
                println!(
                    "- [{}] {} ({}-{} g)",
                    entry.id, entry.label, entry.min_weight, entry.max_weight
                );
            }
        }
    }
    Ok(())
}

/// Human readable summary of an evaluated entry.
pub(crate) fn describe(state: &FormState) -> String {
    let mut out = String::new();
    let validity = |valid: bool| if valid { "valid" } else { "invalid" };

    let _ = writeln!(
        out,
        "Tracking number: {} ({}, {})",
        state.tracking_number.value,
        validity(state.is_tracking_number_valid),
        state.classification
    );
    let _ = writeln!(
        out,
        "Weight: {} ({})",
        state.weight.value,
        validity(state.is_weight_valid)
    );

    for name in [FieldName::TrackingNumber, FieldName::Weight] {
        if let Some(error) = state.field(name).visible_error() {
            let _ = writeln!(out, "  ! {name}: {} [{}]", error.message, error.key);
        }
    }

    if state.delivery_types.is_empty() {
        let _ = writeln!(out, "\nDelivery types: none available");
    } else {
        let _ = writeln!(out, "\nDelivery types");
        for entry in &state.delivery_types {
            let _ = writeln!(
                out,
                "- {} ({}-{} g)",
                entry.label, entry.min_weight, entry.max_weight
            );
        }
    }

    if state.delivery_forms.is_empty() {
        let _ = writeln!(out, "\nDelivery forms: none available");
    } else {
        let _ = writeln!(out, "\nDelivery forms");
        for entry in &state.delivery_forms {
            let _ = writeln!(
                out,
                "- {} ({}-{} g)",
                entry.label, entry.min_weight, entry.max_weight
            );
        }
    }

    out
}
