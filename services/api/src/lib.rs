mod check;
mod cli;
mod infra;
mod routes;
mod server;

use parcel_form::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
