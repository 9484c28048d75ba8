mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use loyalty_bonus::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
