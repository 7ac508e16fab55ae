mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use team_kpi::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
