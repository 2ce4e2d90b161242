mod cli;
mod infra;
mod routes;
mod server;

use vacancy_stats::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
