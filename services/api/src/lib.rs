mod cli;
mod fetch;
mod infra;
mod report;
mod routes;
mod server;

use kokkai::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
