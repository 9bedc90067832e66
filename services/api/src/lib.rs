mod cli;
mod infra;
mod routes;
mod score;
mod server;

use wheel_of_life::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
