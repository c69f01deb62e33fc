mod cli;
mod demo;
mod infra;
mod render;

use bauportal::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
