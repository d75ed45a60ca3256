mod cli;
mod report;

use scangrade::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
