use std::process::ExitCode;

use clap::Parser;

use tracing_subscriber::EnvFilter;

mod app;
mod args;

use app::App;
use args::Args;

fn main() -> ExitCode {
    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    initialise_tracing();

    let app = match App::new(&args) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    app.run()
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
