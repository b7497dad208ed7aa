//! Main application entry point.

use dxfview_app::{App, AppArgs, init_logging, load_config};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match AppArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging);
    log::info!("Starting DxfView");

    let mut app = App::with_config(config);
    match app.run(&args.input) {
        Ok(summary) => {
            log::info!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
