//! Command-line arguments, configuration lookup and logger setup.

use crate::app::AppError;
use dxfview_core::ViewerConfig;
use dxfview_core::config::LoggingConfig;
use std::path::PathBuf;

pub const USAGE: &str = "usage: dxfview [--config PATH] FILE.json";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppArgs {
    /// Drawing to open.
    pub input: PathBuf,
    /// Explicit configuration file; discovery is used when absent.
    pub config: Option<PathBuf>,
}

impl AppArgs {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, AppError> {
        let mut input = None;
        let mut config = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args
                        .next()
                        .ok_or_else(|| AppError::Usage("--config needs a path".into()))?;
                    config = Some(PathBuf::from(path));
                }
                "--help" | "-h" => return Err(AppError::Usage(USAGE.into())),
                flag if flag.starts_with('-') => {
                    return Err(AppError::Usage(format!("unknown option {flag}\n{USAGE}")));
                }
                _ if input.is_some() => {
                    return Err(AppError::Usage(format!("unexpected argument {arg}\n{USAGE}")));
                }
                _ => input = Some(PathBuf::from(arg)),
            }
        }

        let input = input.ok_or_else(|| AppError::Usage(USAGE.into()))?;
        Ok(Self { input, config })
    }
}

/// Load the configuration named on the command line, or discover one.
pub fn load_config(args: &AppArgs) -> Result<ViewerConfig, AppError> {
    let config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::discover()?,
    };
    Ok(config)
}

/// Initialize `env_logger`. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &LoggingConfig) {
    let env = env_logger::Env::default().default_filter_or(config.level.as_str());
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
