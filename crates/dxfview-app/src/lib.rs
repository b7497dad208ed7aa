//! DxfView Application
//!
//! Command-line shell: loads configuration, sets up logging, imports a
//! drawing and renders one frame of it.

mod app;
mod args;

pub use app::{App, AppError, FrameSummary};
pub use args::{AppArgs, USAGE, init_logging, load_config};
