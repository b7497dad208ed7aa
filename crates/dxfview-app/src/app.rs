//! Application state: a canvas and the display list it renders into.

use dxfview_core::{
    Canvas, ConfigError, FitOutcome, ImportError, ImportReport, JsonDrawingParser, ViewerConfig,
};
use dxfview_render::{DisplayList, RenderContext, RendererError, build_frame};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to import drawing: {0}")]
    Import(#[from] ImportError),
    #[error("Failed to render: {0}")]
    Render(#[from] RendererError),
}

/// What one `run` produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub entities: usize,
    pub blocks: usize,
    pub diagnostics: usize,
    pub ignored: usize,
    pub scale: f64,
    pub commands: usize,
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entities, {} blocks, {} diagnostics, {} ignored; scale {:.4}; {} draw commands",
            self.entities, self.blocks, self.diagnostics, self.ignored, self.scale, self.commands
        )
    }
}

/// The viewer application.
pub struct App {
    canvas: Canvas,
    display_list: DisplayList,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(ViewerConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: ViewerConfig) -> Self {
        Self {
            canvas: Canvas::new(config),
            display_list: DisplayList::new(),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn display_list(&self) -> &DisplayList {
        &self.display_list
    }

    /// Read and import a drawing file, fitting the view to it.
    pub fn open(&mut self, path: &Path) -> Result<(ImportReport, FitOutcome), AppError> {
        let text = fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let opened = self.canvas.import(&text, &JsonDrawingParser)?;
        log::info!("Opened {}", path.display());
        Ok(opened)
    }

    /// Rebuild the display list from the canvas.
    pub fn render(&mut self) -> Result<&DisplayList, AppError> {
        let ctx = RenderContext::new(&self.canvas, self.canvas.viewport_size);
        build_frame(&ctx, &mut self.display_list)?;
        Ok(&self.display_list)
    }

    /// Open `path`, render one frame and summarize it.
    pub fn run(&mut self, path: &Path) -> Result<FrameSummary, AppError> {
        let (report, fit) = self.open(path)?;
        if let FitOutcome::Degenerate = fit {
            log::info!("Nothing to frame in {}", path.display());
        }
        let commands = self.render()?.len();

        Ok(FrameSummary {
            entities: self.canvas.scene.len(),
            blocks: self.canvas.scene.blocks.len(),
            diagnostics: report.diagnostics.len(),
            ignored: report.ignored,
            scale: self.canvas.camera.scale,
            commands,
        })
    }
}
