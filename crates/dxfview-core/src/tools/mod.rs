//! Tool modes and the interaction session.

mod line;

pub use line::{Constraints, LineKeyOutcome, LineTool};

use crate::selection::SelectionState;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Pan,
    Select,
    Line,
}

/// Pan tool: drags the view while the pointer is held.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanTool {
    /// Screen position of the last drag sample.
    pub drag_anchor: Option<Point>,
}

impl PanTool {
    pub fn pointer_down(&mut self, position: Point) {
        self.drag_anchor = Some(position);
    }

    /// Screen delta to pan by, if dragging.
    pub fn pointer_move(&mut self, position: Point) -> Option<Vec2> {
        let anchor = self.drag_anchor.as_mut()?;
        let delta = position - *anchor;
        *anchor = position;
        Some(delta)
    }

    pub fn pointer_up(&mut self) {
        self.drag_anchor = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }
}

/// The active tool together with the state it owns.
///
/// Switching tools replaces the whole value, so nothing from the previous
/// mode survives the switch.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolMode {
    Pan(PanTool),
    Select(SelectionState),
    Line(LineTool),
}

impl ToolMode {
    pub fn enter(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Pan => ToolMode::Pan(PanTool::default()),
            ToolKind::Select => ToolMode::Select(SelectionState::new()),
            ToolKind::Line => ToolMode::Line(LineTool::new()),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ToolMode::Pan(_) => ToolKind::Pan,
            ToolMode::Select(_) => ToolKind::Select,
            ToolMode::Line(_) => ToolKind::Line,
        }
    }
}

impl Default for ToolMode {
    fn default() -> Self {
        Self::enter(ToolKind::default())
    }
}

/// Interaction session: the active mode plus the global drawing toggles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub mode: ToolMode,
    /// Lock drawn segments to horizontal/vertical.
    pub ortho: bool,
    /// Snap drawn points to existing line endpoints.
    pub snap: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> ToolKind {
        self.mode.kind()
    }

    /// Switch tools. Re-selecting the active tool keeps its state.
    pub fn set_tool(&mut self, kind: ToolKind) {
        if self.tool() == kind {
            return;
        }
        log::debug!("Tool {:?} -> {:?}", self.tool(), kind);
        self.mode = ToolMode::enter(kind);
    }

    pub fn toggle_ortho(&mut self) -> bool {
        self.ortho = !self.ortho;
        log::debug!("Ortho {}", if self.ortho { "on" } else { "off" });
        self.ortho
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.snap = !self.snap;
        log::debug!("Snap {}", if self.snap { "on" } else { "off" });
        self.snap
    }

    pub fn constraints(&self, snap_threshold: f64) -> Constraints {
        Constraints {
            snap: self.snap,
            ortho: self.ortho,
            snap_threshold,
        }
    }

    pub fn selection(&self) -> Option<&SelectionState> {
        match &self.mode {
            ToolMode::Select(state) => Some(state),
            _ => None,
        }
    }

    pub fn line_tool(&self) -> Option<&LineTool> {
        match &self.mode {
            ToolMode::Line(tool) => Some(tool),
            _ => None,
        }
    }
}
