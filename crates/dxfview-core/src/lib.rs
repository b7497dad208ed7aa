//! DxfView Core Library
//!
//! Platform-agnostic core for the drawing viewer: the entity model and its
//! importer, the camera, snapping and the interactive tool session.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod entity;
pub mod import;
pub mod input;
pub mod selection;
pub mod snap;
pub mod tools;

pub use camera::{Camera, FitOutcome, ZoomDirection};
pub use canvas::Canvas;
pub use config::{ConfigError, ViewerConfig};
pub use entity::{BlockInsert, Circle, Entity, EntityColor, Line, Polyline, Scene, Text};
pub use import::{
    Diagnostic, DrawingParser, Import, ImportError, ImportReport, JsonDrawingParser, ParseError,
    import_drawing, normalize,
};
pub use input::{Key, KeyEvent, MouseButton, PointerEvent};
pub use selection::{Handle, HandleKind, SelectionState, line_handles};
pub use snap::{SnapResult, apply_ortho, snap_to_line_endpoints};
pub use tools::{Session, ToolKind, ToolMode};
