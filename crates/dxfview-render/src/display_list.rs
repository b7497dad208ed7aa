//! Renderer that records draw calls instead of rasterizing them.

use crate::renderer::{RenderResult, Renderer, RendererError};
use kurbo::{Circle, Line, Point, Rect, Size};
use peniko::Color;

/// One recorded draw call, in screen space.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Line {
        line: Line,
        color: Color,
        width: f64,
    },
    Circle {
        circle: Circle,
        color: Color,
        width: f64,
    },
    Polyline {
        points: Vec<Point>,
        closed: bool,
        color: Color,
        width: f64,
    },
    Text {
        position: Point,
        rotation: f64,
        text: String,
        color: Color,
        size: f64,
    },
    Handle {
        rect: Rect,
        color: Color,
    },
}

impl DrawCommand {
    pub fn color(&self) -> Color {
        match self {
            DrawCommand::Line { color, .. }
            | DrawCommand::Circle { color, .. }
            | DrawCommand::Polyline { color, .. }
            | DrawCommand::Text { color, .. }
            | DrawCommand::Handle { color, .. } => *color,
        }
    }
}

/// The commands of the last completed frame.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    viewport: Size,
    background: Option<Color>,
    commands: Vec<DrawCommand>,
    in_frame: bool,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Background of the last frame, if one was started.
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    fn push(&mut self, command: DrawCommand) {
        if !self.in_frame {
            log::debug!("Draw call outside a frame ignored");
            return;
        }
        self.commands.push(command);
    }
}

impl Renderer for DisplayList {
    fn begin_frame(&mut self, viewport: Size, background: Color) {
        self.viewport = viewport;
        self.background = Some(background);
        self.commands.clear();
        self.in_frame = true;
    }

    fn draw_line(&mut self, line: Line, color: Color, width: f64) {
        self.push(DrawCommand::Line { line, color, width });
    }

    fn draw_circle(&mut self, circle: Circle, color: Color, width: f64) {
        self.push(DrawCommand::Circle {
            circle,
            color,
            width,
        });
    }

    fn draw_polyline(&mut self, points: &[Point], closed: bool, color: Color, width: f64) {
        self.push(DrawCommand::Polyline {
            points: points.to_vec(),
            closed,
            color,
            width,
        });
    }

    fn draw_text(&mut self, position: Point, rotation: f64, text: &str, color: Color, size: f64) {
        self.push(DrawCommand::Text {
            position,
            rotation,
            text: text.to_string(),
            color,
            size,
        });
    }

    fn draw_handle(&mut self, center: Point, size: f64, color: Color) {
        let rect = Rect::from_center_size(center, Size::new(size, size));
        self.push(DrawCommand::Handle { rect, color });
    }

    fn end_frame(&mut self) -> RenderResult<()> {
        if !self.in_frame {
            return Err(RendererError::FrameNotStarted);
        }
        self.in_frame = false;
        Ok(())
    }
}
