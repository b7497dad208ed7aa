//! Renderer trait abstraction and frame building.

use dxfview_core::canvas::Canvas;
use dxfview_core::entity::{DEFAULT_THICKNESS_MM, Entity, Line};
use dxfview_core::selection::line_handles;
use kurbo::{Affine, Circle, Point, Size, Vec2};
use peniko::Color;
use std::f64::consts::TAU;
use thiserror::Error;

/// Screen pixels per millimeter at 96 DPI.
const PX_PER_MM: f64 = 96.0 / 25.4;

/// Extra width, in pixels, of hover and selection overlays.
const HIGHLIGHT_EXTRA_WIDTH: f64 = 2.0;

/// Segments used for circles under a non-uniform block scale.
const ELLIPSE_SEGMENTS: usize = 64;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Frame not started")]
    FrameNotStarted,
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Viewport size in pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Selected line overlay and handle color.
    pub selection_color: Color,
    /// Hovered line overlay color.
    pub hover_color: Color,
    /// In-progress line color.
    pub preview_color: Color,
    /// Levels of block insert expanded.
    pub max_block_depth: usize,
    /// Handle side length in pixels.
    pub handle_size: f64,
    /// Text height in pixels.
    pub text_size: f64,
}

impl<'a> RenderContext<'a> {
    /// Create a render context using the canvas' render settings.
    pub fn new(canvas: &'a Canvas, viewport_size: Size) -> Self {
        let render = &canvas.config.render;
        Self {
            canvas,
            viewport_size,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            selection_color: render.selection_color.into(),
            hover_color: render.hover_color.into(),
            preview_color: render.preview_color.into(),
            max_block_depth: render.max_block_depth,
            handle_size: render.handle_size_px,
            text_size: 12.0,
        }
    }

    /// Set how many levels of block insert are expanded.
    pub fn with_max_block_depth(mut self, depth: usize) -> Self {
        self.max_block_depth = depth;
        self
    }

    /// Set the text height.
    pub fn with_text_size(mut self, size: f64) -> Self {
        self.text_size = size;
        self
    }
}

/// Trait for rendering backends.
///
/// All geometry is already in screen space; widths and sizes are in pixels.
pub trait Renderer: Send + Sync {
    fn begin_frame(&mut self, viewport: Size, background: Color);

    fn draw_line(&mut self, line: kurbo::Line, color: Color, width: f64);

    fn draw_circle(&mut self, circle: Circle, color: Color, width: f64);

    fn draw_polyline(&mut self, points: &[Point], closed: bool, color: Color, width: f64);

    /// `rotation` is in radians, clockwise on screen.
    fn draw_text(&mut self, position: Point, rotation: f64, text: &str, color: Color, size: f64);

    fn draw_handle(&mut self, center: Point, size: f64, color: Color);

    fn end_frame(&mut self) -> RenderResult<()>;
}

/// Build one frame of `ctx.canvas` into `renderer`.
///
/// Draw order: scene entities (block inserts expanded), hover overlay,
/// selection overlay and handles, then the in-progress line.
pub fn build_frame(ctx: &RenderContext, renderer: &mut dyn Renderer) -> RenderResult<()> {
    let canvas = ctx.canvas;
    let camera = canvas.camera.transform();

    renderer.begin_frame(ctx.viewport_size, ctx.background_color);

    let mut builder = FrameBuilder {
        ctx,
        renderer: &mut *renderer,
        block_stack: Vec::new(),
    };
    builder.draw_entities(&canvas.scene.entities, camera, 0);

    if let Some(selection) = canvas.session.selection() {
        if let Some(line) = selection.hovered.and_then(|i| canvas.scene.line(i)) {
            builder.draw_overlay(line, camera, ctx.hover_color);
        }
        if let Some(index) = selection.selected {
            if let Some(line) = canvas.scene.line(index) {
                builder.draw_overlay(line, camera, ctx.selection_color);
            }
            for handle in line_handles(&canvas.scene, index) {
                renderer.draw_handle(camera * handle.position, ctx.handle_size, ctx.selection_color);
            }
        }
    }

    if let Some((start, end)) = canvas.line_preview() {
        renderer.draw_line(
            kurbo::Line::new(camera * start, camera * end),
            ctx.preview_color,
            stroke_width(DEFAULT_THICKNESS_MM),
        );
    }

    renderer.end_frame()
}

struct FrameBuilder<'c, 'r> {
    ctx: &'c RenderContext<'c>,
    renderer: &'r mut dyn Renderer,
    /// Names of the blocks currently being expanded.
    block_stack: Vec<&'c str>,
}

impl<'c> FrameBuilder<'c, '_> {
    fn draw_entities(&mut self, entities: &'c [Entity], transform: Affine, depth: usize) {
        for entity in entities {
            self.draw_entity(entity, transform, depth);
        }
    }

    fn draw_entity(&mut self, entity: &'c Entity, transform: Affine, depth: usize) {
        match entity {
            Entity::Line(line) => {
                self.renderer.draw_line(
                    transform * line.as_kurbo(),
                    line.color.into(),
                    stroke_width(line.thickness_mm),
                );
            }
            Entity::Circle(circle) => {
                self.draw_circle(circle.center, circle.radius, circle.color.into(), transform);
            }
            Entity::Polyline(polyline) => {
                let points: Vec<Point> = polyline.points.iter().map(|p| transform * *p).collect();
                self.renderer.draw_polyline(
                    &points,
                    polyline.closed,
                    polyline.color.into(),
                    stroke_width(DEFAULT_THICKNESS_MM),
                );
            }
            Entity::Text(text) => {
                let radians = text.rotation.to_radians();
                let origin = transform * text.position;
                let along = transform * (text.position + Vec2::new(radians.cos(), radians.sin()));
                self.renderer.draw_text(
                    origin,
                    (along - origin).atan2(),
                    &text.text,
                    text.color.into(),
                    self.ctx.text_size,
                );
            }
            Entity::BlockInsert(insert) => {
                let name = insert.block_name.as_str();
                if depth >= self.ctx.max_block_depth {
                    log::debug!("Block {name:?} below expansion depth {depth}; skipped");
                    return;
                }
                if self.block_stack.contains(&name) {
                    log::debug!("Block {name:?} inserts itself; skipped");
                    return;
                }
                let Some(body) = self.ctx.canvas.scene.block(name) else {
                    log::debug!("Block {name:?} is not defined; skipped");
                    return;
                };
                self.block_stack.push(name);
                self.draw_entities(body, transform * insert.transform(), depth + 1);
                self.block_stack.pop();
            }
        }
    }

    fn draw_circle(&mut self, center: Point, radius: f64, color: Color, transform: Affine) {
        let width = stroke_width(DEFAULT_THICKNESS_MM);
        let [a, b, c, d, _, _] = transform.as_coeffs();
        let x_scale = Vec2::new(a, b).hypot();
        let y_scale = Vec2::new(c, d).hypot();
        let orthogonal = (a * c + b * d).abs() < 1e-9 * x_scale * y_scale;

        if orthogonal && (x_scale - y_scale).abs() <= 1e-9 * x_scale.max(y_scale) {
            self.renderer
                .draw_circle(Circle::new(transform * center, radius * x_scale), color, width);
        } else {
            let points: Vec<Point> = (0..ELLIPSE_SEGMENTS)
                .map(|i| {
                    let t = TAU * i as f64 / ELLIPSE_SEGMENTS as f64;
                    transform * (center + Vec2::new(radius * t.cos(), radius * t.sin()))
                })
                .collect();
            self.renderer.draw_polyline(&points, true, color, width);
        }
    }

    fn draw_overlay(&mut self, line: &Line, transform: Affine, color: Color) {
        self.renderer.draw_line(
            transform * line.as_kurbo(),
            color,
            stroke_width(line.thickness_mm) + HIGHLIGHT_EXTRA_WIDTH,
        );
    }
}

/// On-screen stroke width for a lineweight, never thinner than one pixel.
fn stroke_width(thickness_mm: f64) -> f64 {
    (thickness_mm * PX_PER_MM).max(1.0)
}
