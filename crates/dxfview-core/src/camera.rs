//! Camera module for pan/zoom transforms.
//!
//! Drawing data is y-up while the canvas is y-down, so the world-to-screen
//! transform scales by `(scale, -scale)` and then adds the screen-space
//! offset: `screen = world * (scale, -scale) + offset`.

use crate::entity::{Entity, bounds_of};
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Fit scales above this are treated as nonsense and replaced by 1.
pub const MAX_FIT_SCALE: f64 = 1e6;

/// Wheel step.
pub const DEFAULT_ZOOM_FACTOR: f64 = 1.1;

/// Direction of one wheel notch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Wheel deltas follow the browser convention: negative y scrolls up, which zooms in.
    pub fn from_scroll(delta: Vec2) -> Option<Self> {
        if delta.y < 0.0 {
            Some(ZoomDirection::In)
        } else if delta.y > 0.0 {
            Some(ZoomDirection::Out)
        } else {
            None
        }
    }
}

/// Result of a fit-to-content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitOutcome {
    /// The content box was framed.
    Fitted { bounds: Rect },
    /// The computed scale was unusable; scale 1 was used around the box center.
    ScaleFallback { bounds: Rect },
    /// Nothing to frame; scale 1 with the world origin at the canvas center.
    Degenerate,
}

/// Camera manages the view transform for the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Translation in screen pixels, applied after scaling.
    pub offset: Vec2,
    /// Screen pixels per world unit.
    pub scale: f64,
    /// Minimum allowed scale.
    pub min_scale: f64,
    /// Maximum allowed scale.
    pub max_scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            min_scale: 1e-6,
            max_scale: MAX_FIT_SCALE,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// World-to-screen transform, including the y-flip.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale_non_uniform(self.scale, -self.scale)
    }

    /// Screen-to-world transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale_non_uniform(1.0 / self.scale, -1.0 / self.scale)
            * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Convert a screen-pixel distance to world units.
    pub fn world_tolerance(&self, pixels: f64) -> f64 {
        pixels / self.scale
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor` per notch, keeping the world point under `screen_point` fixed.
    pub fn zoom_at(&mut self, screen_point: Point, direction: ZoomDirection, factor: f64) {
        let factor = match direction {
            ZoomDirection::In => factor,
            ZoomDirection::Out => 1.0 / factor,
        };
        // A fit may leave the scale outside the limits; never step back across them.
        let lo = self.min_scale.min(self.scale);
        let hi = self.max_scale.max(self.scale);
        let new_scale = (self.scale * factor).clamp(lo, hi);
        if !new_scale.is_finite() || (new_scale - self.scale).abs() < f64::EPSILON * self.scale {
            return;
        }

        let world_point = self.screen_to_world(screen_point);
        self.scale = new_scale;

        // offset' = pointer - world * (scale, -scale)
        self.offset = Vec2::new(
            screen_point.x - world_point.x * new_scale,
            screen_point.y + world_point.y * new_scale,
        );
    }

    /// Reset to scale 1 with the world origin at the center of `viewport`.
    pub fn reset(&mut self, viewport: Size) {
        self.scale = 1.0;
        self.offset = Vec2::new(viewport.width / 2.0, viewport.height / 2.0);
    }

    /// Fit the camera to show `bounds` inside `viewport`.
    ///
    /// `padding` is the total margin reserved on each axis. An axis with zero
    /// extent does not constrain the scale; if neither axis does, the camera
    /// falls back to [`Camera::reset`].
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) -> FitOutcome {
        let width = bounds.width();
        let height = bounds.height();

        let scale_x = (width > 0.0).then(|| (viewport.width - padding) / width);
        let scale_y = (height > 0.0).then(|| (viewport.height - padding) / height);

        let scale = match (scale_x, scale_y) {
            (Some(sx), Some(sy)) => sx.min(sy),
            (Some(sx), None) => {
                log::debug!("Content has no height; width alone sets the fit scale");
                sx
            }
            (None, Some(sy)) => {
                log::debug!("Content has no width; height alone sets the fit scale");
                sy
            }
            (None, None) => {
                log::warn!("Content bounds are degenerate ({width} x {height}); using default view");
                self.reset(viewport);
                return FitOutcome::Degenerate;
            }
        };

        let (scale, outcome) = if scale.is_finite() && scale > 0.0 && scale <= MAX_FIT_SCALE {
            (scale, FitOutcome::Fitted { bounds })
        } else {
            log::warn!("Fit scale {scale} is unusable; falling back to 1");
            (1.0, FitOutcome::ScaleFallback { bounds })
        };

        self.scale = scale;
        let center = bounds.center();
        self.offset = Vec2::new(
            viewport.width / 2.0 - center.x * scale,
            viewport.height / 2.0 - center.y * -scale,
        );
        outcome
    }

    /// Fit the camera to the extents of `entities`.
    pub fn fit_to_entities(&mut self, entities: &[Entity], viewport: Size, padding: f64) -> FitOutcome {
        match bounds_of(entities.iter().flat_map(Entity::extent_points)) {
            Some(bounds) => self.fit_to_bounds(bounds, viewport, padding),
            None => {
                log::warn!("No entity contributes a valid point; using default view");
                self.reset(viewport);
                FitOutcome::Degenerate
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Circle, EntityColor, Line};

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Entity {
        Entity::Line(Line::new(Point::new(x0, y0), Point::new(x1, y1)))
    }

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_world_to_screen_flips_y() {
        let mut camera = Camera::new();
        camera.scale = 2.0;
        camera.offset = Vec2::new(100.0, 300.0);
        let screen = camera.world_to_screen(Point::new(10.0, 10.0));
        assert!((screen.x - 120.0).abs() < 1e-10);
        assert!((screen.y - 280.0).abs() < 1e-10);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(30.0, -20.0);
        camera.scale = 1.5;

        let original = Point::new(123.0, 456.0);
        let world = camera.screen_to_world(original);
        let back = camera.world_to_screen(world);

        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_keeps_anchor() {
        let mut camera = Camera::new();
        camera.scale = 3.7;
        camera.offset = Vec2::new(-41.0, 512.0);

        for pointer in [Point::new(0.0, 0.0), Point::new(640.0, 12.5), Point::new(-5.0, 900.0)] {
            for direction in [ZoomDirection::In, ZoomDirection::Out] {
                let before = camera.screen_to_world(pointer);
                camera.zoom_at(pointer, direction, DEFAULT_ZOOM_FACTOR);
                let after = camera.screen_to_world(pointer);
                assert!((before.x - after.x).abs() < 1e-9);
                assert!((before.y - after.y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_zoom_steps() {
        let mut camera = Camera::new();
        camera.zoom_at(Point::ZERO, ZoomDirection::In, 1.1);
        assert!((camera.scale - 1.1).abs() < 1e-12);
        camera.zoom_at(Point::ZERO, ZoomDirection::Out, 1.1);
        assert!((camera.scale - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.max_scale = 1.05;
        camera.zoom_at(Point::new(10.0, 10.0), ZoomDirection::In, 1.1);
        assert!((camera.scale - 1.05).abs() < f64::EPSILON);
        let offset = camera.offset;
        camera.zoom_at(Point::new(10.0, 10.0), ZoomDirection::In, 1.1);
        assert_eq!(camera.offset, offset);
    }

    #[test]
    fn test_zoom_below_min_scale_keeps_direction() {
        let mut camera = Camera::new();
        camera.scale = 5e-7;
        camera.zoom_at(Point::new(10.0, 10.0), ZoomDirection::Out, 1.1);
        assert!(camera.scale <= 5e-7);
        camera.zoom_at(Point::new(10.0, 10.0), ZoomDirection::In, 1.1);
        assert!((camera.scale - 5.5e-7).abs() < 1e-18);
        camera.zoom_at(Point::new(10.0, 10.0), ZoomDirection::Out, 1.1);
        assert!((camera.scale - 5e-7).abs() < 1e-18);
    }

    #[test]
    fn test_zoom_above_max_scale_keeps_direction() {
        let mut camera = Camera::new();
        camera.max_scale = 2.0;
        camera.scale = 4.0;
        camera.zoom_at(Point::ZERO, ZoomDirection::In, 1.1);
        assert!((camera.scale - 4.0).abs() < f64::EPSILON);
        camera.zoom_at(Point::ZERO, ZoomDirection::Out, 1.1);
        assert!((camera.scale - 4.0 / 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_pan() {
        let mut camera = Camera::new();
        camera.scale = 5.0;
        camera.pan(Vec2::new(10.0, 20.0));
        assert!((camera.offset.x - 10.0).abs() < f64::EPSILON);
        assert!((camera.offset.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scroll_direction() {
        assert_eq!(ZoomDirection::from_scroll(Vec2::new(0.0, -3.0)), Some(ZoomDirection::In));
        assert_eq!(ZoomDirection::from_scroll(Vec2::new(0.0, 3.0)), Some(ZoomDirection::Out));
        assert_eq!(ZoomDirection::from_scroll(Vec2::ZERO), None);
    }

    #[test]
    fn test_fit_single_horizontal_line() {
        let mut camera = Camera::new();
        let outcome = camera.fit_to_entities(
            &[line(0.0, 0.0, 200.0, 0.0)],
            Size::new(1000.0, 600.0),
            50.0,
        );
        assert!(matches!(outcome, FitOutcome::Fitted { .. }));
        assert!((camera.scale - 4.75).abs() < 1e-12);
        // Line center lands at the canvas center.
        let center = camera.world_to_screen(Point::new(100.0, 0.0));
        assert!((center.x - 500.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_limits_one_axis_exactly() {
        let mut camera = Camera::new();
        let viewport = Size::new(1000.0, 600.0);
        let entities = [
            line(-30.0, 10.0, 170.0, 60.0),
            Entity::Circle(Circle {
                center: Point::new(50.0, 100.0),
                radius: 40.0,
                color: EntityColor::default(),
            }),
        ];
        camera.fit_to_entities(&entities, viewport, 50.0);

        let bounds = bounds_of(entities.iter().flat_map(Entity::extent_points)).unwrap();
        let a = camera.world_to_screen(Point::new(bounds.x0, bounds.y0));
        let b = camera.world_to_screen(Point::new(bounds.x1, bounds.y1));
        let screen_w = (b.x - a.x).abs();
        let screen_h = (b.y - a.y).abs();

        assert!(screen_w <= 950.0 + 1e-9);
        assert!(screen_h <= 550.0 + 1e-9);
        assert!((screen_w - 950.0).abs() < 1e-9 || (screen_h - 550.0).abs() < 1e-9);
        // Fully on screen.
        for p in [a, b] {
            assert!(p.x >= 0.0 && p.x <= 1000.0);
            assert!(p.y >= 0.0 && p.y <= 600.0);
        }
    }

    #[test]
    fn test_fit_empty_is_degenerate() {
        let mut camera = Camera::new();
        let outcome = camera.fit_to_entities(&[], Size::new(800.0, 400.0), 50.0);
        assert_eq!(outcome, FitOutcome::Degenerate);
        assert!((camera.scale - 1.0).abs() < f64::EPSILON);
        assert_eq!(camera.world_to_screen(Point::ZERO), Point::new(400.0, 200.0));
    }

    #[test]
    fn test_fit_single_point_is_degenerate() {
        let mut camera = Camera::new();
        let outcome = camera.fit_to_entities(
            &[line(5.0, 5.0, 5.0, 5.0)],
            Size::new(800.0, 400.0),
            50.0,
        );
        assert_eq!(outcome, FitOutcome::Degenerate);
    }

    #[test]
    fn test_fit_tiny_canvas_falls_back() {
        let mut camera = Camera::new();
        let outcome = camera.fit_to_entities(
            &[line(0.0, 0.0, 10.0, 10.0)],
            Size::new(40.0, 40.0),
            50.0,
        );
        assert!(matches!(outcome, FitOutcome::ScaleFallback { .. }));
        assert!((camera.scale - 1.0).abs() < f64::EPSILON);
        let center = camera.world_to_screen(Point::new(5.0, 5.0));
        assert!((center.x - 20.0).abs() < 1e-9);
        assert!((center.y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_circle_reaching_past_limit() {
        let mut camera = Camera::new();
        let circle = Entity::Circle(Circle {
            center: Point::new(5e8, 0.0),
            radius: 6e8,
            color: EntityColor::default(),
        });
        assert!(circle.is_valid());
        let outcome = camera.fit_to_entities(&[circle], Size::new(1000.0, 600.0), 50.0);
        assert!(matches!(outcome, FitOutcome::Fitted { .. }));
        // 1.2e9 square box; the height is the tighter axis.
        assert!((camera.scale - 550.0 / 1.2e9).abs() < 1e-18);
        let center = camera.world_to_screen(Point::new(5e8, 0.0));
        assert!((center.x - 500.0).abs() < 1e-6);
        assert!((center.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_fit_huge_scale_falls_back() {
        let mut camera = Camera::new();
        let outcome = camera.fit_to_entities(
            &[line(0.0, 0.0, 1e-9, 1e-9)],
            Size::new(1000.0, 600.0),
            50.0,
        );
        assert!(matches!(outcome, FitOutcome::ScaleFallback { .. }));
        assert!((camera.scale - 1.0).abs() < f64::EPSILON);
    }
}
