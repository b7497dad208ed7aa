//! Canvas: the scene, its camera and the interaction session.

use crate::camera::{Camera, FitOutcome, ZoomDirection};
use crate::config::ViewerConfig;
use crate::entity::{Entity, Scene};
use crate::import::{DrawingParser, ImportError, ImportReport, import_drawing};
use crate::input::{Key, KeyEvent, MouseButton, PointerEvent};
use crate::selection::hit_test_lines;
use crate::tools::{LineKeyOutcome, Session, ToolKind, ToolMode};
use kurbo::{Point, Size, Vec2};

/// Canvas state.
///
/// Pointer and key events are routed to the active tool only; wheel events
/// zoom in every tool.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub scene: Scene,
    pub camera: Camera,
    pub session: Session,
    pub config: ViewerConfig,
    /// Viewport size in screen pixels.
    pub viewport_size: Size,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl Canvas {
    /// Create an empty canvas sized and tuned by `config`.
    pub fn new(config: ViewerConfig) -> Self {
        let mut camera = Camera::new();
        camera.min_scale = config.interaction.min_scale;
        camera.max_scale = config.interaction.max_scale;
        let viewport_size = config.canvas.size();
        camera.reset(viewport_size);
        Self {
            scene: Scene::new(),
            camera,
            session: Session::new(),
            config,
            viewport_size,
        }
    }

    /// Import a document, replacing the scene and fitting the view.
    ///
    /// On error the current scene is left untouched.
    pub fn import(
        &mut self,
        text: &str,
        parser: &dyn DrawingParser,
    ) -> Result<(ImportReport, FitOutcome), ImportError> {
        let import = import_drawing(text, parser)?;
        let fit = self.load_scene(import.scene);
        Ok((import.report, fit))
    }

    /// Replace the scene and fit the view to it.
    pub fn load_scene(&mut self, scene: Scene) -> FitOutcome {
        if scene.is_empty() {
            log::warn!("Drawing has no valid entities");
        }
        self.scene = scene;
        // Indices held by the active tool refer to the old scene.
        self.session.mode = ToolMode::enter(self.session.tool());
        self.fit_to_content()
    }

    /// Fit the camera to the scene's entities.
    pub fn fit_to_content(&mut self) -> FitOutcome {
        self.camera.fit_to_entities(
            &self.scene.entities,
            self.viewport_size,
            self.config.canvas.padding,
        )
    }

    pub fn tool(&self) -> ToolKind {
        self.session.tool()
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.session.set_tool(tool);
    }

    /// Zoom one wheel notch at `position`.
    pub fn zoom_at(&mut self, position: Point, delta: Vec2) -> bool {
        match ZoomDirection::from_scroll(delta) {
            Some(direction) => {
                self.camera
                    .zoom_at(position, direction, self.config.interaction.zoom_factor);
                true
            }
            None => false,
        }
    }

    /// Handle a pointer event. Returns whether the view needs a redraw.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> bool {
        if let PointerEvent::Scroll { position, delta } = event {
            return self.zoom_at(*position, *delta);
        }

        match self.session.tool() {
            ToolKind::Pan => self.handle_pan(event),
            ToolKind::Select => self.handle_select(event),
            ToolKind::Line => self.handle_line(event),
        }
    }

    /// Handle a key event. Returns whether the view needs a redraw.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        let KeyEvent::Pressed(key) = event else {
            return false;
        };
        if self.session.tool() != ToolKind::Line {
            return false;
        }

        match key {
            Key::F3 => {
                self.session.toggle_snap();
                return true;
            }
            Key::F8 => {
                self.session.toggle_ortho();
                return true;
            }
            _ => {}
        }

        let constraints = self.session.constraints(self.snap_threshold());
        let ToolMode::Line(tool) = &mut self.session.mode else {
            return false;
        };
        match tool.key_pressed(key, constraints) {
            LineKeyOutcome::Ignored => false,
            LineKeyOutcome::Updated | LineKeyOutcome::Aborted => true,
            LineKeyOutcome::Committed(line) => {
                let index = self.scene.push(Entity::Line(line));
                log::debug!("Committed typed line #{index}");
                true
            }
        }
    }

    /// Snap radius in world units at the current zoom.
    pub fn snap_threshold(&self) -> f64 {
        self.camera
            .world_tolerance(self.config.interaction.snap_radius_px)
    }

    /// Hit tolerance in world units at the current zoom.
    pub fn hit_tolerance(&self) -> f64 {
        self.camera
            .world_tolerance(self.config.interaction.hit_tolerance_px)
    }

    /// The in-progress segment in world coordinates, if drawing.
    pub fn line_preview(&self) -> Option<(Point, Point)> {
        self.session.line_tool()?.preview()
    }

    fn handle_pan(&mut self, event: &PointerEvent) -> bool {
        let ToolMode::Pan(pan) = &mut self.session.mode else {
            return false;
        };
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => {
                pan.pointer_down(*position);
                false
            }
            PointerEvent::Move { position } => match pan.pointer_move(*position) {
                Some(delta) => {
                    self.camera.pan(delta);
                    true
                }
                None => false,
            },
            PointerEvent::Up { .. } => {
                pan.pointer_up();
                false
            }
            _ => false,
        }
    }

    fn handle_select(&mut self, event: &PointerEvent) -> bool {
        let world = self.camera.screen_to_world(event.position());
        let hit = hit_test_lines(&self.scene, world, self.hit_tolerance());
        let ToolMode::Select(state) = &mut self.session.mode else {
            return false;
        };
        match event {
            PointerEvent::Move { .. } => state.set_hovered(hit),
            PointerEvent::Down {
                button: MouseButton::Left,
                ..
            } => {
                state.click(hit);
                true
            }
            _ => false,
        }
    }

    fn handle_line(&mut self, event: &PointerEvent) -> bool {
        let world = self.camera.screen_to_world(event.position());
        let constraints = self.session.constraints(self.snap_threshold());
        let ToolMode::Line(tool) = &mut self.session.mode else {
            return false;
        };
        match event {
            PointerEvent::Down {
                button: MouseButton::Left,
                ..
            } => {
                if let Some(line) = tool.pointer_down(world, &self.scene.entities, constraints) {
                    let index = self.scene.push(Entity::Line(line));
                    log::debug!("Committed line #{index}");
                }
                true
            }
            PointerEvent::Move { .. } => {
                tool.pointer_move(world, &self.scene.entities, constraints);
                tool.is_collecting()
            }
            _ => false,
        }
    }
}
