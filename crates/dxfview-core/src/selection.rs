//! Hover and single-line selection.
//!
//! Only `Line` entities are hit-testable. Selected lines expose endpoint
//! handles for the renderer; dragging them is not wired to any edit.

use crate::entity::Scene;
use kurbo::Point;

/// Default hover/click tolerance in screen pixels.
pub const HIT_TOLERANCE_PX: f64 = 5.0;

/// Which endpoint a handle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Start,
    End,
}

/// A selection handle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub position: Point,
}

/// Endpoint handles of the line at `index`; empty if it is not a line.
pub fn line_handles(scene: &Scene, index: usize) -> Vec<Handle> {
    match scene.line(index) {
        Some(line) => vec![
            Handle {
                kind: HandleKind::Start,
                position: line.start,
            },
            Handle {
                kind: HandleKind::End,
                position: line.end,
            },
        ],
        None => Vec::new(),
    }
}

/// The topmost line within `tolerance` (world units) of `point`.
///
/// Later entities are drawn over earlier ones, so the last hit wins.
pub fn hit_test_lines(scene: &Scene, point: Point, tolerance: f64) -> Option<usize> {
    scene
        .lines()
        .filter(|(_, line)| line.hit_test(point, tolerance))
        .map(|(index, _)| index)
        .last()
}

/// Hover and selection indices while the select tool is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub hovered: Option<usize>,
    pub selected: Option<usize>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the hovered line. Returns whether it changed.
    pub fn set_hovered(&mut self, hit: Option<usize>) -> bool {
        let changed = self.hovered != hit;
        self.hovered = hit;
        changed
    }

    /// Apply a click: a line toggles its selection, background clears everything.
    pub fn click(&mut self, hit: Option<usize>) {
        match hit {
            Some(index) if self.selected == Some(index) => self.selected = None,
            Some(index) => self.selected = Some(index),
            None => self.clear(),
        }
    }

    pub fn clear(&mut self) {
        self.hovered = None;
        self.selected = None;
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected == Some(index)
    }

    pub fn is_hovered(&self, index: usize) -> bool {
        self.hovered == Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Circle, Entity, EntityColor, Line};

    fn scene() -> Scene {
        let mut scene = Scene::new();
        scene.push(Entity::Line(Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0))));
        scene.push(Entity::Circle(Circle {
            center: Point::new(50.0, 0.0),
            radius: 10.0,
            color: EntityColor::default(),
        }));
        scene.push(Entity::Line(Line::new(Point::new(50.0, -50.0), Point::new(50.0, 50.0))));
        scene
    }

    #[test]
    fn test_hit_test_single() {
        let scene = scene();
        assert_eq!(hit_test_lines(&scene, Point::new(10.0, 2.0), 5.0), Some(0));
        assert_eq!(hit_test_lines(&scene, Point::new(10.0, 20.0), 5.0), None);
    }

    #[test]
    fn test_hit_test_overlap_last_wins() {
        let scene = scene();
        assert_eq!(hit_test_lines(&scene, Point::new(50.0, 0.0), 5.0), Some(2));
    }

    #[test]
    fn test_hover() {
        let mut state = SelectionState::new();
        assert!(state.set_hovered(Some(0)));
        assert!(!state.set_hovered(Some(0)));
        assert!(state.is_hovered(0));
        assert!(state.set_hovered(None));
        assert_eq!(state.hovered, None);
    }

    #[test]
    fn test_click_toggles() {
        let mut state = SelectionState::new();
        state.click(Some(2));
        assert!(state.is_selected(2));
        state.click(Some(0));
        assert!(state.is_selected(0));
        state.click(Some(0));
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_click_background_clears() {
        let mut state = SelectionState::new();
        state.set_hovered(Some(0));
        state.click(Some(0));
        state.click(None);
        assert_eq!(state, SelectionState::default());
    }

    #[test]
    fn test_line_handles() {
        let scene = scene();
        let handles = line_handles(&scene, 0);
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[0].kind, HandleKind::Start);
        assert_eq!(handles[1].position, Point::new(100.0, 0.0));
        assert!(line_handles(&scene, 1).is_empty());
    }
}
