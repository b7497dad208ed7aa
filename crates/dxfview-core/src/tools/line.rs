//! Line tool: click-to-click segment drawing with snap, ortho and typed length.

use crate::entity::{Entity, Line, is_valid_point};
use crate::input::Key;
use crate::snap::{apply_ortho, snap_to_line_endpoints};
use kurbo::{Point, Vec2};

/// Snap/ortho settings in effect for one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub snap: bool,
    pub ortho: bool,
    /// Snap radius in world units.
    pub snap_threshold: f64,
}

/// What a key press did to the line tool.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKeyOutcome {
    /// Nothing to do for this key in the current state.
    Ignored,
    /// The typed-length buffer or pending line changed.
    Updated,
    /// A typed length was accepted and produced a segment.
    Committed(Line),
    /// The pending line was discarded.
    Aborted,
}

/// In-progress line state.
///
/// `pending_start` set means the tool is collecting; `typed_length` set means
/// the user is typing a length and pointer moves no longer steer the preview.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineTool {
    pub pending_start: Option<Point>,
    pub preview_end: Option<Point>,
    pub typed_length: Option<String>,
}

impl LineTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collecting(&self) -> bool {
        self.pending_start.is_some()
    }

    pub fn is_typing(&self) -> bool {
        self.typed_length.is_some()
    }

    /// The segment to draw as a live preview.
    pub fn preview(&self) -> Option<(Point, Point)> {
        Some((self.pending_start?, self.preview_end?))
    }

    /// Drop the pending line and any typed length.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Start a line, or commit the pending one and chain from its end.
    pub fn pointer_down(
        &mut self,
        world: Point,
        entities: &[Entity],
        constraints: Constraints,
    ) -> Option<Line> {
        let snapped = snap_point(world, entities, constraints);

        let Some(start) = self.pending_start else {
            self.pending_start = Some(snapped);
            self.preview_end = Some(snapped);
            self.typed_length = None;
            return None;
        };

        let mut end = self.preview_end.unwrap_or(snapped);
        if constraints.ortho {
            end = apply_ortho(end, start);
        }
        self.commit(start, end)
    }

    /// Update the preview end from the pointer.
    pub fn pointer_move(&mut self, world: Point, entities: &[Entity], constraints: Constraints) {
        let Some(start) = self.pending_start else {
            return;
        };
        if self.is_typing() {
            return;
        }
        let mut end = snap_point(world, entities, constraints);
        if constraints.ortho {
            end = apply_ortho(end, start);
        }
        self.preview_end = Some(end);
    }

    /// Handle digit, Backspace, Enter and Escape.
    pub fn key_pressed(&mut self, key: &Key, constraints: Constraints) -> LineKeyOutcome {
        if !self.is_collecting() {
            return LineKeyOutcome::Ignored;
        }

        match key {
            Key::Digit(_) => {
                if let Some(c) = key.digit_char() {
                    self.typed_length.get_or_insert_with(String::new).push(c);
                }
                LineKeyOutcome::Updated
            }
            Key::Backspace => match self.typed_length.as_mut() {
                Some(buffer) => {
                    buffer.pop();
                    if buffer.is_empty() {
                        self.typed_length = None;
                    }
                    LineKeyOutcome::Updated
                }
                None => LineKeyOutcome::Ignored,
            },
            Key::Enter if self.is_typing() => self.commit_typed_length(constraints),
            Key::Escape => {
                log::debug!("Line cancelled");
                self.reset();
                LineKeyOutcome::Aborted
            }
            _ => LineKeyOutcome::Ignored,
        }
    }

    fn commit_typed_length(&mut self, constraints: Constraints) -> LineKeyOutcome {
        let buffer = self.typed_length.take().unwrap_or_default();
        let (Some(start), Some(preview)) = (self.pending_start, self.preview_end) else {
            log::debug!("Typed length {buffer:?} has no direction; line aborted");
            self.reset();
            return LineKeyOutcome::Aborted;
        };
        let length = match buffer.parse::<u64>() {
            Ok(length) if length > 0 => length as f64,
            _ => {
                log::debug!("Typed length {buffer:?} is not a positive integer; line aborted");
                self.reset();
                return LineKeyOutcome::Aborted;
            }
        };

        let end = typed_endpoint(start, preview, length, constraints.ortho);
        match self.commit(start, end) {
            Some(line) => LineKeyOutcome::Committed(line),
            None => LineKeyOutcome::Aborted,
        }
    }

    fn commit(&mut self, start: Point, end: Point) -> Option<Line> {
        if !is_valid_point(end) {
            log::debug!("Line end {end:?} is out of range; line aborted");
            self.reset();
            return None;
        }
        self.pending_start = Some(end);
        self.preview_end = None;
        self.typed_length = None;
        Some(Line::new(start, end))
    }
}

/// Endpoint `length` units from `start` toward `toward`, on an integer grid offset.
///
/// The delta is rounded, not the absolute coordinate, so an axis-aligned
/// direction stays axis-aligned from a fractional start.
fn typed_endpoint(start: Point, toward: Point, length: f64, ortho: bool) -> Point {
    let angle = (toward.y - start.y).atan2(toward.x - start.x);
    let delta = Vec2::new(
        (length * angle.cos()).round(),
        (length * angle.sin()).round(),
    );
    let end = start + delta;
    if ortho { apply_ortho(end, start) } else { end }
}

fn snap_point(world: Point, entities: &[Entity], constraints: Constraints) -> Point {
    if constraints.snap {
        snap_to_line_endpoints(world, entities, constraints.snap_threshold).point
    } else {
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FREE: Constraints = Constraints {
        snap: false,
        ortho: false,
        snap_threshold: 10.0,
    };

    fn type_digits(tool: &mut LineTool, digits: &str) {
        for c in digits.chars() {
            let d = c.to_digit(10).unwrap() as u8;
            tool.key_pressed(&Key::Digit(d), FREE);
        }
    }

    #[test]
    fn test_first_click_starts_line() {
        let mut tool = LineTool::new();
        assert!(tool.pointer_down(Point::new(1.0, 2.0), &[], FREE).is_none());
        assert_eq!(tool.pending_start, Some(Point::new(1.0, 2.0)));
        assert_eq!(tool.preview_end, Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_click_click_chains() {
        let mut tool = LineTool::new();
        tool.pointer_down(Point::new(0.0, 0.0), &[], FREE);
        tool.pointer_move(Point::new(10.0, 5.0), &[], FREE);
        let line = tool.pointer_down(Point::new(10.0, 5.0), &[], FREE).unwrap();
        assert_eq!(line.start, Point::new(0.0, 0.0));
        assert_eq!(line.end, Point::new(10.0, 5.0));
        assert_eq!(tool.pending_start, Some(Point::new(10.0, 5.0)));
        assert_eq!(tool.preview_end, None);

        // No preview since the commit: the click position is used.
        let line = tool.pointer_down(Point::new(20.0, 5.0), &[], FREE).unwrap();
        assert_eq!(line.start, Point::new(10.0, 5.0));
        assert_eq!(line.end, Point::new(20.0, 5.0));
    }

    #[test]
    fn test_ortho_preview_and_commit() {
        let ortho = Constraints { ortho: true, ..FREE };
        let mut tool = LineTool::new();
        tool.pointer_down(Point::new(0.0, 0.0), &[], ortho);
        tool.pointer_move(Point::new(30.0, 4.0), &[], ortho);
        assert_eq!(tool.preview_end, Some(Point::new(30.0, 0.0)));
        let line = tool.pointer_down(Point::new(30.0, 4.0), &[], ortho).unwrap();
        assert_eq!(line.end, Point::new(30.0, 0.0));
    }

    #[test]
    fn test_snap_on_start() {
        let snap = Constraints { snap: true, ..FREE };
        let entities = [Entity::Line(Line::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0)))];
        let mut tool = LineTool::new();
        tool.pointer_down(Point::new(100.4, 100.4), &entities, snap);
        assert_eq!(tool.pending_start, Some(Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_typed_length_exact() {
        let mut tool = LineTool::new();
        tool.pending_start = Some(Point::new(0.0, 0.0));
        tool.preview_end = Some(Point::new(10.0, 0.0));
        type_digits(&mut tool, "50");
        assert_eq!(tool.typed_length.as_deref(), Some("50"));

        let outcome = tool.key_pressed(&Key::Enter, FREE);
        let LineKeyOutcome::Committed(line) = outcome else {
            panic!("expected a committed line, got {outcome:?}");
        };
        assert_eq!(line.start, Point::new(0.0, 0.0));
        assert_eq!(line.end, Point::new(50.0, 0.0));
        assert_eq!(tool.pending_start, Some(Point::new(50.0, 0.0)));
        assert!(!tool.is_typing());
    }

    #[test]
    fn test_typed_length_rounds_delta() {
        let mut tool = LineTool::new();
        tool.pending_start = Some(Point::new(0.5, 0.25));
        tool.preview_end = Some(Point::new(3.5, 4.25));
        type_digits(&mut tool, "10");
        let LineKeyOutcome::Committed(line) = tool.key_pressed(&Key::Enter, FREE) else {
            panic!("expected a committed line");
        };
        assert_eq!(line.end, Point::new(6.5, 8.25));
    }

    #[test]
    fn test_typing_freezes_preview() {
        let mut tool = LineTool::new();
        tool.pointer_down(Point::ZERO, &[], FREE);
        tool.pointer_move(Point::new(0.0, 10.0), &[], FREE);
        type_digits(&mut tool, "7");
        tool.pointer_move(Point::new(10.0, 0.0), &[], FREE);
        assert_eq!(tool.preview_end, Some(Point::new(0.0, 10.0)));
    }

    #[test]
    fn test_backspace_exits_typing() {
        let mut tool = LineTool::new();
        tool.pointer_down(Point::ZERO, &[], FREE);
        type_digits(&mut tool, "12");
        tool.key_pressed(&Key::Backspace, FREE);
        assert_eq!(tool.typed_length.as_deref(), Some("1"));
        tool.key_pressed(&Key::Backspace, FREE);
        assert!(!tool.is_typing());
        assert!(tool.is_collecting());
    }

    #[test]
    fn test_zero_length_aborts() {
        let mut tool = LineTool::new();
        tool.pointer_down(Point::ZERO, &[], FREE);
        tool.pointer_move(Point::new(5.0, 0.0), &[], FREE);
        type_digits(&mut tool, "00");
        assert_eq!(tool.key_pressed(&Key::Enter, FREE), LineKeyOutcome::Aborted);
        assert_eq!(tool, LineTool::default());
    }

    #[test]
    fn test_typed_length_without_preview_aborts() {
        let mut tool = LineTool::new();
        tool.pointer_down(Point::ZERO, &[], FREE);
        tool.pointer_move(Point::new(5.0, 0.0), &[], FREE);
        tool.pointer_down(Point::new(5.0, 0.0), &[], FREE);
        type_digits(&mut tool, "3");
        assert_eq!(tool.key_pressed(&Key::Enter, FREE), LineKeyOutcome::Aborted);
        assert!(!tool.is_collecting());
    }

    #[test]
    fn test_out_of_range_typed_length_aborts() {
        let mut tool = LineTool::new();
        tool.pointer_down(Point::ZERO, &[], FREE);
        tool.pointer_move(Point::new(1.0, 0.0), &[], FREE);
        type_digits(&mut tool, "5000000000");
        assert_eq!(tool.key_pressed(&Key::Enter, FREE), LineKeyOutcome::Aborted);
        assert!(!tool.is_collecting());
    }

    #[test]
    fn test_escape_resets() {
        let mut tool = LineTool::new();
        tool.pointer_down(Point::ZERO, &[], FREE);
        type_digits(&mut tool, "4");
        assert_eq!(tool.key_pressed(&Key::Escape, FREE), LineKeyOutcome::Aborted);
        assert_eq!(tool, LineTool::default());
    }

    #[test]
    fn test_keys_ignored_when_idle() {
        let mut tool = LineTool::new();
        assert_eq!(tool.key_pressed(&Key::Digit(3), FREE), LineKeyOutcome::Ignored);
        assert_eq!(tool.key_pressed(&Key::Escape, FREE), LineKeyOutcome::Ignored);
        assert!(!tool.is_typing());
    }
}
