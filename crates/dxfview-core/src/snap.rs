//! Snap and orthogonal constraints for drawn points.

use crate::entity::Entity;
use kurbo::Point;

/// Default snap radius in screen pixels.
pub const SNAP_RADIUS_PX: f64 = 10.0;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Index of the line whose endpoint was taken, if any.
    pub target: Option<usize>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            target: None,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.target.is_some()
    }
}

/// Snap `candidate` onto the nearest `Line` endpoint within `threshold` (world units).
///
/// The endpoint is returned exactly. On equal distances the first endpoint in
/// entity order wins.
pub fn snap_to_line_endpoints(candidate: Point, entities: &[Entity], threshold: f64) -> SnapResult {
    let mut best: Option<(f64, Point, usize)> = None;

    for (index, entity) in entities.iter().enumerate() {
        let Some(line) = entity.as_line() else {
            continue;
        };
        for endpoint in [line.start, line.end] {
            let dist = candidate.distance(endpoint);
            if best.is_none_or(|(best_dist, _, _)| dist < best_dist) {
                best = Some((dist, endpoint, index));
            }
        }
    }

    match best {
        Some((dist, point, index)) if dist <= threshold => SnapResult {
            point,
            target: Some(index),
        },
        _ => SnapResult::none(candidate),
    }
}

/// Lock `candidate` to the dominant axis measured from `reference`.
///
/// Horizontal when `|dx| > |dy|`, vertical otherwise.
pub fn apply_ortho(candidate: Point, reference: Point) -> Point {
    let dx = candidate.x - reference.x;
    let dy = candidate.y - reference.y;
    if dx.abs() > dy.abs() {
        Point::new(candidate.x, reference.y)
    } else {
        Point::new(reference.x, candidate.y)
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
    fn test_snap_returns_exact_endpoint() {
        let entities = [line(0.0, 0.0, 100.0, 100.0)];
        let result = snap_to_line_endpoints(Point::new(100.4, 100.4), &entities, 1.0);
        assert!(result.is_snapped());
        assert_eq!(result.point, Point::new(100.0, 100.0));
        assert_eq!(result.target, Some(0));
    }

    #[test]
    fn test_snap_outside_threshold() {
        let entities = [line(0.0, 0.0, 100.0, 100.0)];
        let candidate = Point::new(103.0, 100.0);
        let result = snap_to_line_endpoints(candidate, &entities, 2.0);
        assert!(!result.is_snapped());
        assert_eq!(result.point, candidate);
    }

    #[test]
    fn test_snap_threshold_is_inclusive() {
        let entities = [line(0.0, 0.0, 10.0, 0.0)];
        let result = snap_to_line_endpoints(Point::new(12.0, 0.0), &entities, 2.0);
        assert_eq!(result.point, Point::new(10.0, 0.0));
    }

    #[test]
    fn test_snap_picks_nearest() {
        let entities = [line(0.0, 0.0, 10.0, 0.0), line(11.0, 0.0, 50.0, 0.0)];
        let result = snap_to_line_endpoints(Point::new(10.8, 0.0), &entities, 5.0);
        assert_eq!(result.point, Point::new(11.0, 0.0));
        assert_eq!(result.target, Some(1));
    }

    #[test]
    fn test_snap_tie_goes_to_first() {
        let entities = [line(-1.0, 0.0, -50.0, 0.0), line(1.0, 0.0, 50.0, 0.0)];
        let result = snap_to_line_endpoints(Point::ZERO, &entities, 5.0);
        assert_eq!(result.point, Point::new(-1.0, 0.0));
        assert_eq!(result.target, Some(0));
    }

    #[test]
    fn test_snap_ignores_other_entities() {
        let entities = [Entity::Circle(Circle {
            center: Point::new(1.0, 1.0),
            radius: 1.0,
            color: EntityColor::default(),
        })];
        assert!(!snap_to_line_endpoints(Point::new(1.0, 1.0), &entities, 5.0).is_snapped());
    }

    #[test]
    fn test_ortho_horizontal() {
        let p = apply_ortho(Point::new(10.0, 3.0), Point::new(0.0, 1.0));
        assert_eq!(p, Point::new(10.0, 1.0));
    }

    #[test]
    fn test_ortho_vertical() {
        let p = apply_ortho(Point::new(2.0, -30.0), Point::new(0.0, 0.0));
        assert_eq!(p, Point::new(0.0, -30.0));
    }

    #[test]
    fn test_ortho_diagonal_goes_vertical() {
        let p = apply_ortho(Point::new(5.0, 5.0), Point::new(0.0, 0.0));
        assert_eq!(p, Point::new(0.0, 5.0));
    }

    #[test]
    fn test_ortho_always_axis_aligned() {
        let reference = Point::new(3.5, -7.25);
        for (x, y) in [(1.0, 2.0), (-8.0, 0.5), (100.0, -99.0), (3.5, -7.25)] {
            let p = apply_ortho(Point::new(x, y), reference);
            assert!(p.x == reference.x || p.y == reference.y);
        }
    }
}
