//! Canonical, renderer-agnostic entity model.

use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Largest coordinate magnitude accepted anywhere in a scene.
pub const SAFE_LIMIT: f64 = 1e9;

/// Line thickness used when the source does not carry a lineweight.
pub const DEFAULT_THICKNESS_MM: f64 = 0.25;

/// Check that a point is finite and inside [`SAFE_LIMIT`] on both axes.
pub fn is_valid_point(point: Point) -> bool {
    point.x.is_finite()
        && point.y.is_finite()
        && point.x.abs() < SAFE_LIMIT
        && point.y.abs() < SAFE_LIMIT
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl EntityColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// Build from a packed 24-bit `0xRRGGBB` value.
    pub fn from_rgb24(value: u32) -> Self {
        Self::new(
            ((value >> 16) & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
            255,
        )
    }

    /// Map the seven standard AutoCAD Color Index entries.
    ///
    /// Index 7 is "white on dark, black on light"; the canvas is light, so it
    /// maps to black. Anything outside 1..=7 yields `None`.
    pub fn from_aci(index: i64) -> Option<Self> {
        let color = match index {
            1 => Self::new(255, 0, 0, 255),
            2 => Self::new(255, 255, 0, 255),
            3 => Self::new(0, 255, 0, 255),
            4 => Self::new(0, 255, 255, 255),
            5 => Self::new(0, 0, 255, 255),
            6 => Self::new(255, 0, 255, 255),
            7 => Self::black(),
            _ => return None,
        };
        Some(color)
    }
}

impl Default for EntityColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for EntityColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<EntityColor> for Color {
    fn from(color: EntityColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// A straight segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub color: EntityColor,
    pub thickness_mm: f64,
}

impl Line {
    /// Create a line with the default color and thickness.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            color: EntityColor::default(),
            thickness_mm: DEFAULT_THICKNESS_MM,
        }
    }

    /// Distance from `point` to the segment.
    pub fn distance_to(&self, point: Point) -> f64 {
        let line_vec = self.end - self.start;
        let point_vec = point - self.start;

        let line_len_sq = line_vec.hypot2();
        if line_len_sq < f64::EPSILON {
            return point_vec.hypot();
        }

        let t = (point_vec.dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
        let projection = self.start + line_vec * t;
        point.distance(projection)
    }

    /// Whether `point` lies within `tolerance` of the segment.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.distance_to(point) <= tolerance
    }

    pub fn as_kurbo(&self) -> kurbo::Line {
        kurbo::Line::new(self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
    pub color: EntityColor,
}

/// An open or closed sequence of straight segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub closed: bool,
    pub color: EntityColor,
}

/// Single-line text anchored at `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub position: Point,
    /// Rotation in degrees, counter-clockwise in world space.
    pub rotation: f64,
    pub text: String,
    pub color: EntityColor,
}

/// A placement of a named block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInsert {
    pub block_name: String,
    pub position: Point,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl BlockInsert {
    /// Block-local to world transform: translate, then rotate, then scale.
    pub fn transform(&self) -> kurbo::Affine {
        kurbo::Affine::translate(self.position.to_vec2())
            * kurbo::Affine::rotate(self.rotation.to_radians())
            * kurbo::Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }
}

/// A canonical drawing entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Entity {
    Line(Line),
    Circle(Circle),
    Polyline(Polyline),
    Text(Text),
    BlockInsert(BlockInsert),
}

impl Entity {
    /// Every coordinate this entity stores.
    pub fn points(&self) -> Vec<Point> {
        match self {
            Entity::Line(line) => vec![line.start, line.end],
            Entity::Circle(circle) => vec![circle.center],
            Entity::Polyline(polyline) => polyline.points.clone(),
            Entity::Text(text) => vec![text.position],
            Entity::BlockInsert(insert) => vec![insert.position],
        }
    }

    /// Whether every coordinate (and a circle's radius) is within range.
    pub fn is_valid(&self) -> bool {
        if let Entity::Circle(circle) = self {
            if !(circle.radius.is_finite() && circle.radius > 0.0 && circle.radius < SAFE_LIMIT) {
                return false;
            }
        }
        self.points().into_iter().all(is_valid_point)
    }

    /// Points that contribute to a fit-to-content bounding box.
    ///
    /// Text and block inserts contribute only their anchor.
    pub fn extent_points(&self) -> Vec<Point> {
        match self {
            Entity::Circle(circle) => {
                let r = Vec2::new(circle.radius, circle.radius);
                vec![circle.center - r, circle.center + r]
            }
            _ => self.points(),
        }
    }

    /// Move every coordinate by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Entity::Line(line) => {
                line.start += delta;
                line.end += delta;
            }
            Entity::Circle(circle) => circle.center += delta,
            Entity::Polyline(polyline) => {
                for point in &mut polyline.points {
                    *point += delta;
                }
            }
            Entity::Text(text) => text.position += delta,
            Entity::BlockInsert(insert) => insert.position += delta,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            Entity::Line(line) => Some(line),
            _ => None,
        }
    }
}

/// Axis-aligned box over the finite points of an iterator.
///
/// Only finiteness is checked: a valid circle's extent may reach past
/// [`SAFE_LIMIT`] and still has to be framed.
pub fn bounds_of(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    let mut result: Option<Rect> = None;
    for point in points
        .into_iter()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
    {
        result = Some(match result {
            Some(rect) => rect.union_pt(point),
            None => Rect::from_points(point, point),
        });
    }
    result
}

/// Block name to block-local geometry.
pub type BlockTable = BTreeMap<String, Vec<Entity>>;

/// The imported drawing plus everything drawn on top of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Identifier regenerated on every import.
    pub id: String,
    pub entities: Vec<Entity>,
    pub blocks: BlockTable,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::with_content(Vec::new(), BlockTable::new())
    }

    pub fn with_content(entities: Vec<Entity>, blocks: BlockTable) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            entities,
            blocks,
        }
    }

    /// Append an entity and return its index.
    pub fn push(&mut self, entity: Entity) -> usize {
        self.entities.push(entity);
        self.entities.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.get(index).and_then(Entity::as_line)
    }

    /// Lines paired with their entity index, in draw order.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &Line)> {
        self.entities
            .iter()
            .enumerate()
            .filter_map(|(index, entity)| entity.as_line().map(|line| (index, line)))
    }

    pub fn block(&self, name: &str) -> Option<&[Entity]> {
        self.blocks.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
