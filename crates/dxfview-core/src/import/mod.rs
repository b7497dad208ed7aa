//! Conversion of raw parser output into a canonical [`Scene`].
//!
//! Each raw record is dispatched on its declared kind. Records that are
//! incomplete or carry out-of-range coordinates are dropped one by one with a
//! [`Diagnostic`]; only a parser failure rejects the whole import.

mod formatting;
mod raw;

pub use formatting::strip_formatting;
pub use raw::{DrawingParser, JsonDrawingParser, ParseError, RawBlock, RawDrawing, RawEntity};

use crate::entity::{
    BlockInsert, BlockTable, Circle, DEFAULT_THICKNESS_MM, Entity, EntityColor, Line, Polyline,
    Scene, Text,
};
use kurbo::{Point, Vec2};
use std::fmt;
use thiserror::Error;

/// Import failures that abort the whole operation.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to parse drawing: {0}")]
    Parse(#[from] ParseError),
}

/// Why a single record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DropReason {
    #[error("missing endpoint")]
    MissingEndpoint,
    #[error("missing center")]
    MissingCenter,
    #[error("radius must be positive")]
    NonPositiveRadius,
    #[error("fewer than two vertices")]
    TooFewVertices,
    #[error("missing position")]
    MissingPosition,
    #[error("text is empty after formatting removal")]
    EmptyText,
    #[error("missing block name")]
    MissingBlockName,
    #[error("coordinate is not finite or out of range")]
    InvalidCoordinate,
}

/// A dropped record and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Position of the record in its source list.
    pub index: usize,
    /// Owning block, `None` for top-level entities.
    pub block: Option<String>,
    /// Declared kind of the record.
    pub kind: String,
    pub reason: DropReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.block {
            Some(block) => write!(
                f,
                "{} #{} in block '{}' dropped: {}",
                self.kind, self.index, block, self.reason
            ),
            None => write!(f, "{} #{} dropped: {}", self.kind, self.index, self.reason),
        }
    }
}

/// Bookkeeping for one import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub diagnostics: Vec<Diagnostic>,
    /// Top-level records of a supported kind.
    pub supported: usize,
    /// Top-level records of a supported kind that were dropped.
    pub dropped: usize,
    /// Top-level records of an unsupported kind.
    pub ignored: usize,
    /// Block body records that were dropped.
    pub block_dropped: usize,
}

/// A normalized drawing and its report.
#[derive(Debug, Clone)]
pub struct Import {
    pub scene: Scene,
    pub report: ImportReport,
}

impl Import {
    /// True when the document parsed but yielded no usable entity.
    pub fn is_empty(&self) -> bool {
        self.scene.is_empty()
    }
}

/// Parse `text` with `parser` and normalize the result.
pub fn import_drawing(text: &str, parser: &dyn DrawingParser) -> Result<Import, ImportError> {
    let raw = parser.parse(text)?;
    let import = normalize(&raw);
    log::info!(
        "Imported {} entities and {} blocks ({} dropped, {} ignored)",
        import.scene.len(),
        import.scene.blocks.len(),
        import.report.dropped,
        import.report.ignored
    );
    Ok(import)
}

/// Normalize a raw drawing. Never fails; bad records are reported.
pub fn normalize(raw: &RawDrawing) -> Import {
    let mut report = ImportReport::default();

    let mut entities = Vec::with_capacity(raw.entities.len());
    for (index, record) in raw.entities.iter().enumerate() {
        match convert(record) {
            Converted::Entity(entity) => {
                report.supported += 1;
                entities.push(entity);
            }
            Converted::Dropped(reason) => {
                report.supported += 1;
                report.dropped += 1;
                report.push(index, None, record, reason);
            }
            Converted::Unsupported => report.ignored += 1,
        }
    }

    let mut blocks = BlockTable::new();
    for (name, block) in &raw.blocks {
        let shift = block.base_point.map(|p| -p.to_vec2()).unwrap_or(Vec2::ZERO);
        let mut body = Vec::with_capacity(block.entities.len());
        for (index, record) in block.entities.iter().enumerate() {
            match convert(record) {
                Converted::Entity(mut entity) => {
                    entity.translate(shift);
                    if entity.is_valid() {
                        body.push(entity);
                    } else {
                        report.block_dropped += 1;
                        report.push(index, Some(name.as_str()), record, DropReason::InvalidCoordinate);
                    }
                }
                Converted::Dropped(reason) => {
                    report.block_dropped += 1;
                    report.push(index, Some(name.as_str()), record, reason);
                }
                Converted::Unsupported => {}
            }
        }
        blocks.insert(name.clone(), body);
    }

    Import {
        scene: Scene::with_content(entities, blocks),
        report,
    }
}

impl ImportReport {
    fn push(&mut self, index: usize, block: Option<&str>, record: &RawEntity, reason: DropReason) {
        let diagnostic = Diagnostic {
            index,
            block: block.map(str::to_string),
            kind: record.kind().unwrap_or("?").to_string(),
            reason,
        };
        log::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

enum Converted {
    Entity(Entity),
    Dropped(DropReason),
    Unsupported,
}

fn convert(record: &RawEntity) -> Converted {
    let result = match record.kind() {
        Some("LINE") => convert_line(record),
        Some("CIRCLE") => convert_circle(record),
        Some("LWPOLYLINE" | "POLYLINE") => convert_polyline(record),
        Some("TEXT" | "MTEXT") => convert_text(record),
        Some("INSERT") => convert_insert(record),
        _ => return Converted::Unsupported,
    };
    match result {
        Ok(entity) if entity.is_valid() => Converted::Entity(entity),
        Ok(_) => Converted::Dropped(DropReason::InvalidCoordinate),
        Err(reason) => Converted::Dropped(reason),
    }
}

// Converters resolve index 7 to white; the canvas is light, so white is drawn black.
fn color_of(record: &RawEntity) -> EntityColor {
    if let Some(color) = record.integer("colorIndex").and_then(EntityColor::from_aci) {
        return color;
    }
    match record.integer("color").filter(|v| (0..0xFF_FFFF).contains(v)) {
        Some(rgb) => EntityColor::from_rgb24(rgb as u32),
        None => EntityColor::default(),
    }
}

fn convert_line(record: &RawEntity) -> Result<Entity, DropReason> {
    let (start, end) = match record.vertices() {
        Some(vertices) if vertices.len() >= 2 => (vertices[0], vertices[1]),
        _ => (record.point("start"), record.point("end")),
    };
    let (Some(start), Some(end)) = (start, end) else {
        return Err(DropReason::MissingEndpoint);
    };

    // Lineweight is stored in hundredths of a millimeter; negatives mean "by layer".
    let thickness_mm = record
        .number("lineweight")
        .filter(|w| w.is_finite() && *w > 0.0)
        .map(|w| w / 100.0)
        .unwrap_or(DEFAULT_THICKNESS_MM);

    Ok(Entity::Line(Line {
        start,
        end,
        color: color_of(record),
        thickness_mm,
    }))
}

fn convert_circle(record: &RawEntity) -> Result<Entity, DropReason> {
    let center = record.point("center").ok_or(DropReason::MissingCenter)?;
    let radius = record
        .number("radius")
        .filter(|r| *r > 0.0)
        .ok_or(DropReason::NonPositiveRadius)?;
    Ok(Entity::Circle(Circle {
        center,
        radius,
        color: color_of(record),
    }))
}

fn convert_polyline(record: &RawEntity) -> Result<Entity, DropReason> {
    let points: Vec<Point> = record
        .vertices()
        .unwrap_or_default()
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or(DropReason::InvalidCoordinate)?;
    if points.len() < 2 {
        return Err(DropReason::TooFewVertices);
    }
    let closed = record
        .flag("shape")
        .or_else(|| record.flag("closed"))
        .unwrap_or(false);
    Ok(Entity::Polyline(Polyline {
        points,
        closed,
        color: color_of(record),
    }))
}

fn convert_text(record: &RawEntity) -> Result<Entity, DropReason> {
    let position = record
        .point("position")
        .or_else(|| record.point("startPoint"))
        .or_else(|| record.flat_point())
        .ok_or(DropReason::MissingPosition)?;
    let text = strip_formatting(record.string("text").unwrap_or_default());
    if text.is_empty() {
        return Err(DropReason::EmptyText);
    }
    Ok(Entity::Text(Text {
        position,
        rotation: record.number("rotation").unwrap_or(0.0),
        text,
        color: color_of(record),
    }))
}

fn convert_insert(record: &RawEntity) -> Result<Entity, DropReason> {
    let block_name = record
        .string("name")
        .filter(|n| !n.is_empty())
        .ok_or(DropReason::MissingBlockName)?;
    let position = record
        .point("position")
        .ok_or(DropReason::MissingPosition)?;
    let finite_or = |value: Option<f64>, default: f64| value.filter(|v| v.is_finite()).unwrap_or(default);
    Ok(Entity::BlockInsert(BlockInsert {
        block_name: block_name.to_string(),
        position,
        scale_x: finite_or(record.number("xScale"), 1.0),
        scale_y: finite_or(record.number("yScale"), 1.0),
        rotation: finite_or(record.number("rotation"), 0.0),
    }))
}
