//! Loosely typed parser output and the parser seam.

use kurbo::Point;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by a document parser. Any of these fails the whole import.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed document: {0}")]
    Structure(String),
}

/// One raw entity record, as heterogeneous as the parser emitted it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawEntity(pub Value);

impl RawEntity {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Declared entity kind (`LINE`, `CIRCLE`, ...).
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(Value::as_f64)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(Value::as_i64)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Truthy flag: booleans, or non-zero integers (DXF bit flags).
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.field(name)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|v| v & 1 == 1),
            _ => None,
        }
    }

    /// A point stored as `{ "x": .., "y": .. }` under `name`.
    pub fn point(&self, name: &str) -> Option<Point> {
        self.field(name).and_then(point_from_value)
    }

    /// A point stored as flat `x` / `y` fields on the record itself.
    pub fn flat_point(&self) -> Option<Point> {
        point_from_value(&self.0)
    }

    /// The `vertices` array; entries that are not points are `None`.
    pub fn vertices(&self) -> Option<Vec<Option<Point>>> {
        self.field("vertices")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(point_from_value).collect())
    }
}

fn point_from_value(value: &Value) -> Option<Point> {
    match value {
        Value::Object(map) => {
            let x = map.get("x").and_then(Value::as_f64)?;
            let y = map.get("y").and_then(Value::as_f64)?;
            Some(Point::new(x, y))
        }
        Value::Array(items) if items.len() >= 2 => {
            let x = items[0].as_f64()?;
            let y = items[1].as_f64()?;
            Some(Point::new(x, y))
        }
        _ => None,
    }
}

/// A raw block definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBlock {
    pub entities: Vec<RawEntity>,
    /// Insertion base point; block bodies are shifted so it becomes the origin.
    pub base_point: Option<Point>,
}

/// Everything a parser hands to the normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDrawing {
    pub entities: Vec<RawEntity>,
    pub blocks: BTreeMap<String, RawBlock>,
}

/// Turns document text into raw entity records.
pub trait DrawingParser {
    fn parse(&self, text: &str) -> Result<RawDrawing, ParseError>;
}

/// Reads the JSON object shape produced by DXF-to-JSON converters:
/// `{"entities": [...], "blocks": {"NAME": {"entities": [...], "position": {..}}}}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDrawingParser;

#[derive(Deserialize)]
struct JsonDocument {
    #[serde(default)]
    entities: Vec<RawEntity>,
    #[serde(default)]
    blocks: BTreeMap<String, JsonBlock>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonBlock {
    Body {
        #[serde(default)]
        entities: Vec<RawEntity>,
        #[serde(default)]
        position: Option<Value>,
    },
    Entities(Vec<RawEntity>),
}

impl DrawingParser for JsonDrawingParser {
    fn parse(&self, text: &str) -> Result<RawDrawing, ParseError> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(ParseError::Structure(
                "expected a top-level object".to_string(),
            ));
        }
        let document: JsonDocument = serde_json::from_value(value)?;

        let blocks = document
            .blocks
            .into_iter()
            .map(|(name, block)| {
                let raw = match block {
                    JsonBlock::Body { entities, position } => RawBlock {
                        entities,
                        base_point: position.as_ref().and_then(point_from_value),
                    },
                    JsonBlock::Entities(entities) => RawBlock {
                        entities,
                        base_point: None,
                    },
                };
                (name, raw)
            })
            .collect();

        Ok(RawDrawing {
            entities: document.entities,
            blocks,
        })
    }
}
