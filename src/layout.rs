//! Layout files: the 3D positions of every addressable pixel.
//!
//! A layout is a JSON array of records. Records carrying a `"point"` field
//! with three numbers become pixels, in file order; anything else is ignored.
//!
//! ```json
//! [
//!     {"point": [0.0, 0.0, 0.0]},
//!     {"point": [0.1, 0.0, 0.0]}
//! ]
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Position of a single pixel.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "[f64; 3]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Point {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Ordered pixel positions. Index `i` here is pixel `i` on the wire.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    points: Vec<Point>,
}

impl Layout {
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Read and parse a layout file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| Error::Layout {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse layout text that did not come from a file.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(Self::parse(text)?)
    }

    fn parse(text: &str) -> std::result::Result<Self, serde_json::Error> {
        let records: Vec<Value> = serde_json::from_str(text)?;
        let mut points = Vec::with_capacity(records.len());

        for (i, record) in records.into_iter().enumerate() {
            let Some(field) = record.get("point") else {
                continue;
            };
            match Point::deserialize(field) {
                Ok(point) => points.push(point),
                Err(e) => tracing::warn!("Skipping layout record {}: bad point {}: {}", i, field, e),
            }
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
