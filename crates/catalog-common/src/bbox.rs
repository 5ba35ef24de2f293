//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in `[west, south, east, north]` order.
///
/// Serializes as a four-element JSON array, the layout catalog `bbox`
/// fields and spatial extents use. Deserializes from either that array or
/// a `"minx,miny,maxx,maxy"` string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 4]", try_from = "BboxRepr")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Whole-world box used when no `Bbox` is configured.
pub const GLOBAL: BoundingBox = BoundingBox {
    min_x: -180.0,
    min_y: -90.0,
    max_x: 180.0,
    max_y: 90.0,
};

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Build from a `[minx, miny, maxx, maxy]` slice.
    pub fn from_slice(values: &[f64]) -> Result<Self, BboxParseError> {
        match values {
            [min_x, min_y, max_x, max_y] => {
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(BboxParseError::InvalidNumber(format!("{:?}", values)));
                }
                Ok(Self::new(*min_x, *min_y, *max_x, *max_y))
            }
            _ => Err(BboxParseError::WrongLength(values.len())),
        }
    }

    /// Parse a comma separated string: "minx,miny,maxx,maxy"
    pub fn from_wms_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))?;
        }
        Self::from_slice(&values)
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Closed exterior ring: SW, SE, NE, NW, back to SW.
    pub fn ring(&self) -> Vec<[f64; 2]> {
        vec![
            [self.min_x, self.min_y],
            [self.max_x, self.min_y],
            [self.max_x, self.max_y],
            [self.min_x, self.max_y],
            [self.min_x, self.min_y],
        ]
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        GLOBAL
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_array()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BboxRepr {
    Values(Vec<f64>),
    Text(String),
}

impl TryFrom<BboxRepr> for BoundingBox {
    type Error = BboxParseError;

    fn try_from(repr: BboxRepr) -> Result<Self, Self::Error> {
        match repr {
            BboxRepr::Values(values) => Self::from_slice(&values),
            BboxRepr::Text(text) => Self::from_wms_string(&text),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid BBOX format: {0}. Expected 'minx,miny,maxx,maxy'")]
    InvalidFormat(String),

    #[error("Invalid number in BBOX: {0}")]
    InvalidNumber(String),

    #[error("BBOX needs 4 values, got {0}")]
    WrongLength(usize),
}
