//! Positioned text tokens and the column-alignment predicate.
//!
//! A result page carries no table markup. Every cell arrives as an
//! independently positioned text fragment, and column membership is decided
//! purely by comparing x-coordinates within a fixed tolerance.

use serde::{Deserialize, Serialize};

/// Column-alignment tolerance in document-coordinate units.
pub const PRECISION: f32 = 0.001;

/// A positioned text fragment from one page of a result document.
///
/// Produced by the decoder with pre-trimmed text; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

impl Token {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }

    pub fn coords(&self) -> Coords {
        Coords {
            x: self.x,
            y: self.y,
        }
    }
}

/// Position of a cell, kept around so later tokens can be matched against
/// its column.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coords {
    pub x: f32,
    pub y: f32,
}

/// Whether two positions sit in the same column, within [`PRECISION`].
pub fn x_aligned(a: Coords, b: Coords) -> bool {
    (a.x - b.x).abs() <= PRECISION
}
