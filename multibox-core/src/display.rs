//! Text form of the triple.
//!
//! The box shows `"x, y, z"` with every component rounded to three decimals.
//! Rounding is for display only; the stored values keep full precision.
//! Editing the text parses it back field by field.

use crate::{Field, Triple};

/// Character separating the three fields in the display text.
pub const SEPARATOR: char = ',';

/// Decimal digits shown per field.
pub const DISPLAY_DECIMALS: i32 = 3;

// Above this magnitude an f64 has no thousandths left to round.
const ROUNDING_LIMIT: f64 = 1e15;

/// Round to [`DISPLAY_DECIMALS`] places, ties to even.
pub fn round_for_display(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= ROUNDING_LIMIT {
        return value;
    }

    let scale = 10f64.powi(DISPLAY_DECIMALS);
    // `+ 0.0` folds -0 into 0 so the box never shows "-0"
    (value * scale).round_ties_even() / scale + 0.0
}

pub fn format(triple: &Triple) -> String {
    format!(
        "{}, {}, {}",
        round_for_display(triple.x),
        round_for_display(triple.y),
        round_for_display(triple.z)
    )
}

/// A parsed edit. `None` marks a part that did not parse and leaves its field alone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayEdit {
    parts: [Option<f64>; 3],
}

impl DisplayEdit {
    pub fn get(&self, field: Field) -> Option<f64> {
        self.parts[field.index()]
    }

    /// Fields with a usable value, in X, Y, Z order.
    pub fn updates(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|value| (field, value)))
    }
}

/// Split on [`SEPARATOR`] and parse each part.
///
/// Returns `None` unless the text has exactly three parts; the whole edit is
/// rejected in that case.
pub fn parse(text: &str) -> Option<DisplayEdit> {
    let pieces: Vec<&str> = text.split(SEPARATOR).collect();
    if pieces.len() != 3 {
        return None;
    }

    let mut edit = DisplayEdit::default();
    for (slot, piece) in edit.parts.iter_mut().zip(pieces) {
        *slot = parse_component(piece);
    }
    Some(edit)
}

fn parse_component(piece: &str) -> Option<f64> {
    piece
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
