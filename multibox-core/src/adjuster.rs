//! Stepped value changes.
//!
//! One step: size the delta from the tick frequency and held modifiers, pick
//! the field under the caret, add, validate against the range, and write back
//! only if the value actually moved.

use crate::bounds::Range;
use crate::error::NumberBoxError;
use crate::{Field, StepKey, Triple, locator};

/// Multiplier for the fast modifier and divisor for the fine one.
pub const ACCELERATION: f64 = 10.0;

/// Modifier keys, sampled at the moment a step happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub fast: bool, // Shift: x10
    pub fine: bool, // Ctrl: /10
}

/// A step that changed a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub field: Field,
    pub old_value: f64,
    pub new_value: f64,
    /// Caret offset to put back once the display text has been refreshed.
    pub caret: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueAdjuster {
    tick_frequency: f64,
    range: Range,
}

impl Default for ValueAdjuster {
    fn default() -> Self {
        Self {
            tick_frequency: 1.0,
            range: Range::unbounded(),
        }
    }
}

impl ValueAdjuster {
    pub fn new(tick_frequency: f64, range: Range) -> Result<Self, NumberBoxError> {
        check_tick_frequency(tick_frequency)?;
        Ok(Self {
            tick_frequency,
            range,
        })
    }

    pub fn tick_frequency(&self) -> f64 {
        self.tick_frequency
    }

    pub fn set_tick_frequency(&mut self, tick_frequency: f64) -> Result<(), NumberBoxError> {
        check_tick_frequency(tick_frequency)?;
        self.tick_frequency = tick_frequency;
        Ok(())
    }

    pub fn range(&self) -> &Range {
        &self.range
    }

    pub fn range_mut(&mut self) -> &mut Range {
        &mut self.range
    }

    /// Fast is applied before fine, so holding both nets out to one tick.
    pub fn delta(&self, key: StepKey, modifiers: Modifiers) -> f64 {
        let mut delta = if key.is_increase() {
            self.tick_frequency
        } else {
            -self.tick_frequency
        };

        if modifiers.fast {
            delta *= ACCELERATION;
        }
        if modifiers.fine {
            delta /= ACCELERATION;
        }
        delta
    }

    /// Step the field under `caret` in `text`.
    ///
    /// Returns `None` when validation leaves the value where it was (pinned
    /// at a bound, or a non-finite field); nothing is written then.
    pub fn step(
        &self,
        values: &mut Triple,
        text: &str,
        caret: usize,
        key: StepKey,
        modifiers: Modifiers,
    ) -> Option<StepOutcome> {
        let delta = self.delta(key, modifiers);
        let field = locator::locate(text, caret);
        let old_value = values.get(field);
        let new_value = self.range.validate(old_value + delta);

        if new_value == old_value || new_value.is_nan() {
            return None;
        }

        values.set(field, new_value);
        Some(StepOutcome {
            field,
            old_value,
            new_value,
            caret,
        })
    }
}

fn check_tick_frequency(tick_frequency: f64) -> Result<(), NumberBoxError> {
    if tick_frequency.is_finite() && tick_frequency > 0.0 {
        Ok(())
    } else {
        Err(NumberBoxError::InvalidTickFrequency(tick_frequency))
    }
}
