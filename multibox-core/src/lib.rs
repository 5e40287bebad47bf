pub mod adjuster;
pub mod bounds;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod host;
pub mod locator;
pub mod number_box;
pub mod state_machine;

// Re-export the main structs so users can just use `multibox_core::NumberBoxEngine`
pub use engine::NumberBoxEngine;
pub use number_box::{Dispatch, NumberBox, Snapshot};

// Re-export the simpler types for hosts
pub use adjuster::{Modifiers, StepOutcome, ValueAdjuster};
pub use bounds::Range;
pub use config::NumberBoxConfig;
pub use error::{ConfigError, NumberBoxError};
pub use host::{HeadlessHost, WidgetHost};
pub use state_machine::{RepeatController, RepeatSession, RepeatState};

use serde::{Deserialize, Serialize};

/// The three numeric fields edited together as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Triple {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Triple {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::X => self.x,
            Field::Y => self.y,
            Field::Z => self.z,
        }
    }

    pub fn set(&mut self, field: Field, value: f64) {
        match field {
            Field::X => self.x = value,
            Field::Y => self.y = value,
            Field::Z => self.z = value,
        }
    }
}

/// Which of the three fields an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    X,
    Y,
    Z,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::X, Field::Y, Field::Z];

    pub fn index(self) -> usize {
        match self {
            Field::X => 0,
            Field::Y => 1,
            Field::Z => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Field> {
        Self::ALL.get(index).copied()
    }
}

/// The two keys that step a field. Everything else passes through the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKey {
    Increase, // Arrow up
    Decrease, // Arrow down
}

impl StepKey {
    pub fn is_increase(self) -> bool {
        matches!(self, StepKey::Increase)
    }
}

/// The input stream from the host. The host translates its own key and mouse
/// events into these before handing them to the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown { key: StepKey, repeat: bool },
    KeyUp { key: StepKey },
    Wheel { delta: i32 }, // Only the sign matters
    FocusLost,
}

/// Change notifications. The host binding layer listens to these.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyChange {
    X(f64),
    Y(f64),
    Z(f64),
    TickFrequency(f64),
    Minimum(f64),
    Maximum(f64),
    Wrap(bool),
    Display(String), // Recomputed text after any field change
}

impl PropertyChange {
    pub fn for_field(field: Field, value: f64) -> Self {
        match field {
            Field::X => PropertyChange::X(value),
            Field::Y => PropertyChange::Y(value),
            Field::Z => PropertyChange::Z(value),
        }
    }
}
