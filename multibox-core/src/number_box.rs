//! The widget model.
//!
//! `NumberBox` owns the triple, the step settings and the repeat machine. It
//! is synchronous: every mutation appends its change notifications to a
//! caller-supplied `out` vector, and anything it needs from the UI (caret,
//! modifiers, focus) is read from a [`WidgetHost`] at the moment of use.
//!
//! Timing is not its concern. A `StartRepeat` dispatch hands the session to
//! whoever drives the cadence (normally [`crate::engine`]), which then calls
//! [`NumberBox::on_cadence`] once per interval.

use crate::adjuster::{StepOutcome, ValueAdjuster};
use crate::bounds::Range;
use crate::config::NumberBoxConfig;
use crate::display;
use crate::error::NumberBoxError;
use crate::host::WidgetHost;
use crate::state_machine::{KeyDownAction, RepeatController, RepeatSession, RepeatState};
use crate::{Field, InputEvent, PropertyChange, StepKey, Triple};

/// How the widget treated an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Not ours; the host should keep routing it.
    PassThrough,
    Handled,
    /// Handled, and a held key needs a cadence loop for this session.
    StartRepeat(RepeatSession),
}

impl Dispatch {
    pub fn is_handled(self) -> bool {
        !matches!(self, Dispatch::PassThrough)
    }
}

/// Point-in-time copy of everything observable on the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub values: Triple,
    pub tick_frequency: f64,
    pub range: Range,
    pub display: String,
    pub repeat: RepeatState,
}

#[derive(Debug, Default)]
pub struct NumberBox {
    values: Triple,
    adjuster: ValueAdjuster,
    repeat: RepeatController,
}

impl NumberBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &NumberBoxConfig) -> Result<Self, NumberBoxError> {
        Ok(Self {
            values: config.initial,
            adjuster: config.adjuster()?,
            repeat: RepeatController::new(),
        })
    }

    // ────────────────────────────────────────────────────────────────
    // Properties
    // ────────────────────────────────────────────────────────────────

    pub fn values(&self) -> Triple {
        self.values
    }

    pub fn value(&self, field: Field) -> f64 {
        self.values.get(field)
    }

    pub fn tick_frequency(&self) -> f64 {
        self.adjuster.tick_frequency()
    }

    pub fn range(&self) -> &Range {
        self.adjuster.range()
    }

    pub fn minimum(&self) -> f64 {
        self.range().minimum()
    }

    pub fn maximum(&self) -> f64 {
        self.range().maximum()
    }

    pub fn wrap(&self) -> bool {
        self.range().wrap()
    }

    pub fn repeat_state(&self) -> RepeatState {
        self.repeat.state()
    }

    /// Derived on every read, never cached.
    pub fn display(&self) -> String {
        display::format(&self.values)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            values: self.values,
            tick_frequency: self.tick_frequency(),
            range: *self.range(),
            display: self.display(),
            repeat: self.repeat_state(),
        }
    }

    /// Direct write. Not checked against the range; only stepping validates.
    /// Returns whether the value changed.
    pub fn set_value(&mut self, field: Field, value: f64, out: &mut Vec<PropertyChange>) -> bool {
        if same_value(self.values.get(field), value) {
            return false;
        }
        self.values.set(field, value);
        self.notify_field(field, out);
        true
    }

    /// Parse an edited display text into the fields.
    ///
    /// Returns `false` when the text does not have exactly three parts and
    /// nothing was touched. Otherwise every part that parses is written on its
    /// own; parts that don't parse keep their old value.
    pub fn set_display(&mut self, text: &str, out: &mut Vec<PropertyChange>) -> bool {
        let Some(edit) = display::parse(text) else {
            tracing::debug!(text, "display edit rejected: expected three fields");
            return false;
        };

        for (field, value) in edit.updates() {
            self.set_value(field, value, out);
        }
        true
    }

    pub fn set_tick_frequency(
        &mut self,
        tick_frequency: f64,
        out: &mut Vec<PropertyChange>,
    ) -> Result<(), NumberBoxError> {
        if tick_frequency == self.tick_frequency() {
            return Ok(());
        }
        self.adjuster.set_tick_frequency(tick_frequency)?;
        out.push(PropertyChange::TickFrequency(tick_frequency));
        Ok(())
    }

    pub fn set_minimum(
        &mut self,
        minimum: f64,
        out: &mut Vec<PropertyChange>,
    ) -> Result<(), NumberBoxError> {
        if minimum == self.minimum() {
            return Ok(());
        }
        self.adjuster.range_mut().set_minimum(minimum)?;
        out.push(PropertyChange::Minimum(minimum));
        Ok(())
    }

    pub fn set_maximum(
        &mut self,
        maximum: f64,
        out: &mut Vec<PropertyChange>,
    ) -> Result<(), NumberBoxError> {
        if maximum == self.maximum() {
            return Ok(());
        }
        self.adjuster.range_mut().set_maximum(maximum)?;
        out.push(PropertyChange::Maximum(maximum));
        Ok(())
    }

    /// Replace both bounds at once, so a move past the old opposite bound
    /// does not trip the inverted-range check halfway through.
    pub fn set_range(
        &mut self,
        minimum: f64,
        maximum: f64,
        out: &mut Vec<PropertyChange>,
    ) -> Result<(), NumberBoxError> {
        let old = *self.range();
        let range = Range::new(minimum, maximum, old.wrap())?;
        *self.adjuster.range_mut() = range;

        if old.minimum() != minimum {
            out.push(PropertyChange::Minimum(minimum));
        }
        if old.maximum() != maximum {
            out.push(PropertyChange::Maximum(maximum));
        }
        Ok(())
    }

    pub fn set_wrap(&mut self, wrap: bool, out: &mut Vec<PropertyChange>) {
        if wrap == self.wrap() {
            return;
        }
        self.adjuster.range_mut().set_wrap(wrap);
        out.push(PropertyChange::Wrap(wrap));
    }

    // ────────────────────────────────────────────────────────────────
    // Input
    // ────────────────────────────────────────────────────────────────

    pub fn handle(
        &mut self,
        event: InputEvent,
        host: &mut dyn WidgetHost,
        out: &mut Vec<PropertyChange>,
    ) -> Dispatch {
        match event {
            InputEvent::KeyDown { key, repeat } => {
                if !host.has_focus() {
                    return Dispatch::PassThrough;
                }
                match self.repeat.on_key_down(key, repeat) {
                    KeyDownAction::StepOnce(key) => {
                        self.step(key, host, out);
                        Dispatch::Handled
                    }
                    KeyDownAction::StartSession(session) => Dispatch::StartRepeat(session),
                    KeyDownAction::Ignored => Dispatch::Handled,
                }
            }
            InputEvent::KeyUp { key } => match self.repeat.on_key_up(key) {
                Some(_) => Dispatch::Handled,
                None => Dispatch::PassThrough,
            },
            InputEvent::Wheel { delta } => {
                if delta == 0 || !host.has_focus() {
                    return Dispatch::PassThrough;
                }
                let key = if delta > 0 {
                    StepKey::Increase
                } else {
                    StepKey::Decrease
                };
                self.step(key, host, out);
                Dispatch::Handled
            }
            InputEvent::FocusLost => {
                self.repeat.cancel();
                Dispatch::PassThrough
            }
        }
    }

    /// One tick of a held key. Does nothing once `session` is no longer live.
    pub fn on_cadence(
        &mut self,
        session: RepeatSession,
        host: &mut dyn WidgetHost,
        out: &mut Vec<PropertyChange>,
    ) -> Option<StepOutcome> {
        if !self.repeat.is_live(session) {
            return None;
        }
        self.step(session.key, host, out)
    }

    /// Step the field under the host's caret and put the caret back.
    pub fn step(
        &mut self,
        key: StepKey,
        host: &mut dyn WidgetHost,
        out: &mut Vec<PropertyChange>,
    ) -> Option<StepOutcome> {
        let caret = host.caret_offset();
        let modifiers = host.modifiers();
        let text = self.display();

        let outcome = self
            .adjuster
            .step(&mut self.values, &text, caret, key, modifiers)?;

        tracing::debug!(
            field = ?outcome.field,
            old = outcome.old_value,
            new = outcome.new_value,
            "stepped"
        );

        self.notify_field(outcome.field, out);
        // Refreshing the text may have moved the caret. A move the user made
        // while we were stepping wins.
        host.restore_caret(caret, outcome.caret);
        Some(outcome)
    }

    fn notify_field(&self, field: Field, out: &mut Vec<PropertyChange>) {
        out.push(PropertyChange::for_field(field, self.values.get(field)));
        out.push(PropertyChange::Display(self.display()));
    }
}

fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}
