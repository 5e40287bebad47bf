//! What the widget needs from whatever draws it.
//!
//! The caret lives in the host's text box and the modifier keys in the host's
//! keyboard state; the widget only reads them at the moment a step happens.

use std::sync::{Arc, Mutex, PoisonError};

use crate::adjuster::Modifiers;

pub trait WidgetHost: Send + 'static {
    /// Caret position in chars from the start of the display text.
    fn caret_offset(&self) -> usize;

    /// Put the caret back after the display text has been replaced.
    fn set_caret_offset(&mut self, offset: usize);

    /// Write `offset` back unless the caret has left `expected` since the
    /// step read it. Hosts shared with an input loop should do the compare
    /// and the write under one lock.
    fn restore_caret(&mut self, expected: usize, offset: usize) {
        if self.caret_offset() == expected {
            self.set_caret_offset(offset);
        }
    }

    /// Modifier keys held right now.
    fn modifiers(&self) -> Modifiers;

    /// Key and wheel input is only acted on while the box has focus.
    fn has_focus(&self) -> bool {
        true
    }
}

/// A host with no UI behind it. Useful for scripting the widget and in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessHost {
    pub caret: usize,
    pub modifiers: Modifiers,
    pub focused: bool,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self {
            caret: 0,
            modifiers: Modifiers::default(),
            focused: true,
        }
    }
}

impl HeadlessHost {
    pub fn at_caret(caret: usize) -> Self {
        Self {
            caret,
            ..Self::default()
        }
    }
}

impl WidgetHost for HeadlessHost {
    fn caret_offset(&self) -> usize {
        self.caret
    }

    fn set_caret_offset(&mut self, offset: usize) {
        self.caret = offset;
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    fn has_focus(&self) -> bool {
        self.focused
    }
}

// Lets an input loop keep a handle on the same host the engine task owns.
impl<H: WidgetHost> WidgetHost for Arc<Mutex<H>> {
    fn caret_offset(&self) -> usize {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .caret_offset()
    }

    fn set_caret_offset(&mut self, offset: usize) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_caret_offset(offset);
    }

    fn restore_caret(&mut self, expected: usize, offset: usize) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .restore_caret(expected, offset);
    }

    fn modifiers(&self) -> Modifiers {
        self.lock().unwrap_or_else(PoisonError::into_inner).modifiers()
    }

    fn has_focus(&self) -> bool {
        self.lock().unwrap_or_else(PoisonError::into_inner).has_focus()
    }
}
