//! The terminal side of the widget: caret, modifiers and focus.
//!
//! The input loop writes here, the engine task reads here. Both sides hold
//! the same `Arc<Mutex<..>>`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use multibox_core::WidgetHost;
use multibox_core::adjuster::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostState {
    pub caret: usize,
    pub modifiers: Modifiers,
    pub focused: bool,
}

impl Default for HostState {
    fn default() -> Self {
        Self {
            caret: 0,
            modifiers: Modifiers::default(),
            focused: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TerminalHost {
    inner: Arc<Mutex<HostState>>,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> HostState {
        *self.state()
    }

    pub fn caret(&self) -> usize {
        self.state().caret
    }

    /// Move the caret by `delta` chars, kept within `0..=len`.
    pub fn move_caret(&self, delta: isize, len: usize) {
        let mut state = self.state();
        state.caret = state.caret.saturating_add_signed(delta).min(len);
    }

    pub fn place_caret(&self, offset: usize, len: usize) {
        self.state().caret = offset.min(len);
    }

    pub fn set_modifiers(&self, modifiers: Modifiers) {
        self.state().modifiers = modifiers;
    }

    pub fn set_focused(&self, focused: bool) {
        self.state().focused = focused;
    }
}

impl WidgetHost for TerminalHost {
    fn caret_offset(&self) -> usize {
        self.state().caret
    }

    fn set_caret_offset(&mut self, offset: usize) {
        self.state().caret = offset;
    }

    fn restore_caret(&mut self, expected: usize, offset: usize) {
        let mut state = self.state();
        if state.caret == expected {
            state.caret = offset;
        }
    }

    fn modifiers(&self) -> Modifiers {
        self.state().modifiers
    }

    fn has_focus(&self) -> bool {
        self.state().focused
    }
}
