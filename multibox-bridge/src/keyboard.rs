//! Terminal input translation.
//!
//! Up/Down become step keys and reach the widget; everything the widget does
//! not care about (caret movement, typing, quit) stays with the bridge.
//! Shift is the fast modifier, Ctrl the fine one.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use multibox_core::adjuster::Modifiers;
use multibox_core::{InputEvent, StepKey};

/// Wheel delta for one notch, as most platforms report it.
pub const WHEEL_NOTCH: i32 = 120;

/// What the bridge should do with a terminal event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Widget(InputEvent),
    CaretLeft,
    CaretRight,
    CaretHome,
    CaretEnd,
    Insert(char),
    Backspace,
    Commit,
    FocusGained,
    Quit,
}

pub fn modifiers_of(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        fast: mods.contains(KeyModifiers::SHIFT),
        fine: mods.contains(KeyModifiers::CONTROL),
    }
}

/// Modifier state carried by a key or mouse event. Terminals have no
/// "is Shift down" query, so the last event seen is the best answer.
pub fn event_modifiers(event: &Event) -> Option<Modifiers> {
    match event {
        Event::Key(key) => Some(modifiers_of(key.modifiers)),
        Event::Mouse(mouse) => Some(modifiers_of(mouse.modifiers)),
        _ => None,
    }
}

pub fn translate(event: &Event) -> Option<Action> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::FocusLost => Some(Action::Widget(InputEvent::FocusLost)),
        Event::FocusGained => Some(Action::FocusGained),
        _ => None,
    }
}

fn step_key(code: KeyCode) -> Option<StepKey> {
    match code {
        KeyCode::Up => Some(StepKey::Increase),
        KeyCode::Down => Some(StepKey::Decrease),
        _ => None,
    }
}

fn translate_key(key: &KeyEvent) -> Option<Action> {
    // ── Step keys: every event kind matters ──
    if let Some(step) = step_key(key.code) {
        let event = match key.kind {
            KeyEventKind::Press => InputEvent::KeyDown {
                key: step,
                repeat: false,
            },
            KeyEventKind::Repeat => InputEvent::KeyDown {
                key: step,
                repeat: true,
            },
            KeyEventKind::Release => InputEvent::KeyUp { key: step },
        };
        return Some(Action::Widget(event));
    }

    // ── Everything else acts on press only ──
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Left => Some(Action::CaretLeft),
        KeyCode::Right => Some(Action::CaretRight),
        KeyCode::Home => Some(Action::CaretHome),
        KeyCode::End => Some(Action::CaretEnd),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Enter => Some(Action::Commit),
        KeyCode::Char(c) => Some(Action::Insert(c)),
        _ => None,
    }
}

fn translate_mouse(mouse: &MouseEvent) -> Option<Action> {
    let delta = match mouse.kind {
        MouseEventKind::ScrollUp => WHEEL_NOTCH,
        MouseEventKind::ScrollDown => -WHEEL_NOTCH,
        _ => return None,
    };
    Some(Action::Widget(InputEvent::Wheel { delta }))
}
