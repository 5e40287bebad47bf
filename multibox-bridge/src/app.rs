//! Application state and the terminal loop.
//!
//! Row 0 is the box itself, row 1 a status line. Input is translated by
//! `keyboard`, steps go to the engine, and the display text comes back as
//! change notifications.

use crate::host::TerminalHost;
use crate::keyboard::{self, Action};

use anyhow::{Context, Result};
use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, EventStream,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{cursor, execute, queue};
use futures::StreamExt;
use multibox_core::locator::locate;
use multibox_core::{InputEvent, NumberBoxConfig, NumberBoxEngine, PropertyChange, RepeatState};

use std::io::{self, Write};
use tokio::sync::broadcast;

const PROMPT: &str = "xyz> ";
const HELP: &str = "Up/Down or wheel: step (Shift x10, Ctrl /10)   Enter: apply edit   Esc: quit";

// ────────────────────────────────────────────────────────────────
// TerminalApp
// ────────────────────────────────────────────────────────────────

pub struct TerminalApp {
    engine: NumberBoxEngine,
    host: TerminalHost,

    /// The widget's display text, or the pending edit while `editing`.
    text: String,
    editing: bool,
    notice: Option<String>,
    wants_exit: bool,
}

impl TerminalApp {
    pub fn new(engine: NumberBoxEngine, host: TerminalHost, text: String) -> Self {
        Self {
            engine,
            host,
            text,
            editing: false,
            notice: None,
            wants_exit: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn wants_exit(&self) -> bool {
        self.wants_exit
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, caret: usize) -> usize {
        self.text
            .char_indices()
            .nth(caret)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    pub async fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Widget(event) => {
                // Steps work on committed values, so land the edit first
                if self.editing
                    && matches!(event, InputEvent::KeyDown { .. } | InputEvent::Wheel { .. })
                {
                    self.commit().await?;
                }
                let dispatch = self.engine.dispatch(event).await?;
                tracing::trace!(?event, ?dispatch, "widget input");

                if event == InputEvent::FocusLost {
                    self.host.set_focused(false);
                }
            }
            Action::FocusGained => self.host.set_focused(true),
            Action::CaretLeft => self.host.move_caret(-1, self.char_len()),
            Action::CaretRight => self.host.move_caret(1, self.char_len()),
            Action::CaretHome => self.host.place_caret(0, self.char_len()),
            Action::CaretEnd => self.host.place_caret(self.char_len(), self.char_len()),
            Action::Insert(c) => {
                let at = self.byte_index(self.host.caret());
                self.text.insert(at, c);
                self.editing = true;
                self.host.move_caret(1, self.char_len());
            }
            Action::Backspace => {
                let caret = self.host.caret();
                if caret > 0 {
                    let at = self.byte_index(caret - 1);
                    self.text.remove(at);
                    self.editing = true;
                    self.host.move_caret(-1, self.char_len());
                }
            }
            Action::Commit => self.commit().await?,
            Action::Quit => self.wants_exit = true,
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        let accepted = self.engine.set_display(self.text.clone()).await?;
        self.notice = if accepted {
            None
        } else {
            Some("expected three comma-separated numbers".to_string())
        };
        self.resync().await
    }

    /// Throw away the local text, pending edit included, and take the widget's.
    pub async fn resync(&mut self) -> Result<()> {
        let snapshot = self.engine.snapshot().await?;
        self.editing = false;
        self.set_text(snapshot.display);
        Ok(())
    }

    /// Some display updates were dropped. A pending edit ignores them anyway
    /// and its commit resyncs, so only an idle box needs to catch up now.
    pub async fn on_lagged(&mut self, missed: u64) -> Result<()> {
        if self.editing {
            tracing::debug!(missed, "display updates lagged during an edit");
            return Ok(());
        }
        tracing::warn!(missed, "display updates lagged, resyncing");
        self.resync().await
    }

    pub fn on_change(&mut self, change: PropertyChange) {
        if let PropertyChange::Display(text) = change {
            if !self.editing {
                self.set_text(text);
            }
        }
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
        // "10" -> "9" can leave the caret past the end
        self.host.place_caret(self.host.caret(), self.char_len());
    }

    pub fn status_line(&self) -> String {
        let field = locate(&self.text, self.host.caret());
        let mut status = format!("field {:?}", field);
        if let RepeatState::Repeating(session) = self.engine.repeat_state() {
            status.push_str(&format!("  [holding {:?}]", session.key));
        }
        if self.editing {
            status.push_str("  [edited, Enter to apply]");
        }
        if let Some(notice) = &self.notice {
            status.push_str(&format!("  ! {}", notice));
        }
        status
    }

    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(
            out,
            cursor::MoveTo(0, 0),
            Clear(ClearType::CurrentLine),
            Print(PROMPT),
            Print(&self.text),
            cursor::MoveTo(0, 1),
            Clear(ClearType::CurrentLine),
            Print(self.status_line()),
            cursor::MoveTo(0, 3),
            Print(HELP),
        )?;

        let column = PROMPT.len() + self.host.caret();
        queue!(out, cursor::MoveTo(column as u16, 0))?;
        out.flush()
    }
}

// ────────────────────────────────────────────────────────────────
// Terminal setup
// ────────────────────────────────────────────────────────────────

/// Raw mode and friends, undone on drop.
struct TerminalGuard {
    enhanced: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        let mut out = io::stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange
        )?;

        // Without this most terminals never report key repeat or release,
        // and holding an arrow just sends plain presses.
        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        tracing::debug!(enhanced, "terminal ready");

        Ok(Self { enhanced })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        restore_terminal();
    }
}

pub fn restore_terminal() {
    let _ = execute!(
        io::stdout(),
        DisableFocusChange,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show
    );
    let _ = terminal::disable_raw_mode();
}

// ════════════════════════════════════════════════════════════════════
// Entry Point
// ════════════════════════════════════════════════════════════════════

pub async fn run(config: NumberBoxConfig) -> Result<()> {
    let host = TerminalHost::new();
    let (engine, mut changes) = NumberBoxEngine::start(&config, host.clone())?;
    let initial = engine.snapshot().await?.display;
    let mut app = TerminalApp::new(engine.clone(), host, initial);

    let _guard = TerminalGuard::enter()?;
    let mut events = EventStream::new();
    let mut stdout = io::stdout();
    app.render(&mut stdout)?;

    while !app.wants_exit() {
        tokio::select! {
            maybe_event = events.next() => {
                let Some(event) = maybe_event else { break };
                let event = event.context("reading terminal input")?;

                if let Some(modifiers) = keyboard::event_modifiers(&event) {
                    app.host.set_modifiers(modifiers);
                }
                if let Some(action) = keyboard::translate(&event) {
                    app.apply(action).await?;
                }
            }
            change = changes.recv() => match change {
                Ok(change) => app.on_change(change),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    app.on_lagged(missed).await?;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
        app.render(&mut stdout)?;
    }

    let _ = engine.stop();
    tracing::info!("multibox bridge exiting");
    Ok(())
}
