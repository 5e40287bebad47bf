use crate::StepKey;

/// One continuous hold of a step key. The id tells a stale cadence loop apart
/// from a newer session on the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepeatSession {
    pub key: StepKey,
    pub id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatState {
    #[default]
    Idle,
    Repeating(RepeatSession),
}

/// What the widget should do with a key-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDownAction {
    /// Plain press: one step, no session.
    StepOnce(StepKey),
    /// Auto-repeat kicked in: start a cadence loop for this session.
    StartSession(RepeatSession),
    /// Repeat signal for the key that is already repeating.
    Ignored,
}

/// The held-key auto-repeat machine.
///
/// `Idle <-> Repeating(session)`. At most one session is live at a time; a
/// cadence loop keeps stepping only while its own session is still the live
/// one, so replacing or ending a session is all it takes to stop the loop.
#[derive(Debug, Default)]
pub struct RepeatController {
    state: RepeatState,
    next_id: u64,
}

impl RepeatController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RepeatState {
        self.state
    }

    pub fn is_live(&self, session: RepeatSession) -> bool {
        self.state == RepeatState::Repeating(session)
    }

    pub fn on_key_down(&mut self, key: StepKey, repeat: bool) -> KeyDownAction {
        if !repeat {
            return KeyDownAction::StepOnce(key);
        }

        match self.state {
            RepeatState::Repeating(session) if session.key == key => KeyDownAction::Ignored,
            previous => {
                // A repeat for a different key replaces the old session
                if let RepeatState::Repeating(old) = previous {
                    tracing::debug!(?old, "repeat session superseded");
                }

                let session = RepeatSession {
                    key,
                    id: self.next_id,
                };
                self.next_id += 1;
                self.state = RepeatState::Repeating(session);
                tracing::debug!(?session, "repeat session started");
                KeyDownAction::StartSession(session)
            }
        }
    }

    /// Ends the session if `key` is the one repeating. Other key-ups are ignored.
    pub fn on_key_up(&mut self, key: StepKey) -> Option<RepeatSession> {
        match self.state {
            RepeatState::Repeating(session) if session.key == key => {
                self.state = RepeatState::Idle;
                tracing::debug!(?session, "repeat session ended");
                Some(session)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) -> Option<RepeatSession> {
        match std::mem::take(&mut self.state) {
            RepeatState::Repeating(session) => {
                tracing::debug!(?session, "repeat session cancelled");
                Some(session)
            }
            RepeatState::Idle => None,
        }
    }
}
