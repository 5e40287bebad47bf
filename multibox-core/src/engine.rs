use crate::config::NumberBoxConfig;
use crate::error::NumberBoxError;
use crate::host::WidgetHost;
use crate::number_box::{Dispatch, NumberBox, Snapshot};
use crate::state_machine::{RepeatSession, RepeatState};
use crate::{Field, InputEvent, PropertyChange};

use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

/// Capacity of the change-notification fan-out.
const CHANGE_CAPACITY: usize = 256;

/// Commands sent to the owner task
enum EngineCommand {
    Input {
        event: InputEvent,
        reply: oneshot::Sender<Dispatch>,
    },
    Cadence(RepeatSession),
    SetValue {
        field: Field,
        value: f64,
    },
    SetDisplay {
        text: String,
        reply: oneshot::Sender<bool>,
    },
    SetTickFrequency {
        value: f64,
        reply: oneshot::Sender<Result<(), NumberBoxError>>,
    },
    SetRange {
        minimum: f64,
        maximum: f64,
        reply: oneshot::Sender<Result<(), NumberBoxError>>,
    },
    SetWrap(bool),
    Snapshot(oneshot::Sender<Snapshot>),
    Stop,
}

/// Async front of a [`NumberBox`].
///
/// One spawned task owns the widget and its host; every read and write goes
/// through that task, so steps from the auto-repeat cadence and steps from
/// direct input never interleave. Handles are cheap to clone.
#[derive(Clone)]
pub struct NumberBoxEngine {
    cmd_tx: mpsc::UnboundedSender<EngineCommand>,
    changes: broadcast::Sender<PropertyChange>,
    repeat: watch::Receiver<RepeatState>,
}

impl std::fmt::Debug for NumberBoxEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumberBoxEngine")
            .field("repeat", &*self.repeat.borrow())
            .finish()
    }
}

impl NumberBoxEngine {
    /// Build the widget from `config` and start the owner task.
    /// Must be called from inside a tokio runtime.
    pub fn start<H: WidgetHost>(
        config: &NumberBoxConfig,
        host: H,
    ) -> Result<(Self, broadcast::Receiver<PropertyChange>), NumberBoxError> {
        let widget = NumberBox::from_config(config)?;
        Ok(Self::start_with(widget, host, config.repeat_interval()))
    }

    pub fn start_with<H: WidgetHost>(
        widget: NumberBox,
        host: H,
        repeat_interval: Duration,
    ) -> (Self, broadcast::Receiver<PropertyChange>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (changes, changes_rx) = broadcast::channel(CHANGE_CAPACITY);
        let (state_tx, state_rx) = watch::channel(widget.repeat_state());

        let owner = Owner {
            widget,
            host: Box::new(host),
            cmd_tx: cmd_tx.downgrade(),
            changes: changes.clone(),
            state_tx,
            repeat_interval,
            out: Vec::new(),
        };
        tokio::spawn(owner.run(cmd_rx));

        let engine = Self {
            cmd_tx,
            changes,
            repeat: state_rx,
        };
        (engine, changes_rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PropertyChange> {
        self.changes.subscribe()
    }

    /// Current repeat state as last published by the owner task.
    pub fn repeat_state(&self) -> RepeatState {
        *self.repeat.borrow()
    }

    pub async fn dispatch(&self, event: InputEvent) -> Result<Dispatch, NumberBoxError> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineCommand::Input { event, reply })?;
        rx.await.map_err(|_| NumberBoxError::EngineStopped)
    }

    pub fn set_value(&self, field: Field, value: f64) -> Result<(), NumberBoxError> {
        self.send(EngineCommand::SetValue { field, value })
    }

    pub async fn set_display(&self, text: impl Into<String>) -> Result<bool, NumberBoxError> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineCommand::SetDisplay {
            text: text.into(),
            reply,
        })?;
        rx.await.map_err(|_| NumberBoxError::EngineStopped)
    }

    pub async fn set_tick_frequency(&self, value: f64) -> Result<(), NumberBoxError> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineCommand::SetTickFrequency { value, reply })?;
        rx.await.map_err(|_| NumberBoxError::EngineStopped)?
    }

    pub async fn set_range(&self, minimum: f64, maximum: f64) -> Result<(), NumberBoxError> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineCommand::SetRange {
            minimum,
            maximum,
            reply,
        })?;
        rx.await.map_err(|_| NumberBoxError::EngineStopped)?
    }

    pub fn set_wrap(&self, wrap: bool) -> Result<(), NumberBoxError> {
        self.send(EngineCommand::SetWrap(wrap))
    }

    pub async fn snapshot(&self) -> Result<Snapshot, NumberBoxError> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineCommand::Snapshot(reply))?;
        rx.await.map_err(|_| NumberBoxError::EngineStopped)
    }

    /// Stop the owner task. Any live repeat session dies with it.
    pub fn stop(&self) -> Result<(), NumberBoxError> {
        self.send(EngineCommand::Stop)
    }

    fn send(&self, cmd: EngineCommand) -> Result<(), NumberBoxError> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| NumberBoxError::EngineStopped)
    }
}

// ────────────────────────────────────────────────────────────────
// Owner task
// ────────────────────────────────────────────────────────────────

struct Owner {
    widget: NumberBox,
    host: Box<dyn WidgetHost>,
    // Weak, so cadence loops never keep the owner alive on their own
    cmd_tx: mpsc::WeakUnboundedSender<EngineCommand>,
    changes: broadcast::Sender<PropertyChange>,
    state_tx: watch::Sender<RepeatState>,
    repeat_interval: Duration,
    out: Vec<PropertyChange>,
}

impl Owner {
    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<EngineCommand>) {
        tracing::debug!("number box engine started");

        while let Some(cmd) = cmd_rx.recv().await {
            let mut started = None;

            match cmd {
                EngineCommand::Input { event, reply } => {
                    let dispatch = self.widget.handle(event, self.host.as_mut(), &mut self.out);
                    if let Dispatch::StartRepeat(session) = dispatch {
                        started = Some(session);
                    }
                    let _ = reply.send(dispatch);
                }
                EngineCommand::Cadence(session) => {
                    self.widget
                        .on_cadence(session, self.host.as_mut(), &mut self.out);
                }
                EngineCommand::SetValue { field, value } => {
                    self.widget.set_value(field, value, &mut self.out);
                }
                EngineCommand::SetDisplay { text, reply } => {
                    let accepted = self.widget.set_display(&text, &mut self.out);
                    let _ = reply.send(accepted);
                }
                EngineCommand::SetTickFrequency { value, reply } => {
                    let result = self.widget.set_tick_frequency(value, &mut self.out);
                    let _ = reply.send(result);
                }
                EngineCommand::SetRange {
                    minimum,
                    maximum,
                    reply,
                } => {
                    let result = self.widget.set_range(minimum, maximum, &mut self.out);
                    let _ = reply.send(result);
                }
                EngineCommand::SetWrap(wrap) => {
                    self.widget.set_wrap(wrap, &mut self.out);
                }
                EngineCommand::Snapshot(reply) => {
                    let _ = reply.send(self.widget.snapshot());
                }
                EngineCommand::Stop => break,
            }

            self.publish();

            // The state is published first, so the new loop sees its own session
            if let Some(session) = started {
                tokio::spawn(cadence_loop(
                    session,
                    self.repeat_interval,
                    self.state_tx.subscribe(),
                    self.cmd_tx.clone(),
                ));
            }
        }

        // Let any sleeping cadence loop see that its session is over
        self.state_tx.send_replace(RepeatState::Idle);
        tracing::debug!("number box engine stopped");
    }

    fn publish(&mut self) {
        let current = self.widget.repeat_state();
        self.state_tx.send_if_modified(|state| {
            let changed = *state != current;
            *state = current;
            changed
        });

        for change in self.out.drain(..) {
            // No subscribers is fine
            let _ = self.changes.send(change);
        }
    }
}

/// Drives one repeat session: step, sleep, check the session is still live.
///
/// Cancellation is by polling. After a key-up this loop notices on its next
/// wake-up, at most one interval later; the owner also drops any cadence
/// command for a dead session, so no step lands after the key-up itself.
async fn cadence_loop(
    session: RepeatSession,
    interval: Duration,
    state: watch::Receiver<RepeatState>,
    cmd_tx: mpsc::WeakUnboundedSender<EngineCommand>,
) {
    tracing::debug!(?session, "cadence loop started");

    loop {
        if *state.borrow() != RepeatState::Repeating(session) {
            break;
        }
        let Some(tx) = cmd_tx.upgrade() else {
            break;
        };
        if tx.send(EngineCommand::Cadence(session)).is_err() {
            break;
        }
        drop(tx);

        tokio::time::sleep(interval).await;
    }

    tracing::debug!(?session, "cadence loop finished");
}
