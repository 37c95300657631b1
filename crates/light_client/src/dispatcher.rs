use std::{sync::Arc, time::Duration};

use shared::protocol::{EndpointAck, LightCommand};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::{
    error::{DispatchError, OPERATION_FAILED},
    transport::LightingEndpoint,
    SessionEvent,
};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

struct ScheduledSend {
    generation: u64,
    command: LightCommand,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct DebounceSlot {
    next_generation: u64,
    scheduled: Option<ScheduledSend>,
    /// Timer tasks that fired and are still delivering their command.
    in_flight: Vec<JoinHandle<()>>,
}

/// Sends commands to the lighting endpoint. Discrete actions go out at once;
/// continuous edits are coalesced so only the last command of a burst is sent.
pub struct CommandDispatcher {
    endpoint: Arc<dyn LightingEndpoint>,
    quiet_period: Duration,
    slot: Mutex<DebounceSlot>,
    events: broadcast::Sender<SessionEvent>,
}

impl CommandDispatcher {
    pub fn new(
        endpoint: Arc<dyn LightingEndpoint>,
        quiet_period: Duration,
        events: broadcast::Sender<SessionEvent>,
    ) -> Arc<Self> {
        Arc::new(Self {
            endpoint,
            quiet_period,
            slot: Mutex::new(DebounceSlot::default()),
            events,
        })
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Transmits `command` now. Any debounced send that has not fired yet is
    /// dropped first so it cannot land after this command.
    pub async fn send_immediate(&self, command: LightCommand) -> Result<EndpointAck, DispatchError> {
        self.cancel_pending().await;

        match self.endpoint.send_command(&command).await {
            Ok(ack) => {
                info!(
                    "dispatch: sent state={:?} room={} rgb=({}, {}, {}) brightness={} status={}",
                    command.state,
                    command.room,
                    command.red,
                    command.green,
                    command.blue,
                    command.brightness,
                    ack.status
                );
                let _ = self.events.send(SessionEvent::CommandSent {
                    command,
                    debounced: false,
                });
                Ok(ack)
            }
            Err(err) => {
                warn!(
                    transport = err.is_transport(),
                    "dispatch: command for room={} failed: {err}", command.room
                );
                Err(err)
            }
        }
    }

    /// Schedules `command` after the quiet period, replacing whatever was
    /// scheduled before. Failures are reported as [`SessionEvent::Error`].
    pub async fn send_debounced(self: &Arc<Self>, command: LightCommand) {
        let mut slot = self.slot.lock().await;
        slot.in_flight.retain(|delivery| !delivery.is_finished());
        slot.next_generation += 1;
        let generation = slot.next_generation;

        let dispatcher = Arc::clone(self);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(dispatcher.quiet_period).await;
            if let Some(command) = dispatcher.claim(generation).await {
                dispatcher.deliver_debounced(command).await;
            }
        });

        let previous = slot.scheduled.replace(ScheduledSend {
            generation,
            command,
            timer,
        });
        if let Some(previous) = previous {
            previous.timer.abort();
            debug!(
                generation,
                replaced = previous.generation,
                "dispatch: debounced command coalesced"
            );
        } else {
            debug!(generation, "dispatch: debounced command scheduled");
        }
    }

    /// Sends the scheduled command right away instead of waiting for the
    /// quiet period, and waits for debounced sends already on the wire.
    /// Returns whether there was anything to wait for.
    pub async fn flush(&self) -> bool {
        let (scheduled, in_flight) = {
            let mut slot = self.slot.lock().await;
            (slot.scheduled.take(), std::mem::take(&mut slot.in_flight))
        };

        let mut flushed = false;
        if let Some(scheduled) = scheduled {
            scheduled.timer.abort();
            self.deliver_debounced(scheduled.command).await;
            flushed = true;
        }
        for delivery in in_flight {
            if !delivery.is_finished() {
                flushed = true;
            }
            let _ = delivery.await;
        }
        flushed
    }

    pub async fn pending_command(&self) -> Option<LightCommand> {
        self.slot
            .lock()
            .await
            .scheduled
            .as_ref()
            .map(|scheduled| scheduled.command.clone())
    }

    pub async fn cancel_pending(&self) -> Option<LightCommand> {
        let scheduled = self.slot.lock().await.scheduled.take()?;
        scheduled.timer.abort();
        debug!(
            generation = scheduled.generation,
            "dispatch: pending debounced command cancelled"
        );
        Some(scheduled.command)
    }

    async fn claim(&self, generation: u64) -> Option<LightCommand> {
        let mut slot = self.slot.lock().await;
        match slot.scheduled.take() {
            Some(scheduled) if scheduled.generation == generation => {
                slot.in_flight.push(scheduled.timer);
                Some(scheduled.command)
            }
            other => {
                slot.scheduled = other;
                None
            }
        }
    }

    async fn deliver_debounced(&self, command: LightCommand) {
        match self.endpoint.send_command(&command).await {
            Ok(ack) => {
                info!(
                    "dispatch: debounced send room={} rgb=({}, {}, {}) brightness={} status={}",
                    command.room,
                    command.red,
                    command.green,
                    command.blue,
                    command.brightness,
                    ack.status
                );
                let _ = self.events.send(SessionEvent::CommandSent {
                    command,
                    debounced: true,
                });
            }
            Err(err) => {
                error!(
                    transport = err.is_transport(),
                    "dispatch: debounced send for room={} failed: {err}", command.room
                );
                let _ = self
                    .events
                    .send(SessionEvent::Error(OPERATION_FAILED.to_string()));
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
