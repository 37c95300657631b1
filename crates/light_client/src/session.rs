use std::{sync::Arc, time::Duration};

use shared::{
    domain::{default_rooms, Mode, ModeId, Room, RoomId},
    protocol::{EndpointAck, LightCommand, LightState},
};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::{
    color_state::{Channel, ColorState},
    dispatcher::{CommandDispatcher, DEFAULT_QUIET_PERIOD},
    error::{SessionError, ValidationError},
    mode_registry::{ModeRegistry, RoomPolicy},
    room_selector::{PendingAction, RoomRequest, RoomSelector},
    transport::LightingEndpoint,
    SessionEvent,
};

const EVENT_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub rooms: Vec<Room>,
    pub quiet_period: Duration,
    pub room_policy: RoomPolicy,
    pub seed_builtin_modes: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rooms: default_rooms(),
            quiet_period: DEFAULT_QUIET_PERIOD,
            room_policy: RoomPolicy::Required,
            seed_builtin_modes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The action is parked in the room selector until a room is chosen.
    AwaitingRoom(PendingAction),
    Toggled {
        room: Room,
        on: bool,
        ack: EndpointAck,
    },
    ModeApplied {
        mode: ModeId,
        room: Room,
        ack: EndpointAck,
    },
    ModeCreated(Mode),
}

/// Owns the editing state, the mode catalog and the room selector, and routes
/// every change through one [`CommandDispatcher`].
pub struct SyncSession {
    color: ColorState,
    modes: ModeRegistry,
    selector: RoomSelector,
    dispatcher: Arc<CommandDispatcher>,
    selected_room: Option<RoomId>,
    events: broadcast::Sender<SessionEvent>,
}

impl SyncSession {
    pub fn new(endpoint: Arc<dyn LightingEndpoint>, config: SessionConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let modes = if config.seed_builtin_modes {
            ModeRegistry::with_builtin_modes(config.room_policy)
        } else {
            ModeRegistry::new(config.room_policy)
        };
        Self {
            color: ColorState::default(),
            modes,
            selector: RoomSelector::new(config.rooms),
            dispatcher: CommandDispatcher::new(endpoint, config.quiet_period, events.clone()),
            selected_room: None,
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn color(&self) -> &ColorState {
        &self.color
    }

    pub fn modes(&self) -> &ModeRegistry {
        &self.modes
    }

    pub fn list_modes(&self) -> &[Mode] {
        self.modes.list_modes()
    }

    pub fn rooms(&self) -> &[Room] {
        self.selector.rooms()
    }

    pub fn selector(&self) -> &RoomSelector {
        &self.selector
    }

    pub fn selected_room(&self) -> Option<&Room> {
        self.selected_room.and_then(|id| self.selector.room(id))
    }

    pub fn dispatcher(&self) -> &Arc<CommandDispatcher> {
        &self.dispatcher
    }

    pub async fn set_channel(&mut self, channel: Channel, value: f64) {
        self.color.set_channel(channel, value);
        self.sync_edits().await;
    }

    pub async fn set_brightness(&mut self, value: f64) {
        self.color.set_brightness(value);
        self.sync_edits().await;
    }

    /// Forwards pending edits to the debounced path when the light is on in a
    /// selected room. Otherwise the edits stay local.
    async fn sync_edits(&mut self) {
        if !self.color.take_dirty() || !self.color.is_on() {
            return;
        }
        let Some(room) = self.selected_room else {
            return;
        };
        let command = self.color.to_command(room);
        self.dispatcher.send_debounced(command).await;
    }

    pub async fn toggle(&mut self, on: bool) -> Result<ActionOutcome, SessionError> {
        self.request_room(PendingAction::Toggle { on }).await
    }

    pub async fn apply_mode(&mut self, mode: Mode) -> Result<ActionOutcome, SessionError> {
        self.request_room(PendingAction::ApplyMode(mode)).await
    }

    /// Looks a mode up by id, falling back to a case-insensitive name match.
    pub async fn apply_mode_by_key(&mut self, key: &str) -> Result<ActionOutcome, SessionError> {
        let mode = self
            .modes
            .find_by_key(key)
            .cloned()
            .ok_or_else(|| ValidationError::UnknownMode(key.to_string()))?;
        self.apply_mode(mode).await
    }

    /// Snapshots the current editing state into a new mode bound to the
    /// selected room.
    pub fn create_mode(&mut self, name: &str) -> Result<ActionOutcome, SessionError> {
        let mode = self.modes.create_mode(
            name,
            self.selected_room,
            self.color.rgb(),
            self.color.brightness(),
        )?;
        Ok(self.store_mode(mode))
    }

    /// Like [`SyncSession::create_mode`] but asks for the mode's room first.
    pub async fn begin_create_mode(&mut self, name: &str) -> Result<ActionOutcome, SessionError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyModeName.into());
        }
        self.request_room(PendingAction::CreateMode {
            name: name.to_string(),
        })
        .await
    }

    pub async fn choose_room(&mut self, room_id: RoomId) -> Result<ActionOutcome, SessionError> {
        let (room, action) = self.selector.choose_room(room_id)?;
        self.run(room, action).await
    }

    pub fn cancel_room_choice(&mut self) -> Option<PendingAction> {
        let action = self.selector.cancel()?;
        info!(action = %action.describe(), "session: room choice cancelled");
        let _ = self
            .events
            .send(SessionEvent::RoomChoiceCancelled(action.clone()));
        Some(action)
    }

    /// Sends a scheduled edit now rather than after the quiet period.
    pub async fn flush(&self) -> bool {
        self.dispatcher.flush().await
    }

    async fn request_room(&mut self, action: PendingAction) -> Result<ActionOutcome, SessionError> {
        match self.selector.request_room(action)? {
            RoomRequest::Resolved { room, action } => self.run(room, action).await,
            RoomRequest::Awaiting => {
                let action = self
                    .selector
                    .pending_action()
                    .cloned()
                    .ok_or(ValidationError::NoPendingRoomChoice)?;
                let _ = self.events.send(SessionEvent::RoomChoiceRequested {
                    action: action.clone(),
                    rooms: self.selector.rooms().to_vec(),
                });
                Ok(ActionOutcome::AwaitingRoom(action))
            }
        }
    }

    async fn run(&mut self, room: Room, action: PendingAction) -> Result<ActionOutcome, SessionError> {
        match action {
            PendingAction::Toggle { on } => self.run_toggle(room, on).await,
            PendingAction::ApplyMode(mode) => self.run_apply_mode(room, mode).await,
            PendingAction::CreateMode { name } => {
                let mode = self.modes.create_mode(
                    &name,
                    Some(room.id),
                    self.color.rgb(),
                    self.color.brightness(),
                )?;
                Ok(self.store_mode(mode))
            }
        }
    }

    async fn run_toggle(&mut self, room: Room, on: bool) -> Result<ActionOutcome, SessionError> {
        // Local state follows the request even if the endpoint rejects it.
        self.color.set_on(on);
        self.color.take_dirty();
        self.selected_room = Some(room.id);

        let command = self.color.to_command(room.id);
        let ack = self.dispatcher.send_immediate(command).await?;

        let verb = if on { "on" } else { "off" };
        self.notify(format!("light turned {verb} for {}", room.name));
        Ok(ActionOutcome::Toggled { room, on, ack })
    }

    async fn run_apply_mode(&mut self, room: Room, mode: Mode) -> Result<ActionOutcome, SessionError> {
        // Applying a mode is a one-shot push; the editing state is left alone.
        let color = mode
            .decode_color()
            .map_err(ValidationError::InvalidColor)?;
        let command = LightCommand::new(LightState::On, color, mode.brightness, room.id);
        let ack = match self.dispatcher.send_immediate(command).await {
            Ok(ack) => ack,
            Err(err) => {
                warn!(mode = %mode.id, room = %room.id, "session: mode apply failed");
                return Err(err.into());
            }
        };

        info!(mode = %mode.id, room = %room.id, "session: mode applied");
        self.notify(format!("mode {} applied to {}", mode.name, room.name));
        Ok(ActionOutcome::ModeApplied {
            mode: mode.id,
            room,
            ack,
        })
    }

    fn store_mode(&mut self, mode: Mode) -> ActionOutcome {
        self.modes.append_mode(mode.clone());
        info!(mode = %mode.id, "session: mode created");
        let _ = self.events.send(SessionEvent::ModeCreated(mode.clone()));
        self.notify(format!("mode \"{}\" created", mode.name));
        ActionOutcome::ModeCreated(mode)
    }

    fn notify(&self, message: String) {
        let _ = self.events.send(SessionEvent::Notification(message));
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
