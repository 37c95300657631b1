use shared::domain::{Mode, Room, RoomId};
use tracing::{debug, info};

use crate::error::ValidationError;

/// Work that needs a room before it can run.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    Toggle { on: bool },
    ApplyMode(Mode),
    CreateMode { name: String },
}

impl PendingAction {
    pub fn bound_room(&self) -> Option<RoomId> {
        match self {
            Self::ApplyMode(mode) => mode.room,
            Self::Toggle { .. } | Self::CreateMode { .. } => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Toggle { on: true } => "turn the light on".to_string(),
            Self::Toggle { on: false } => "turn the light off".to_string(),
            Self::ApplyMode(mode) => format!("apply mode {}", mode.name),
            Self::CreateMode { name } => format!("create mode {name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectorState {
    #[default]
    Idle,
    AwaitingRoomChoice(PendingAction),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoomRequest {
    /// The action carried its own room and can run now.
    Resolved { room: Room, action: PendingAction },
    /// The caller has to present the rooms and call `choose_room` or `cancel`.
    Awaiting,
}

#[derive(Debug, Clone)]
pub struct RoomSelector {
    rooms: Vec<Room>,
    state: SelectorState,
}

impl RoomSelector {
    pub fn new(rooms: Vec<Room>) -> Self {
        Self {
            rooms,
            state: SelectorState::Idle,
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        match &self.state {
            SelectorState::Idle => None,
            SelectorState::AwaitingRoomChoice(action) => Some(action),
        }
    }

    pub fn is_awaiting(&self) -> bool {
        self.pending_action().is_some()
    }

    /// Starts resolving a room for `action`. A newer request always replaces
    /// an older pending one.
    pub fn request_room(&mut self, action: PendingAction) -> Result<RoomRequest, ValidationError> {
        if let SelectorState::AwaitingRoomChoice(previous) = &self.state {
            debug!(replaced = %previous.describe(), "rooms: pending request superseded");
        }

        if let Some(room_id) = action.bound_room() {
            self.state = SelectorState::Idle;
            let room = self
                .room(room_id)
                .cloned()
                .ok_or(ValidationError::UnknownRoom(room_id))?;
            return Ok(RoomRequest::Resolved { room, action });
        }

        info!(action = %action.describe(), "rooms: awaiting room choice");
        self.state = SelectorState::AwaitingRoomChoice(action);
        Ok(RoomRequest::Awaiting)
    }

    /// Resolves the pending action. An unknown room id leaves the request pending.
    pub fn choose_room(
        &mut self,
        room_id: RoomId,
    ) -> Result<(Room, PendingAction), ValidationError> {
        if !self.is_awaiting() {
            return Err(ValidationError::NoPendingRoomChoice);
        }
        let room = self
            .room(room_id)
            .cloned()
            .ok_or(ValidationError::UnknownRoom(room_id))?;

        match std::mem::take(&mut self.state) {
            SelectorState::AwaitingRoomChoice(action) => Ok((room, action)),
            SelectorState::Idle => Err(ValidationError::NoPendingRoomChoice),
        }
    }

    pub fn cancel(&mut self) -> Option<PendingAction> {
        match std::mem::take(&mut self.state) {
            SelectorState::AwaitingRoomChoice(action) => Some(action),
            SelectorState::Idle => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/room_selector_tests.rs"]
mod tests;
