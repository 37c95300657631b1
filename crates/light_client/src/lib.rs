//! Client-side state synchronization for a multi-room lighting fixture.
//!
//! [`SyncSession`] ties the editing state, the mode catalog, room selection and
//! the command dispatcher together. Presentation layers drive it and render the
//! [`SessionEvent`]s it broadcasts.

use shared::{
    domain::{Mode, Room},
    protocol::LightCommand,
};

pub mod color_state;
pub mod dispatcher;
pub mod error;
pub mod mode_registry;
pub mod room_selector;
pub mod session;
pub mod transport;

pub use color_state::{Channel, ColorState};
pub use dispatcher::{CommandDispatcher, DEFAULT_QUIET_PERIOD};
pub use error::{DispatchError, SessionError, ValidationError};
pub use mode_registry::{builtin_modes, ModeRegistry, RoomPolicy};
pub use room_selector::{PendingAction, RoomRequest, RoomSelector, SelectorState};
pub use session::{ActionOutcome, SessionConfig, SyncSession};
pub use transport::{HttpLightingEndpoint, LightingEndpoint, DEFAULT_REQUEST_TIMEOUT};

#[derive(Debug, Clone)]
pub enum SessionEvent {
    CommandSent {
        command: LightCommand,
        debounced: bool,
    },
    RoomChoiceRequested {
        action: PendingAction,
        rooms: Vec<Room>,
    },
    RoomChoiceCancelled(PendingAction),
    ModeCreated(Mode),
    Notification(String),
    Error(String),
}

#[cfg(test)]
mod test_support;
