use shared::{domain::RoomId, error::ColorParseError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("mode name must not be empty")]
    EmptyModeName,
    #[error("a room must be selected first")]
    RoomRequired,
    #[error("unknown room {0}")]
    UnknownRoom(RoomId),
    #[error("a mode with id '{0}' already exists")]
    DuplicateModeId(String),
    #[error("unknown mode '{0}'")]
    UnknownMode(String),
    #[error("invalid mode color: {0}")]
    InvalidColor(#[from] ColorParseError),
    #[error("no room choice is pending")]
    NoPendingRoomChoice,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("endpoint rejected command with status {status}: {body}")]
    Endpoint { status: u16, body: String },
}

impl DispatchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

pub const OPERATION_FAILED: &str = "operation failed: the light did not accept the command";

impl SessionError {
    /// Message for the user-facing notification. Transport and endpoint
    /// failures share one message; the variant keeps the detail for logs.
    pub fn notification(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Dispatch(_) => OPERATION_FAILED.to_string(),
        }
    }
}
