use serde::{Deserialize, Serialize};

use crate::domain::{clamp_unit, RgbColor, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightState {
    On,
    Off,
}

impl LightState {
    pub fn from_on(on: bool) -> Self {
        if on {
            Self::On
        } else {
            Self::Off
        }
    }

    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

/// Body of one `POST` to the lighting endpoint. Each command is a complete
/// snapshot of the desired fixture state for a single room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCommand {
    pub state: LightState,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub brightness: f64,
    pub room: RoomId,
}

impl LightCommand {
    pub fn new(state: LightState, color: RgbColor, brightness: f64, room: RoomId) -> Self {
        Self {
            state,
            red: color.red,
            green: color.green,
            blue: color.blue,
            brightness: clamp_unit(brightness),
            room,
        }
    }

    pub fn color(&self) -> RgbColor {
        RgbColor::new(self.red, self.green, self.blue)
    }
}

/// Successful endpoint response. The body is opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointAck {
    pub status: u16,
    pub body: String,
}

impl EndpointAck {
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}
