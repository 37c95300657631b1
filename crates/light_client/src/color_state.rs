use std::{fmt, str::FromStr};

use shared::{
    domain::{clamp_unit, RgbColor, RoomId},
    protocol::{LightCommand, LightState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Self::Red),
            "g" | "green" => Ok(Self::Green),
            "b" | "blue" => Ok(Self::Blue),
            other => Err(format!("unknown color channel '{other}'")),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// The values being edited in the current session. Setters clamp to `[0, 1]`
/// and mark the state dirty until the next synchronization pass takes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorState {
    red: f64,
    green: f64,
    blue: f64,
    brightness: f64,
    on: bool,
    dirty: bool,
}

impl Default for ColorState {
    fn default() -> Self {
        Self {
            red: 0.0,
            green: 0.0,
            blue: 0.0,
            brightness: 1.0,
            on: false,
            dirty: false,
        }
    }
}

impl ColorState {
    pub fn set_channel(&mut self, channel: Channel, value: f64) {
        let value = clamp_unit(value);
        match channel {
            Channel::Red => self.red = value,
            Channel::Green => self.green = value,
            Channel::Blue => self.blue = value,
        }
        self.dirty = true;
    }

    pub fn set_brightness(&mut self, value: f64) {
        self.brightness = clamp_unit(value);
        self.dirty = true;
    }

    pub fn set_on(&mut self, on: bool) {
        self.on = on;
        self.dirty = true;
    }

    pub fn channel(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn rgb(&self) -> RgbColor {
        RgbColor::from_unit(self.red, self.green, self.blue)
    }

    pub fn to_command(&self, room: RoomId) -> LightCommand {
        LightCommand::new(
            LightState::from_on(self.on),
            self.rgb(),
            self.brightness,
            room,
        )
    }
}

#[cfg(test)]
#[path = "tests/color_state_tests.rs"]
mod tests;
