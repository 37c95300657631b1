use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ColorParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
}

impl Room {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: RoomId(id),
            name: name.into(),
        }
    }
}

pub fn default_rooms() -> Vec<Room> {
    (1..=4).map(|id| Room::new(id, format!("Oda {id}"))).collect()
}

/// Clamps a unit-interval value, mapping NaN to zero.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RgbColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RgbColor {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Converts unit-interval channels to the 0-255 wire range.
    pub fn from_unit(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red: unit_to_byte(red),
            green: unit_to_byte(green),
            blue: unit_to_byte(blue),
        }
    }

    pub fn to_unit(self) -> (f64, f64, f64) {
        (
            f64::from(self.red) / 255.0,
            f64::from(self.green) / 255.0,
            f64::from(self.blue) / 255.0,
        )
    }
}

fn unit_to_byte(value: f64) -> u8 {
    (clamp_unit(value) * 255.0).round() as u8
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.red, self.green, self.blue)
    }
}

impl FromStr for RgbColor {
    type Err = ColorParseError;

    /// Reads the first three runs of ASCII digits, so `rgb(1, 2, 3)`,
    /// `1,2,3` and `rgb(1 2 3)` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut components = s
            .split(|ch: char| !ch.is_ascii_digit())
            .filter(|part| !part.is_empty());

        let mut next = || -> Result<u8, ColorParseError> {
            let part = components
                .next()
                .ok_or_else(|| ColorParseError::MissingComponents(s.to_string()))?;
            let value = part.parse::<u32>().unwrap_or(u32::MAX);
            u8::try_from(value).map_err(|_| ColorParseError::ComponentOutOfRange {
                raw: s.to_string(),
                value,
            })
        };

        let red = next()?;
        let green = next()?;
        let blue = next()?;
        Ok(Self { red, green, blue })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeId(pub String);

impl ModeId {
    /// Lowercases the name and replaces each run of whitespace with `_`.
    pub fn from_name(name: &str) -> Self {
        let mut id = String::with_capacity(name.len());
        let mut in_whitespace = false;
        for ch in name.chars() {
            if ch.is_whitespace() {
                if !in_whitespace {
                    id.push('_');
                }
                in_whitespace = true;
            } else {
                id.extend(ch.to_lowercase());
                in_whitespace = false;
            }
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// A named preset. `color` keeps the formatted `rgb(r, g, b)` string so modes
/// can be handed around exactly as they are displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mode {
    pub id: ModeId,
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomId>,
    #[serde(default = "full_brightness")]
    pub brightness: f64,
}

fn full_brightness() -> f64 {
    1.0
}

impl Mode {
    pub fn decode_color(&self) -> Result<RgbColor, ColorParseError> {
        self.color.parse()
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
