use shared::domain::{clamp_unit, Mode, ModeId, RgbColor, RoomId};
use tracing::debug;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomPolicy {
    /// A room has to be chosen before a mode may be created.
    #[default]
    Required,
    /// Modes may be created unbound and pick a room when applied.
    Optional,
}

/// Ordered catalog of modes. Built-ins come first, created modes are appended
/// in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ModeRegistry {
    modes: Vec<Mode>,
    room_policy: RoomPolicy,
}

pub fn builtin_modes() -> Vec<Mode> {
    [
        ("meal", "Yemek", RgbColor::new(255, 200, 100)),
        ("sleep", "Uyku", RgbColor::new(100, 100, 255)),
        ("study", "Ders", RgbColor::new(255, 255, 100)),
    ]
    .into_iter()
    .map(|(id, name, color)| Mode {
        id: ModeId(id.to_string()),
        name: name.to_string(),
        color: color.to_string(),
        room: None,
        brightness: 1.0,
    })
    .collect()
}

impl ModeRegistry {
    pub fn new(room_policy: RoomPolicy) -> Self {
        Self {
            modes: Vec::new(),
            room_policy,
        }
    }

    pub fn with_builtin_modes(room_policy: RoomPolicy) -> Self {
        Self {
            modes: builtin_modes(),
            room_policy,
        }
    }

    pub fn room_policy(&self) -> RoomPolicy {
        self.room_policy
    }

    /// Builds a mode from a snapshot of the editing state. The mode is not
    /// stored; pass it to [`ModeRegistry::append_mode`].
    pub fn create_mode(
        &self,
        name: &str,
        room: Option<RoomId>,
        color: RgbColor,
        brightness: f64,
    ) -> Result<Mode, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyModeName);
        }
        if room.is_none() && self.room_policy == RoomPolicy::Required {
            return Err(ValidationError::RoomRequired);
        }

        let id = ModeId::from_name(name);
        if self.find(&id).is_some() {
            return Err(ValidationError::DuplicateModeId(id.0));
        }

        Ok(Mode {
            id,
            name: name.to_string(),
            color: color.to_string(),
            room,
            brightness: clamp_unit(brightness),
        })
    }

    pub fn list_modes(&self) -> &[Mode] {
        &self.modes
    }

    pub fn append_mode(&mut self, mode: Mode) {
        debug!(mode = %mode.id, total = self.modes.len() + 1, "modes: appended");
        self.modes.push(mode);
    }

    pub fn find(&self, id: &ModeId) -> Option<&Mode> {
        self.modes.iter().find(|mode| &mode.id == id)
    }

    pub fn find_by_key(&self, key: &str) -> Option<&Mode> {
        self.modes
            .iter()
            .find(|mode| mode.id.as_str() == key)
            .or_else(|| {
                self.modes
                    .iter()
                    .find(|mode| mode.name.eq_ignore_ascii_case(key))
            })
    }
}

#[cfg(test)]
#[path = "tests/mode_registry_tests.rs"]
mod tests;
