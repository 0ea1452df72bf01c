use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Active movement mode. Exactly one is active per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementMode {
    #[default]
    None,
    Walk,
    BackWalk,
    Dash,
    BackDash,
    Crouch,
    Jump,
    AirDash,
    BackAirDash,
}

/// Presentation view of [`MovementMode`]: one named flag per mode, at most one set.
///
/// The animation layer only ever reads these flags; it never sees the mode enum.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementFlags {
    pub walking: bool,
    pub back_walking: bool,
    pub dashing: bool,
    pub back_dashing: bool,
    pub crouching: bool,
    pub jumping: bool,
    pub air_dashing: bool,
    pub back_air_dashing: bool,
}

impl MovementFlags {
    /// Flags in a stable order, keyed by the animator parameter they drive.
    pub fn named(&self) -> [(&'static str, bool); 8] {
        [
            ("walking", self.walking),
            ("back_walking", self.back_walking),
            ("dashing", self.dashing),
            ("back_dashing", self.back_dashing),
            ("crouching", self.crouching),
            ("jumping", self.jumping),
            ("air_dashing", self.air_dashing),
            ("back_air_dashing", self.back_air_dashing),
        ]
    }

    pub fn active_count(&self) -> usize {
        self.named().iter().filter(|(_, set)| *set).count()
    }
}

impl From<MovementMode> for MovementFlags {
    fn from(mode: MovementMode) -> Self {
        let mut flags = Self::default();
        match mode {
            MovementMode::None => {}
            MovementMode::Walk => flags.walking = true,
            MovementMode::BackWalk => flags.back_walking = true,
            MovementMode::Dash => flags.dashing = true,
            MovementMode::BackDash => flags.back_dashing = true,
            MovementMode::Crouch => flags.crouching = true,
            MovementMode::Jump => flags.jumping = true,
            MovementMode::AirDash => flags.air_dashing = true,
            MovementMode::BackAirDash => flags.back_air_dashing = true,
        }
        flags
    }
}
