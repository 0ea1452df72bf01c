/// Component and message definitions for fighter entities.

use bevy::prelude::*;

use crate::game::fixed_math::FixedVector2;
use crate::game::input::InputIntent;

use super::mode::MovementFlags;
use super::resources::FighterConfig;
use super::simulation::CharacterSimulation;

// ============================================================================
// Simulation Components
// ============================================================================

/// Authoritative movement state of one character.
#[derive(Component, Debug, Clone)]
pub struct Fighter(pub CharacterSimulation);

/// Intent consumed by the next tick. Written by the input layer or by a replay.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FighterIntent(pub InputIntent);

/// Position at the start of the last tick, for render interpolation.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FighterPositionPrev(pub FixedVector2);

/// Whether the fighter touched the floor on the previous collision pass.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FloorContactState {
    pub touching: bool,
}

/// Everything a fighter entity needs to take part in the fixed tick.
pub fn fighter_bundle(config: &FighterConfig) -> impl Bundle {
    (
        Fighter(CharacterSimulation::new(config.spawn)),
        FighterIntent::default(),
        FighterPositionPrev(config.spawn),
        MovementFlags::default(),
        FloorContactState::default(),
    )
}

// ============================================================================
// Messages
// ============================================================================

/// The fighter started touching the arena floor this tick.
#[derive(Event, Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorContact {
    pub entity: Entity,
}
