/// Fighter layer - deterministic character movement.
///
/// This module is organized into:
/// - **simulation**: the per-tick movement state machine (pure, no ECS)
/// - **mode**: movement modes and their presentation flags
/// - **resources**: fixed-point config, arena bounds and the tick counter
/// - **components**: ECS wrappers and the floor-contact message
/// - **systems**: fixed-tick systems wiring the state machine into the schedule
/// - **snapshot**: byte snapshots and digests for replay and desync checks
/// - **visuals**: sprites and interpolation (render side only)

use bevy::prelude::*;

use crate::game::config::ConfigLoadSet;

pub mod components;
pub mod mode;
pub mod resources;
pub mod simulation;
pub mod snapshot;
pub mod systems;
pub mod visuals;

#[cfg(test)]
mod tests;

pub use components::*;
pub use mode::{MovementFlags, MovementMode};
pub use resources::{ArenaBounds, FighterConfig, SimTick};
pub use simulation::{ActionLock, CharacterSimulation, LockedAction, TickReport};
pub use snapshot::{FighterSnapshot, SnapshotError};
pub use visuals::FighterVisualsPlugin;

// System sets for organizing execution order
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SimSet {
    Input,      // Sampling devices into intents
    Collision,  // Floor contact detection
    Simulation, // Advancing every fighter one tick
}

/// Main fighter plugin. Headless: safe to use without a window or renderer.
pub struct FighterPlugin;

impl Plugin for FighterPlugin {
    fn build(&self, app: &mut App) {
        // Default, will be overridden by InitialConfig
        app.insert_resource(Time::<Fixed>::from_hz(60.0));

        app.init_resource::<FighterConfig>();
        app.init_resource::<SimTick>();

        app.add_message::<FloorContact>();

        app.configure_sets(FixedUpdate, (
            SimSet::Input,
            SimSet::Collision,
            SimSet::Simulation,
        ).chain());

        app.add_systems(Startup, systems::init_fighter_config_from_initial.after(ConfigLoadSet));

        app.add_systems(FixedUpdate, (
            // Increment tick counter first (before all other systems)
            systems::increment_sim_tick.before(SimSet::Input),
            systems::detect_floor_contact.in_set(SimSet::Collision),
            systems::advance_fighters.in_set(SimSet::Simulation),
            systems::sim_status.after(SimSet::Simulation),
        ));
    }
}
