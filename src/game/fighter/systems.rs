/// Fixed-tick systems driving [`CharacterSimulation`] inside the ECS.
///
/// Per tick: increment the tick counter, sample input, detect floor contacts,
/// then advance every fighter exactly once.

use bevy::prelude::*;

use crate::game::config::InitialConfig;

use super::components::*;
use super::mode::MovementFlags;
use super::resources::*;

// ============================================================================
// Configuration
// ============================================================================

/// Converts [`InitialConfig`] into the fixed-point [`FighterConfig`] and sets the tick rate.
pub fn init_fighter_config_from_initial(
    mut fixed_time: ResMut<Time<Fixed>>,
    mut fighter_config: ResMut<FighterConfig>,
    initial_config: Option<Res<InitialConfig>>,
) {
    let config = initial_config.as_deref().cloned().unwrap_or_else(|| {
        warn!("InitialConfig not found, using defaults");
        InitialConfig::default()
    });

    match FighterConfig::from_initial(&config) {
        Ok(converted) => *fighter_config = converted,
        Err(e) => {
            error!("Invalid initial config: {}", e);
            error!("Using default FighterConfig");
            *fighter_config = FighterConfig::default();
        }
    }

    fixed_time.set_timestep_seconds(fighter_config.timestep_seconds());
    info!(
        "FighterConfig ready: {} Hz, walk {}, run {}, jump {}, arena x [{}, {}] y [{}, {}]",
        fighter_config.tick_rate,
        fighter_config.walk_speed,
        fighter_config.run_speed,
        fighter_config.jump_speed,
        fighter_config.arena.left,
        fighter_config.arena.right,
        fighter_config.arena.bottom,
        fighter_config.arena.top,
    );
}

// ============================================================================
// Tick
// ============================================================================

pub fn increment_sim_tick(mut tick: ResMut<SimTick>) {
    tick.increment();
}

/// Reports when a fighter starts touching the arena floor.
///
/// Only the rising edge produces a [`FloorContact`]; standing on the floor is not
/// a new contact every tick.
pub fn detect_floor_contact(
    config: Res<FighterConfig>,
    mut query: Query<(Entity, &Fighter, &mut FloorContactState)>,
    mut contacts: MessageWriter<FloorContact>,
) {
    for (entity, fighter, mut state) in query.iter_mut() {
        let touching = fighter.0.position().y <= config.arena.bottom;
        if touching && !state.touching {
            contacts.write(FloorContact { entity });
        }
        state.touching = touching;
    }
}

/// Advances every fighter one tick and publishes the result to presentation components.
pub fn advance_fighters(
    config: Res<FighterConfig>,
    tick: Res<SimTick>,
    mut contacts: MessageReader<FloorContact>,
    mut query: Query<(Entity, &mut Fighter, &FighterIntent, &mut FighterPositionPrev, &mut MovementFlags)>,
) {
    let touched: Vec<Entity> = contacts.read().map(|contact| contact.entity).collect();

    for (entity, mut fighter, intent, mut prev, mut flags) in query.iter_mut() {
        let before = fighter.0.mode();
        prev.0 = fighter.0.position();

        let report = fighter.0.advance(&config, &intent.0, touched.contains(&entity));

        if report.mode != before {
            debug!("[TICK {}] {:?}: {:?} -> {:?} at {:?}", tick.0, entity, before, report.mode, report.position);
        }
        *flags = MovementFlags::from(report.mode);
    }
}

/// Log fighter state periodically
pub fn sim_status(
    #[allow(unused_variables)] tick: Res<SimTick>,
    #[allow(unused_variables)] query: Query<(Entity, &Fighter)>,
) {
    use crate::profile_log;

    profile_log!(tick, "[SIM STATUS] Tick: {} | {}", tick.0, query
        .iter()
        .map(|(entity, fighter)| {
            let digest = fighter.0.snapshot().map(|s| s.digest_hex()).unwrap_or_else(|e| e.to_string());
            format!("{:?} {:?} digest {}", entity, fighter.0.report(), digest)
        })
        .collect::<Vec<_>>()
        .join(" | "));
}
