/// Resource definitions for the fighter simulation.
///
/// [`FighterConfig`] is the fixed-point mirror of [`InitialConfig`]; it is the only
/// config the simulation reads.

use std::time::Duration;

use bevy::prelude::*;

use crate::game::config::{ConfigError, InitialConfig};
use crate::game::fixed_math::{FixedScalar, FixedVector2};
use crate::game::input::DEFAULT_DASH_WINDOW;

/// Number of fixed ticks simulated since startup.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 += 1;
    }
}

/// Axis-aligned movement limits. Positions never leave this box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaBounds {
    pub left: FixedScalar,
    pub right: FixedScalar,
    pub bottom: FixedScalar,
    pub top: FixedScalar,
}

impl ArenaBounds {
    /// Trims a horizontal displacement so `x + dx` stays inside `[left, right]`.
    pub fn clamp_dx(&self, x: FixedScalar, dx: FixedScalar) -> FixedScalar {
        dx.clamp(self.left - x, self.right - x)
    }

    /// Trims a vertical displacement so `y + dy` stays inside `[bottom, top]`.
    pub fn clamp_dy(&self, y: FixedScalar, dy: FixedScalar) -> FixedScalar {
        dy.clamp(self.bottom - y, self.top - y)
    }

    pub fn contains(&self, point: FixedVector2) -> bool {
        (self.left..=self.right).contains(&point.x) && (self.bottom..=self.top).contains(&point.y)
    }

    pub fn center(&self) -> FixedVector2 {
        FixedVector2::new((self.left + self.right) / FixedScalar::from_int(2), (self.bottom + self.top) / FixedScalar::from_int(2))
    }
}

/// Immutable fixed-point movement parameters shared by every fighter.
#[derive(Resource, Clone, Debug, PartialEq, Eq)]
pub struct FighterConfig {
    pub tick_rate: u32,
    /// Seconds per tick, `1 / tick_rate`.
    pub tick_delta: FixedScalar,
    pub walk_speed: FixedScalar,
    pub run_speed: FixedScalar,
    pub jump_speed: FixedScalar,
    pub air_dash_speed: FixedScalar,
    /// Vertical speed set by an air dash.
    pub air_dash_lift: FixedScalar,
    pub accel_rate: FixedScalar,
    pub decel_rate: FixedScalar,
    pub gravity: FixedScalar,
    pub walk_accel: FixedScalar,
    pub cross_up_speed: FixedScalar,
    pub dash_lock_ticks: u32,
    pub air_dash_enabled: bool,
    pub dash_window: Duration,
    pub arena: ArenaBounds,
    pub spawn: FixedVector2,
}

impl Default for FighterConfig {
    fn default() -> Self {
        let tick_rate = 60;
        Self {
            tick_rate,
            tick_delta: FixedScalar::ONE / FixedScalar::from_int(tick_rate as i32),
            walk_speed: FixedScalar::from_int(3),
            run_speed: FixedScalar::from_int(8),
            jump_speed: FixedScalar::from_int(10),
            air_dash_speed: FixedScalar::from_int(5),
            air_dash_lift: FixedScalar::ONE,
            accel_rate: FixedScalar::from_int(20),
            decel_rate: FixedScalar::from_int(10),
            gravity: FixedScalar::from_int(10),
            walk_accel: FixedScalar::from_int(10_000),
            cross_up_speed: FixedScalar::from_int(3),
            dash_lock_ticks: 5,
            air_dash_enabled: false,
            dash_window: DEFAULT_DASH_WINDOW,
            arena: ArenaBounds {
                left: FixedScalar::from_raw(3 << 30),
                right: FixedScalar::from_raw(63 << 30),
                bottom: FixedScalar::from_raw(3 << 31),
                top: FixedScalar::from_raw(21 << 31),
            },
            spawn: FixedVector2::new(FixedScalar::from_int(4), FixedScalar::from_raw(3 << 31)),
        }
    }
}

impl FighterConfig {
    /// Converts the float config once, validating everything the simulation relies on.
    pub fn from_initial(initial: &InitialConfig) -> Result<Self, ConfigError> {
        if initial.tick_rate == 0 || i32::try_from(initial.tick_rate).is_err() {
            return Err(ConfigError::ZeroTickRate);
        }
        let dash_window = Duration::try_from_secs_f64(initial.dash_window_secs)
            .map_err(|_| ConfigError::InvalidDashWindow)?;

        let arena = ArenaBounds {
            left: to_fixed("arena_left", initial.arena_left)?,
            right: to_fixed("arena_right", initial.arena_right)?,
            bottom: to_fixed("arena_bottom", initial.arena_bottom)?,
            top: to_fixed("arena_top", initial.arena_top)?,
        };
        if arena.left > arena.right {
            return Err(ConfigError::InvertedArena { axis: "horizontal" });
        }
        if arena.bottom > arena.top {
            return Err(ConfigError::InvertedArena { axis: "vertical" });
        }
        let spawn = FixedVector2::new(to_fixed("spawn_x", initial.spawn_x)?, to_fixed("spawn_y", initial.spawn_y)?);
        if !arena.contains(spawn) {
            return Err(ConfigError::SpawnOutsideArena);
        }

        Ok(Self {
            tick_rate: initial.tick_rate,
            tick_delta: FixedScalar::ONE / FixedScalar::from_int(initial.tick_rate as i32),
            walk_speed: to_non_negative("walk_speed", initial.walk_speed)?,
            run_speed: to_non_negative("run_speed", initial.run_speed)?,
            jump_speed: to_non_negative("jump_speed", initial.jump_speed)?,
            air_dash_speed: to_non_negative("air_dash_speed", initial.air_dash_speed)?,
            air_dash_lift: to_fixed("air_dash_lift", initial.air_dash_lift)?,
            accel_rate: to_non_negative("accel_rate", initial.accel_rate)?,
            decel_rate: to_non_negative("decel_rate", initial.decel_rate)?,
            gravity: to_non_negative("gravity", initial.gravity)?,
            walk_accel: to_non_negative("walk_accel", initial.walk_accel)?,
            cross_up_speed: to_non_negative("cross_up_speed", initial.cross_up_speed)?,
            dash_lock_ticks: initial.dash_lock_ticks,
            air_dash_enabled: initial.air_dash_enabled,
            dash_window,
            arena,
            spawn,
        })
    }

    /// Timestep in seconds for `Time<Fixed>`. Presentation only.
    pub fn timestep_seconds(&self) -> f64 {
        1.0 / f64::from(self.tick_rate)
    }
}

fn to_fixed(field: &'static str, value: f64) -> Result<FixedScalar, ConfigError> {
    FixedScalar::try_from(value).map_err(|source| ConfigError::Fixed { field, source })
}

fn to_non_negative(field: &'static str, value: f64) -> Result<FixedScalar, ConfigError> {
    let fixed = to_fixed(field, value)?;
    if fixed.is_negative() {
        return Err(ConfigError::Negative { field });
    }
    Ok(fixed)
}
