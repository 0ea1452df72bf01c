/// Deterministic single-character movement state machine.
///
/// One call to [`CharacterSimulation::advance`] is one fixed tick. All state is
/// fixed point; the only inputs are the config, the classified intent and
/// whether a floor contact was reported since the previous tick.

use serde::{Deserialize, Serialize};

use crate::game::fixed_math::{FixedScalar, FixedVector2};
use crate::game::input::{Direction, InputIntent};

use super::mode::MovementMode;
use super::resources::FighterConfig;

/// Action replayed every tick while an [`ActionLock`] is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockedAction {
    DashRight,
    DashLeft,
}

/// Commits the character to `action` for `remaining` more ticks, ignoring intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionLock {
    pub remaining: u32,
    pub action: LockedAction,
}

/// Externally visible outcome of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub position: FixedVector2,
    pub mode: MovementMode,
    pub airborne: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterSimulation {
    position: FixedVector2,
    velocity: FixedVector2,
    last_delta: FixedVector2,
    airborne: bool,
    mode: MovementMode,
    lock: Option<ActionLock>,
}

impl CharacterSimulation {
    /// Grounded and at rest at `position`.
    pub fn new(position: FixedVector2) -> Self {
        Self {
            position,
            velocity: FixedVector2::ZERO,
            last_delta: FixedVector2::ZERO,
            airborne: false,
            mode: MovementMode::None,
            lock: None,
        }
    }

    pub fn position(&self) -> FixedVector2 {
        self.position
    }

    pub fn velocity(&self) -> FixedVector2 {
        self.velocity
    }

    /// Displacement applied by the previous tick.
    pub fn last_delta(&self) -> FixedVector2 {
        self.last_delta
    }

    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub fn lock(&self) -> Option<ActionLock> {
        self.lock
    }

    /// Facing follows the last horizontal movement; standing still counts as right.
    pub fn facing_right(&self) -> bool {
        !self.last_delta.x.is_negative()
    }

    pub fn report(&self) -> TickReport {
        TickReport {
            position: self.position,
            mode: self.mode,
            airborne: self.airborne,
        }
    }

    pub fn advance(&mut self, config: &FighterConfig, intent: &InputIntent, floor_contact: bool) -> TickReport {
        let start = self.position;

        if floor_contact {
            self.land();
        }

        if let Some(lock) = self.lock.take() {
            self.run_locked(config, lock.action);
            if lock.remaining > 1 {
                self.lock = Some(ActionLock { remaining: lock.remaining - 1, ..lock });
            }
        } else if self.airborne {
            self.fall(config);
            if self.airborne && config.air_dash_enabled {
                self.try_air_dash(config, intent);
            }
        } else {
            self.grounded(config, intent);
        }

        self.last_delta = self.position - start;
        self.report()
    }

    fn land(&mut self) {
        self.airborne = false;
        if self.lock.is_none() {
            self.mode = MovementMode::None;
        }
    }

    fn grounded(&mut self, config: &FighterConfig, intent: &InputIntent) {
        if intent.hold_up {
            self.jump(config, intent.direction);
        } else if intent.direction.contains_down() {
            self.mode = MovementMode::Crouch;
            self.halt(config);
        } else if intent.double_tap_right {
            if self.mode != MovementMode::Dash {
                self.mode = MovementMode::Dash;
                self.arm_lock(config, LockedAction::DashRight);
            }
            self.run_locked(config, LockedAction::DashRight);
        } else if intent.direction == Direction::Right {
            self.mode = MovementMode::Walk;
            self.accelerate_right(config, config.walk_speed, config.walk_accel);
        } else if intent.double_tap_left {
            if self.mode != MovementMode::BackDash {
                self.mode = MovementMode::BackDash;
                self.arm_lock(config, LockedAction::DashLeft);
            }
            self.run_locked(config, LockedAction::DashLeft);
        } else if intent.direction == Direction::Left {
            self.mode = MovementMode::BackWalk;
            self.accelerate_left(config, config.walk_speed, config.walk_accel);
        } else {
            self.mode = MovementMode::None;
            self.halt(config);
        }
    }

    fn arm_lock(&mut self, config: &FighterConfig, action: LockedAction) {
        if config.dash_lock_ticks > 0 {
            self.lock = Some(ActionLock { remaining: config.dash_lock_ticks, action });
        }
    }

    fn run_locked(&mut self, config: &FighterConfig, action: LockedAction) {
        match action {
            LockedAction::DashRight => self.accelerate_right(config, config.run_speed, config.accel_rate),
            LockedAction::DashLeft => self.accelerate_left(config, config.run_speed, config.accel_rate),
        }
    }

    fn jump(&mut self, config: &FighterConfig, direction: Direction) {
        self.mode = MovementMode::Jump;
        self.velocity.y = config.jump_speed;
        // Cross-up: jumping over toward the side we are not facing.
        if direction == Direction::UpRight && !self.facing_right() {
            self.velocity.x = config.cross_up_speed;
        } else if direction == Direction::UpLeft && self.facing_right() {
            self.velocity.x = -config.cross_up_speed;
        }
        self.airborne = true;
    }

    fn fall(&mut self, config: &FighterConfig) {
        let terminal = -config.jump_speed;
        self.velocity.y = (self.velocity.y - config.gravity * config.tick_delta).max(terminal);

        let dx = config.arena.clamp_dx(self.position.x, self.velocity.x * config.tick_delta);
        let dy = config.arena.clamp_dy(self.position.y, self.velocity.y * config.tick_delta);
        let landed = dy == config.arena.bottom - self.position.y;

        self.position = self.position + FixedVector2::new(dx, dy);
        if landed {
            self.airborne = false;
            self.velocity.y = FixedScalar::ZERO;
        }
    }

    fn try_air_dash(&mut self, config: &FighterConfig, intent: &InputIntent) {
        if intent.double_tap_right && self.mode != MovementMode::AirDash {
            self.velocity.x = if self.velocity.x >= config.air_dash_speed {
                self.velocity.x + config.air_dash_speed
            } else {
                config.run_speed
            };
            self.velocity.y = config.air_dash_lift;
            self.mode = MovementMode::AirDash;
        } else if intent.double_tap_left && self.mode != MovementMode::BackAirDash {
            self.velocity.x = if self.velocity.x <= -config.air_dash_speed {
                self.velocity.x - config.air_dash_speed
            } else {
                -config.run_speed
            };
            self.velocity.y = config.air_dash_lift;
            self.mode = MovementMode::BackAirDash;
        }
    }

    fn halt(&mut self, config: &FighterConfig) {
        if self.facing_right() {
            self.decelerate_right(config);
        } else {
            self.decelerate_left(config);
        }
    }

    fn accelerate_right(&mut self, config: &FighterConfig, top_speed: FixedScalar, rate: FixedScalar) {
        let next = self.velocity.x + rate * config.tick_delta;
        self.velocity.x = next.clamp(FixedScalar::ZERO, top_speed);
        self.shift_horizontally(config);
    }

    fn accelerate_left(&mut self, config: &FighterConfig, top_speed: FixedScalar, rate: FixedScalar) {
        let next = self.velocity.x - rate * config.tick_delta;
        self.velocity.x = next.clamp(-top_speed, FixedScalar::ZERO);
        self.shift_horizontally(config);
    }

    fn decelerate_right(&mut self, config: &FighterConfig) {
        let step = config.decel_rate * config.tick_delta;
        self.velocity.x = if self.velocity.x > step { self.velocity.x - step } else { FixedScalar::ZERO };
        self.shift_horizontally(config);
    }

    fn decelerate_left(&mut self, config: &FighterConfig) {
        let step = config.decel_rate * config.tick_delta;
        self.velocity.x = if self.velocity.x < -step { self.velocity.x + step } else { FixedScalar::ZERO };
        self.shift_horizontally(config);
    }

    fn shift_horizontally(&mut self, config: &FighterConfig) {
        let dx = config.arena.clamp_dx(self.position.x, self.velocity.x * config.tick_delta);
        self.position.x = self.position.x + dx;
    }
}
