use super::*;
use crate::game::config::{ConfigError, InitialConfig};
use crate::game::fixed_math::{FixedError, FixedScalar, FixedVector2};
use crate::game::input::{Direction, InputIntent};

fn config() -> FighterConfig {
    FighterConfig::default()
}

fn grounded_at(x: i32) -> CharacterSimulation {
    CharacterSimulation::new(FixedVector2::new(FixedScalar::from_int(x), config().arena.bottom))
}

fn hold(direction: Direction) -> InputIntent {
    InputIntent::holding(direction)
}

fn dash_right() -> InputIntent {
    InputIntent { double_tap_right: true, right_pressed: true, ..hold(Direction::Right) }
}

fn dash_left() -> InputIntent {
    InputIntent { double_tap_left: true, left_pressed: true, ..hold(Direction::Left) }
}

fn step(sim: &mut CharacterSimulation, cfg: &FighterConfig, intent: InputIntent) -> TickReport {
    sim.advance(cfg, &intent, false)
}

// ============================================================================
// Grounded movement
// ============================================================================

#[test]
fn test_new_character_is_grounded_and_idle() {
    let sim = grounded_at(4);
    assert!(!sim.is_airborne());
    assert_eq!(sim.mode(), MovementMode::None);
    assert_eq!(sim.velocity(), FixedVector2::ZERO);
    assert_eq!(sim.lock(), None);
    assert!(sim.facing_right());
}

#[test]
fn test_walk_right_reaches_walk_speed_immediately() {
    let cfg = config();
    let mut sim = grounded_at(4);
    let start = sim.position();

    let report = step(&mut sim, &cfg, hold(Direction::Right));

    assert_eq!(report.mode, MovementMode::Walk);
    assert_eq!(sim.velocity().x, cfg.walk_speed);
    assert_eq!(report.position.x, start.x + cfg.walk_speed * cfg.tick_delta);
    assert_eq!(report.position.y, start.y);
    assert!(sim.facing_right());
}

#[test]
fn test_back_walk_moves_left_and_turns_facing() {
    let cfg = config();
    let mut sim = grounded_at(4);

    let report = step(&mut sim, &cfg, hold(Direction::Left));

    assert_eq!(report.mode, MovementMode::BackWalk);
    assert_eq!(sim.velocity().x, -cfg.walk_speed);
    assert!(sim.last_delta().x.is_negative());
    assert!(!sim.facing_right());
}

#[test]
fn test_neutral_decelerates_toward_zero_in_facing_direction() {
    let cfg = config();
    let decel_step = cfg.decel_rate * cfg.tick_delta;

    let mut sim = grounded_at(4);
    step(&mut sim, &cfg, hold(Direction::Right));
    let report = step(&mut sim, &cfg, hold(Direction::Neutral));
    assert_eq!(report.mode, MovementMode::None);
    assert_eq!(sim.velocity().x, cfg.walk_speed - decel_step);

    for _ in 0..30 {
        step(&mut sim, &cfg, hold(Direction::Neutral));
    }
    assert_eq!(sim.velocity().x, FixedScalar::ZERO);

    let mut sim = grounded_at(8);
    step(&mut sim, &cfg, hold(Direction::Left));
    step(&mut sim, &cfg, hold(Direction::Neutral));
    assert_eq!(sim.velocity().x, -cfg.walk_speed + decel_step);
}

#[test]
fn test_crouch_takes_precedence_over_horizontal() {
    let cfg = config();
    let mut sim = grounded_at(4);
    step(&mut sim, &cfg, hold(Direction::Right));

    let report = step(&mut sim, &cfg, InputIntent { double_tap_right: true, ..hold(Direction::DownRight) });

    assert_eq!(report.mode, MovementMode::Crouch);
    assert_eq!(sim.velocity().x, cfg.walk_speed - cfg.decel_rate * cfg.tick_delta);
    assert_eq!(sim.lock(), None);
}

// ============================================================================
// Dash lock
// ============================================================================

#[test]
fn test_dash_locks_for_configured_ticks_ignoring_intent() {
    let cfg = config();
    let accel_step = cfg.accel_rate * cfg.tick_delta;
    let mut sim = grounded_at(4);

    let report = step(&mut sim, &cfg, dash_right());
    assert_eq!(report.mode, MovementMode::Dash);
    assert_eq!(sim.velocity().x, accel_step);
    assert_eq!(sim.lock(), Some(ActionLock { remaining: 5, action: LockedAction::DashRight }));

    // Intent flips around wildly; the lock keeps accelerating right.
    let noise = [hold(Direction::Left), hold(Direction::Up), hold(Direction::Down), dash_left(), hold(Direction::Neutral)];
    for (i, intent) in noise.into_iter().enumerate() {
        let before = sim.position().x;
        let report = step(&mut sim, &cfg, intent);
        assert_eq!(report.mode, MovementMode::Dash, "locked tick {}", i);
        assert!(!report.airborne);
        assert!(report.position.x > before);
    }
    assert_eq!(sim.lock(), None);
    assert_eq!(sim.velocity().x, FixedScalar::from_int(6) * accel_step);

    // Lock expired: normal branching resumes.
    let report = step(&mut sim, &cfg, hold(Direction::Left));
    assert_eq!(report.mode, MovementMode::BackWalk);
    assert_eq!(sim.velocity().x, -cfg.walk_speed);
}

#[test]
fn test_sustained_dash_reaches_run_speed_without_rearming() {
    let cfg = config();
    let mut sim = grounded_at(1);

    step(&mut sim, &cfg, dash_right());
    for _ in 0..5 {
        step(&mut sim, &cfg, dash_right());
    }
    assert_eq!(sim.lock(), None);

    for _ in 0..40 {
        let report = step(&mut sim, &cfg, dash_right());
        assert_eq!(report.mode, MovementMode::Dash);
        assert_eq!(sim.lock(), None);
    }
    assert_eq!(sim.velocity().x, cfg.run_speed);
}

#[test]
fn test_back_dash_mirrors_dash() {
    let cfg = config();
    let mut sim = grounded_at(12);

    let report = step(&mut sim, &cfg, dash_left());
    assert_eq!(report.mode, MovementMode::BackDash);
    assert_eq!(sim.velocity().x, -(cfg.accel_rate * cfg.tick_delta));
    assert_eq!(sim.lock(), Some(ActionLock { remaining: 5, action: LockedAction::DashLeft }));

    for _ in 0..5 {
        assert_eq!(step(&mut sim, &cfg, hold(Direction::Right)).mode, MovementMode::BackDash);
    }
    assert_eq!(sim.lock(), None);

    // Still back-dashing: holding the double tap does not re-arm.
    step(&mut sim, &cfg, dash_left());
    assert_eq!(sim.lock(), None);
}

#[test]
fn test_zero_lock_ticks_never_locks() {
    let cfg = FighterConfig { dash_lock_ticks: 0, ..config() };
    let mut sim = grounded_at(4);

    assert_eq!(step(&mut sim, &cfg, dash_right()).mode, MovementMode::Dash);
    assert_eq!(sim.lock(), None);
    assert_eq!(step(&mut sim, &cfg, hold(Direction::Left)).mode, MovementMode::BackWalk);
}

// ============================================================================
// Jumping and falling
// ============================================================================

#[test]
fn test_jump_sets_vertical_speed_without_moving() {
    let cfg = config();
    let mut sim = grounded_at(4);
    let start = sim.position();

    let report = step(&mut sim, &cfg, hold(Direction::Up));

    assert_eq!(report.mode, MovementMode::Jump);
    assert!(report.airborne);
    assert_eq!(report.position, start);
    assert_eq!(sim.velocity().y, cfg.jump_speed);

    let report = step(&mut sim, &cfg, hold(Direction::Neutral));
    let vy = cfg.jump_speed - cfg.gravity * cfg.tick_delta;
    assert_eq!(sim.velocity().y, vy);
    assert_eq!(report.position.y, start.y + vy * cfg.tick_delta);
}

#[test]
fn test_jump_arc_lands_exactly_on_floor() {
    let cfg = config();
    let mut sim = grounded_at(4);
    step(&mut sim, &cfg, hold(Direction::Up));

    let mut peak = sim.position().y;
    let mut ticks = 0;
    while sim.is_airborne() {
        // Ground branching is ignored while airborne.
        let report = step(&mut sim, &cfg, hold(Direction::Right));
        assert!(cfg.arena.contains(report.position));
        assert_eq!(report.mode, MovementMode::Jump);
        assert_eq!(sim.velocity().x, FixedScalar::ZERO);
        assert!(sim.velocity().y >= -cfg.jump_speed);
        peak = peak.max(report.position.y);
        ticks += 1;
        assert!(ticks < 1_000, "never landed");
    }

    assert!(peak > cfg.arena.bottom + FixedScalar::from_int(4));
    assert_eq!(sim.position().y, cfg.arena.bottom);
    assert_eq!(sim.velocity().y, FixedScalar::ZERO);
    // Mode clears once the floor contact arrives.
    assert_eq!(sim.mode(), MovementMode::Jump);
    let report = sim.advance(&cfg, &hold(Direction::Neutral), true);
    assert_eq!(report.mode, MovementMode::None);
    assert!(!report.airborne);
}

#[test]
fn test_cross_up_jump_reverses_horizontal_speed() {
    let cfg = config();

    // Moving left, jumping up-right crosses up.
    let mut sim = grounded_at(8);
    step(&mut sim, &cfg, hold(Direction::Left));
    step(&mut sim, &cfg, hold(Direction::UpRight));
    assert_eq!(sim.velocity().x, cfg.cross_up_speed);

    // Facing right, jumping up-left crosses up the other way.
    let mut sim = grounded_at(8);
    step(&mut sim, &cfg, hold(Direction::Right));
    step(&mut sim, &cfg, hold(Direction::UpLeft));
    assert_eq!(sim.velocity().x, -cfg.cross_up_speed);

    // Jumping toward the facing side keeps momentum.
    let mut sim = grounded_at(8);
    step(&mut sim, &cfg, hold(Direction::UpRight));
    assert_eq!(sim.velocity().x, FixedScalar::ZERO);
}

#[test]
fn test_floor_contact_mid_air_grounds_immediately() {
    let cfg = config();
    let mut sim = grounded_at(4);
    step(&mut sim, &cfg, hold(Direction::Up));
    for _ in 0..5 {
        step(&mut sim, &cfg, hold(Direction::Neutral));
    }
    assert!(sim.is_airborne());

    let report = sim.advance(&cfg, &hold(Direction::Right), true);
    assert!(!report.airborne);
    assert_eq!(report.mode, MovementMode::Walk);
}

#[test]
fn test_floor_contact_keeps_locked_mode() {
    let cfg = config();
    let mut sim = grounded_at(4);
    step(&mut sim, &cfg, dash_right());

    let report = sim.advance(&cfg, &hold(Direction::Neutral), true);
    assert_eq!(report.mode, MovementMode::Dash);
    assert_eq!(sim.lock().map(|lock| lock.remaining), Some(4));
}

// ============================================================================
// Air dash
// ============================================================================

#[test]
fn test_air_dash_is_disabled_by_default() {
    let cfg = config();
    let mut sim = grounded_at(4);
    step(&mut sim, &cfg, hold(Direction::Up));

    let report = step(&mut sim, &cfg, dash_right());
    assert_eq!(report.mode, MovementMode::Jump);
    assert_eq!(sim.velocity().x, FixedScalar::ZERO);
}

#[test]
fn test_air_dash_sets_run_speed_and_lift() {
    let cfg = FighterConfig { air_dash_enabled: true, ..config() };
    let mut sim = grounded_at(4);
    step(&mut sim, &cfg, hold(Direction::Up));

    let report = step(&mut sim, &cfg, dash_right());
    assert_eq!(report.mode, MovementMode::AirDash);
    assert_eq!(sim.velocity().x, cfg.run_speed);
    assert_eq!(sim.velocity().y, cfg.air_dash_lift);

    // Already air dashing: only gravity applies.
    step(&mut sim, &cfg, dash_right());
    assert_eq!(sim.velocity().x, cfg.run_speed);
    assert_eq!(sim.velocity().y, cfg.air_dash_lift - cfg.gravity * cfg.tick_delta);

    let report = step(&mut sim, &cfg, dash_left());
    assert_eq!(report.mode, MovementMode::BackAirDash);
    assert_eq!(sim.velocity().x, -cfg.run_speed);
}

#[test]
fn test_air_dash_stacks_on_existing_momentum() {
    let cfg = FighterConfig { air_dash_enabled: true, ..config() };
    let mut sim = grounded_at(1);
    for _ in 0..30 {
        step(&mut sim, &cfg, dash_right());
    }
    assert_eq!(sim.velocity().x, cfg.run_speed);

    step(&mut sim, &cfg, hold(Direction::UpRight));
    assert_eq!(sim.velocity().x, cfg.run_speed);

    step(&mut sim, &cfg, dash_right());
    assert_eq!(sim.velocity().x, cfg.run_speed + cfg.air_dash_speed);
}

// ============================================================================
// Arena bounds
// ============================================================================

#[test]
fn test_walls_clamp_displacement_exactly() {
    let cfg = config();

    let mut sim = grounded_at(14);
    for _ in 0..400 {
        let report = step(&mut sim, &cfg, dash_right());
        assert!(cfg.arena.contains(report.position));
    }
    assert_eq!(sim.position().x, cfg.arena.right);

    let mut sim = grounded_at(2);
    for _ in 0..400 {
        step(&mut sim, &cfg, hold(Direction::Left));
    }
    assert_eq!(sim.position().x, cfg.arena.left);
}

#[test]
fn test_arena_clamp_helpers() {
    let arena = config().arena;
    let x = FixedScalar::from_int(15);
    assert_eq!(arena.clamp_dx(x, FixedScalar::from_int(2)), arena.right - x);
    assert_eq!(arena.clamp_dx(x, -FixedScalar::ONE), -FixedScalar::ONE);
    assert_eq!(arena.clamp_dy(arena.bottom, -FixedScalar::ONE), FixedScalar::ZERO);
    assert!(arena.contains(FixedVector2::new(arena.left, arena.top)));
    assert!(!arena.contains(FixedVector2::new(arena.left - FixedScalar::EPSILON, arena.top)));
    assert_eq!(arena.center(), FixedVector2::new(FixedScalar::from_raw(33 << 30), FixedScalar::from_int(6)));
}

// ============================================================================
// Flags, snapshots, config
// ============================================================================

#[test]
fn test_flags_are_mutually_exclusive() {
    let modes = [
        MovementMode::Walk,
        MovementMode::BackWalk,
        MovementMode::Dash,
        MovementMode::BackDash,
        MovementMode::Crouch,
        MovementMode::Jump,
        MovementMode::AirDash,
        MovementMode::BackAirDash,
    ];
    for (i, mode) in modes.into_iter().enumerate() {
        let flags = MovementFlags::from(mode);
        assert_eq!(flags.active_count(), 1, "{:?}", mode);
        assert!(flags.named()[i].1, "{:?}", mode);
    }
    assert_eq!(MovementFlags::from(MovementMode::None).active_count(), 0);
    assert_eq!(MovementFlags::from(MovementMode::Crouch).named()[4].0, "crouching");
}

#[test]
fn test_snapshot_round_trip_and_rollback() {
    let cfg = config();
    let mut sim = grounded_at(4);
    step(&mut sim, &cfg, dash_right());
    step(&mut sim, &cfg, hold(Direction::Up));

    let saved = sim.snapshot().unwrap();
    assert_eq!(saved.restore().unwrap(), sim);

    let script = [dash_right(), hold(Direction::Up), hold(Direction::Left), hold(Direction::Neutral), hold(Direction::Down)];
    for intent in script {
        step(&mut sim, &cfg, intent);
    }
    let forward = sim.snapshot().unwrap();
    assert_ne!(forward.digest, saved.digest);

    let mut replayed = saved.restore().unwrap();
    for intent in script {
        step(&mut replayed, &cfg, intent);
    }
    assert_eq!(replayed.snapshot().unwrap().digest, forward.digest);
    assert_eq!(forward.digest_hex().len(), 64);
}

#[test]
fn test_corrupt_snapshot_is_rejected() {
    let mut snapshot = grounded_at(4).snapshot().unwrap();
    snapshot.bytes[0] ^= 0xFF;
    assert!(matches!(snapshot.restore(), Err(SnapshotError::Corrupt { .. })));
}

#[test]
fn test_config_from_default_initial_matches_default() {
    let converted = FighterConfig::from_initial(&InitialConfig::default()).unwrap();
    assert_eq!(converted, FighterConfig::default());
    assert_eq!(converted.tick_delta.raw(), 71_582_788);
}

#[test]
fn test_config_validation() {
    let base = InitialConfig::default();

    let negative = InitialConfig { run_speed: -1.0, ..base.clone() };
    assert_eq!(FighterConfig::from_initial(&negative), Err(ConfigError::Negative { field: "run_speed" }));

    let zero_rate = InitialConfig { tick_rate: 0, ..base.clone() };
    assert_eq!(FighterConfig::from_initial(&zero_rate), Err(ConfigError::ZeroTickRate));

    let inverted = InitialConfig { arena_left: 20.0, ..base.clone() };
    assert_eq!(FighterConfig::from_initial(&inverted), Err(ConfigError::InvertedArena { axis: "horizontal" }));

    let outside = InitialConfig { spawn_y: 0.0, ..base.clone() };
    assert_eq!(FighterConfig::from_initial(&outside), Err(ConfigError::SpawnOutsideArena));

    let nan = InitialConfig { gravity: f64::NAN, ..base.clone() };
    assert_eq!(
        FighterConfig::from_initial(&nan),
        Err(ConfigError::Fixed { field: "gravity", source: FixedError::NotFinite })
    );

    let window = InitialConfig { dash_window_secs: -0.1, ..base };
    assert_eq!(FighterConfig::from_initial(&window), Err(ConfigError::InvalidDashWindow));
}
