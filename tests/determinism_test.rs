use bevy::prelude::*;
use brawler::game::fighter::{fighter_bundle, CharacterSimulation, Fighter, FighterConfig, FighterIntent, FighterPlugin};
use brawler::game::input::{Direction, InputIntent};

const DIRECTIONS: [Direction; 9] = [
    Direction::Neutral,
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::UpLeft,
    Direction::UpRight,
    Direction::DownLeft,
    Direction::DownRight,
];

/// Input script with runs of held directions, the way a player actually presses keys.
fn input_script(seed: u64, len: usize) -> Vec<InputIntent> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut script = Vec::with_capacity(len);
    while script.len() < len {
        let direction = DIRECTIONS[rng.usize(..DIRECTIONS.len())];
        let dash = rng.u8(..5) == 0;
        let intent = InputIntent {
            double_tap_left: dash && direction == Direction::Left,
            double_tap_right: dash && direction == Direction::Right,
            ..InputIntent::holding(direction)
        };
        for _ in 0..rng.usize(1..20) {
            script.push(intent);
        }
    }
    script.truncate(len);
    script
}

fn fighter_app() -> (App, Entity) {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(FighterPlugin);
    app.update();
    // Startup has converted the (default) initial config; layer test overrides on top.
    app.insert_resource(FighterConfig { air_dash_enabled: true, ..FighterConfig::default() });

    let config = app.world().resource::<FighterConfig>().clone();
    let fighter = app.world_mut().spawn(fighter_bundle(&config)).id();
    (app, fighter)
}

fn digest(app: &App, fighter: Entity) -> blake3::Hash {
    app.world().get::<Fighter>(fighter).unwrap().0.snapshot().unwrap().digest
}

#[test]
fn test_identical_scripts_produce_identical_state() {
    let script = input_script(42, 1_200);
    let (mut app1, fighter1) = fighter_app();
    let (mut app2, fighter2) = fighter_app();

    for (tick, intent) in script.iter().enumerate() {
        for (app, fighter) in [(&mut app1, fighter1), (&mut app2, fighter2)] {
            app.world_mut().get_mut::<FighterIntent>(fighter).unwrap().0 = *intent;
            app.world_mut().run_schedule(FixedUpdate);
        }
        assert_eq!(digest(&app1, fighter1), digest(&app2, fighter2), "desync at tick {}", tick);
    }
}

#[test]
fn test_ecs_and_headless_simulation_agree() {
    let script = input_script(7, 600);
    let (mut app, fighter) = fighter_app();
    let config = app.world().resource::<FighterConfig>().clone();
    let mut headless = CharacterSimulation::new(config.spawn);
    let mut touching = false;

    for (tick, intent) in script.iter().enumerate() {
        app.world_mut().get_mut::<FighterIntent>(fighter).unwrap().0 = *intent;
        app.world_mut().run_schedule(FixedUpdate);

        // Same rule as the collision pass: contact on the rising edge of touching the floor.
        let now_touching = headless.position().y <= config.arena.bottom;
        let contact = now_touching && !touching;
        touching = now_touching;
        headless.advance(&config, intent, contact);

        let ecs = &app.world().get::<Fighter>(fighter).unwrap().0;
        assert_eq!(ecs, &headless, "diverged at tick {}", tick);
    }
}

#[test]
fn test_replay_from_snapshot_reproduces_state() {
    let config = FighterConfig::default();
    let script = input_script(1234, 900);
    let mut live = CharacterSimulation::new(config.spawn);

    let mut saved = None;
    for (tick, intent) in script.iter().enumerate() {
        if tick == 450 {
            saved = Some(live.snapshot().unwrap());
        }
        live.advance(&config, intent, false);
    }

    let mut replayed = saved.unwrap().restore().unwrap();
    for intent in &script[450..] {
        replayed.advance(&config, intent, false);
    }

    assert_eq!(replayed, live);
    assert_eq!(replayed.snapshot().unwrap().digest, live.snapshot().unwrap().digest);
}

#[test]
fn test_different_scripts_diverge() {
    let config = FighterConfig::default();
    let mut a = CharacterSimulation::new(config.spawn);
    let mut b = CharacterSimulation::new(config.spawn);

    a.advance(&config, &InputIntent::holding(Direction::Right), false);
    b.advance(&config, &InputIntent::holding(Direction::Left), false);

    assert_ne!(a.snapshot().unwrap().digest, b.snapshot().unwrap().digest);
}
