use bevy::prelude::*;

pub mod config;
pub mod fighter;
pub mod fixed_math;
pub mod input;

use config::{GameConfig, GameConfigHandle, GameConfigPlugin};
use fighter::visuals::{arena_to_screen, DEFAULT_PIXELS_PER_UNIT};
use fighter::{fighter_bundle, FighterConfig, FighterPlugin, FighterVisualsPlugin};
use input::{InputPlugin, KeyboardControlled};

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            GameConfigPlugin,
            FighterPlugin,
            InputPlugin,
            FighterVisualsPlugin,
        ))
        .add_systems(Startup, setup_game.after(fighter::systems::init_fighter_config_from_initial));
    }
}

fn setup_game(
    mut commands: Commands,
    fighter_config: Res<FighterConfig>,
    config_handle: Option<Res<GameConfigHandle>>,
    game_configs: Res<Assets<GameConfig>>,
) {
    info!("Game setup started");

    let pixels_per_unit = config_handle
        .and_then(|handle| game_configs.get(&handle.0).map(|config| config.pixels_per_unit))
        .unwrap_or(DEFAULT_PIXELS_PER_UNIT);

    commands.spawn(Camera2d);

    // Floor strip along the bottom edge of the arena
    let arena = fighter_config.arena;
    let width = (arena.right - arena.left).to_f32() * pixels_per_unit;
    let floor_left = arena_to_screen(&fighter_config, Vec2::new(arena.left.to_f32(), arena.bottom.to_f32()), pixels_per_unit);
    commands.spawn((
        Sprite::from_color(Color::srgb(0.3, 0.5, 0.3), Vec2::new(width, 8.0)),
        Transform::from_xyz(floor_left.x + width / 2.0, floor_left.y - 4.0, 0.0),
    ));

    let fighter = commands
        .spawn((fighter_bundle(&fighter_config), KeyboardControlled::new(fighter_config.dash_window)))
        .id();

    info!("Spawned fighter {:?} at {:?}", fighter, fighter_config.spawn);
}
