use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::fixed_math::{FixedError, FixedScalar};

pub const INITIAL_CONFIG_PATH: &str = "assets/initial_config.ron";

/// Static configuration loaded once at startup. These values define the
/// character's physics and the arena. Changing them mid-match would break
/// determinism, so they are converted to fixed point exactly once.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InitialConfig {
    // Simulation clock
    pub tick_rate: u32,

    // Movement (units per second, rates in units per second squared)
    pub walk_speed: f64,
    pub run_speed: f64,
    pub jump_speed: f64,
    pub air_dash_speed: f64,
    pub air_dash_lift: f64,
    pub accel_rate: f64,
    pub decel_rate: f64,
    pub gravity: f64,
    pub walk_accel: f64,
    pub cross_up_speed: f64,
    pub dash_lock_ticks: u32,
    pub air_dash_enabled: bool,

    // Input timing (wall clock, not simulated)
    pub dash_window_secs: f64,

    // Arena
    pub arena_left: f64,
    pub arena_right: f64,
    pub arena_bottom: f64,
    pub arena_top: f64,
    pub spawn_x: f64,
    pub spawn_y: f64,
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            walk_speed: 3.0,
            run_speed: 8.0,
            jump_speed: 10.0,
            air_dash_speed: 5.0,
            air_dash_lift: 1.0,
            accel_rate: 20.0,
            decel_rate: 10.0,
            gravity: 10.0,
            walk_accel: 10_000.0,
            cross_up_speed: 3.0,
            dash_lock_ticks: 5,
            air_dash_enabled: false,
            dash_window_secs: 0.2,
            arena_left: 0.75,
            arena_right: 15.75,
            arena_bottom: 1.5,
            arena_top: 10.5,
            spawn_x: 4.0,
            spawn_y: 1.5,
        }
    }
}

/// Reasons an [`InitialConfig`] cannot become a simulation config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("`{field}` cannot be represented in fixed point: {source}")]
    Fixed {
        field: &'static str,
        #[source]
        source: FixedError,
    },
    #[error("`{field}` must not be negative")]
    Negative { field: &'static str },
    #[error("tick rate must be positive")]
    ZeroTickRate,
    #[error("arena {axis} bounds are inverted")]
    InvertedArena { axis: &'static str },
    #[error("spawn point lies outside the arena")]
    SpawnOutsideArena,
    #[error("dash window must be a finite, non-negative number of seconds")]
    InvalidDashWindow,
}

/// Key layout for the four movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    pub up: KeyCode,
    pub down: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: KeyCode::KeyW,
            down: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
        }
    }
}

/// Runtime configuration that can be hot-reloaded during gameplay.
/// Only settings that don't affect determinism live here (controls, presentation).
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug)]
pub struct GameConfig {
    // Controls (hot-reloadable)
    pub key_up: KeyCode,
    pub key_down: KeyCode,
    pub key_left: KeyCode,
    pub key_right: KeyCode,

    // Presentation (hot-reloadable)
    pub pixels_per_unit: f32,
    pub interpolate_visuals: bool,
}

impl GameConfig {
    pub fn key_bindings(&self) -> KeyBindings {
        KeyBindings {
            up: self.key_up,
            down: self.key_down,
            left: self.key_left,
            right: self.key_right,
        }
    }
}

#[derive(Resource)]
pub struct GameConfigHandle(pub Handle<GameConfig>);

/// Startup systems that make [`InitialConfig`] and [`GameConfigHandle`] available.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct ConfigLoadSet;

pub struct GameConfigPlugin;

impl Plugin for GameConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<GameConfig>::new(&["game_config.ron"]))
           .add_systems(Startup, (load_initial_config, setup_runtime_config).chain().in_set(ConfigLoadSet))
           .add_systems(Update, log_runtime_config_reload);
    }
}

/// Parses the static config. Missing fields fall back to their defaults.
pub fn parse_initial_config(contents: &str) -> Result<InitialConfig, ron::error::SpannedError> {
    ron::from_str::<InitialConfig>(contents)
}

/// Load static initial configuration synchronously at startup.
/// This must complete before any game state that depends on these values.
fn load_initial_config(mut commands: Commands) {
    match std::fs::read_to_string(INITIAL_CONFIG_PATH) {
        Ok(contents) => {
            match parse_initial_config(&contents) {
                Ok(config) => {
                    info!("Loaded initial config from {}", INITIAL_CONFIG_PATH);
                    commands.insert_resource(config);
                }
                Err(e) => {
                    error!("Failed to parse initial config: {}", e);
                    error!("Using default InitialConfig");
                    commands.insert_resource(InitialConfig::default());
                }
            }
        }
        Err(e) => {
            error!("Failed to read {}: {}", INITIAL_CONFIG_PATH, e);
            error!("Using default InitialConfig");
            commands.insert_resource(InitialConfig::default());
        }
    }
}

/// Load runtime configuration asynchronously (can be hot-reloaded).
fn setup_runtime_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load("game_config.ron");
    commands.insert_resource(GameConfigHandle(handle));
}

/// Bindings are read straight from the asset every tick, so a reload only needs reporting.
fn log_runtime_config_reload(
    config_handle: Option<Res<GameConfigHandle>>,
    game_configs: Res<Assets<GameConfig>>,
    mut events: MessageReader<AssetEvent<GameConfig>>,
) {
    let Some(config_handle) = config_handle else {
        return;
    };
    for event in events.read() {
        if event.is_modified(config_handle.0.id()) || event.is_loaded_with_dependencies(config_handle.0.id()) {
            if let Some(config) = game_configs.get(&config_handle.0) {
                info!("Runtime config applied: bindings {:?}", config.key_bindings());
            }
        }
    }
}
