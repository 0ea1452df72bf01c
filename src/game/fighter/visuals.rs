use bevy::prelude::*;

use crate::game::config::{GameConfig, GameConfigHandle};

use super::components::{Fighter, FighterPositionPrev};
use super::mode::MovementFlags;
use super::resources::FighterConfig;

pub const DEFAULT_PIXELS_PER_UNIT: f32 = 48.0;

/// Fighter body size in arena units.
const BODY_SIZE: Vec2 = Vec2::new(0.75, 1.5);

/// Render-side only: sprites, interpolation and mode tinting. Never feeds back
/// into the simulation.
pub struct FighterVisualsPlugin;

impl Plugin for FighterVisualsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (attach_fighter_sprites, sync_fighter_transforms, tint_by_movement).chain());
    }
}

#[derive(Clone, Copy, Debug)]
struct ViewSettings {
    pixels_per_unit: f32,
    interpolate: bool,
}

impl ViewSettings {
    fn from_assets(handle: Option<&GameConfigHandle>, configs: &Assets<GameConfig>) -> Self {
        handle
            .and_then(|handle| configs.get(&handle.0))
            .map(|config| Self { pixels_per_unit: config.pixels_per_unit, interpolate: config.interpolate_visuals })
            .unwrap_or(Self { pixels_per_unit: DEFAULT_PIXELS_PER_UNIT, interpolate: true })
    }
}

/// Maps an arena position (feet of the fighter) to screen space centred on the arena.
pub fn arena_to_screen(config: &FighterConfig, position: Vec2, pixels_per_unit: f32) -> Vec2 {
    (position - config.arena.center().to_vec2()) * pixels_per_unit
}

fn attach_fighter_sprites(
    mut commands: Commands,
    config_handle: Option<Res<GameConfigHandle>>,
    game_configs: Res<Assets<GameConfig>>,
    query: Query<Entity, Added<Fighter>>,
) {
    let view = ViewSettings::from_assets(config_handle.as_deref(), &game_configs);
    for entity in query.iter() {
        commands.entity(entity).insert((
            Sprite::from_color(mode_color(&MovementFlags::default()), BODY_SIZE * view.pixels_per_unit),
            Transform::default(),
        ));
    }
}

/// Interpolates between the last two simulated positions by the fixed-step overstep.
fn sync_fighter_transforms(
    fixed_time: Res<Time<Fixed>>,
    fighter_config: Res<FighterConfig>,
    config_handle: Option<Res<GameConfigHandle>>,
    game_configs: Res<Assets<GameConfig>>,
    mut query: Query<(&mut Transform, &Fighter, &FighterPositionPrev)>,
) {
    let view = ViewSettings::from_assets(config_handle.as_deref(), &game_configs);
    let alpha = if view.interpolate { fixed_time.overstep_fraction() } else { 1.0 };

    for (mut transform, fighter, prev) in query.iter_mut() {
        let current = fighter.0.position().to_vec2();
        let blended = prev.0.to_vec2().lerp(current, alpha);
        let feet = arena_to_screen(&fighter_config, blended, view.pixels_per_unit);
        let half_height = BODY_SIZE.y * view.pixels_per_unit / 2.0;
        transform.translation = Vec3::new(feet.x, feet.y + half_height, 1.0);
    }
}

fn tint_by_movement(mut query: Query<(&mut Sprite, &MovementFlags), Changed<MovementFlags>>) {
    for (mut sprite, flags) in query.iter_mut() {
        sprite.color = mode_color(flags);
    }
}

fn mode_color(flags: &MovementFlags) -> Color {
    if flags.dashing || flags.back_dashing {
        Color::srgb(1.0, 0.55, 0.1)
    } else if flags.air_dashing || flags.back_air_dashing {
        Color::srgb(1.0, 0.85, 0.2)
    } else if flags.jumping {
        Color::srgb(0.3, 0.6, 1.0)
    } else if flags.crouching {
        Color::srgb(0.55, 0.35, 0.8)
    } else if flags.walking || flags.back_walking {
        Color::srgb(0.3, 0.85, 0.4)
    } else {
        Color::srgb(0.85, 0.85, 0.85)
    }
}
