/// Input layer - keyboard sampling and intent classification.
///
/// - **classifier**: pure raw-keys to [`InputIntent`] classification
/// - keyboard sampling system feeding [`FighterIntent`] each fixed tick

use std::time::Duration;

use bevy::prelude::*;

use crate::game::config::{GameConfig, GameConfigHandle, KeyBindings};
use crate::game::fighter::{FighterIntent, SimSet};

mod classifier;


pub use classifier::{Direction, InputClassifier, InputIntent, RawInput, DEFAULT_DASH_WINDOW};

/// Marks a fighter driven by the local keyboard. Owns that fighter's classifier state.
#[derive(Component, Debug, Clone, Default)]
pub struct KeyboardControlled {
    pub classifier: InputClassifier,
}

impl KeyboardControlled {
    pub fn new(dash_window: Duration) -> Self {
        Self { classifier: InputClassifier::new(dash_window) }
    }
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ButtonInput<KeyCode>>()
           .add_systems(FixedUpdate, sample_keyboard.in_set(SimSet::Input));
    }
}

/// Reads the bound keys once per tick and classifies them into the fighter's intent.
///
/// Bindings come from the hot-reloadable [`GameConfig`]; until it has loaded the
/// default W/A/S/D layout is used.
pub fn sample_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time<Real>>,
    config_handle: Option<Res<GameConfigHandle>>,
    game_configs: Option<Res<Assets<GameConfig>>>,
    mut query: Query<(&mut KeyboardControlled, &mut FighterIntent)>,
) {
    let bindings = match (config_handle, game_configs) {
        (Some(handle), Some(configs)) => configs
            .get(&handle.0)
            .map(GameConfig::key_bindings)
            .unwrap_or_default(),
        _ => KeyBindings::default(),
    };

    let raw = RawInput {
        up: keys.pressed(bindings.up),
        down: keys.pressed(bindings.down),
        left: keys.pressed(bindings.left),
        right: keys.pressed(bindings.right),
    };
    let now = time.elapsed();

    for (mut controlled, mut intent) in query.iter_mut() {
        intent.0 = controlled.classifier.classify(raw, now);
    }
}
