//! Input classification - raw key state to semantic movement intent.
//!
//! Runs on wall-clock time, so nothing here touches fixed-point math. The
//! output, [`InputIntent`], is the only thing the deterministic simulation
//! ever sees of the keyboard.

use std::time::Duration;

use bevy::log::debug;
use serde::{Deserialize, Serialize};

/// Window within which two presses of the same horizontal key count as a dash.
pub const DEFAULT_DASH_WINDOW: Duration = Duration::from_millis(200);

/// One of the nine stick positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Neutral,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const fn contains_up(self) -> bool {
        matches!(self, Self::Up | Self::UpLeft | Self::UpRight)
    }

    pub const fn contains_down(self) -> bool {
        matches!(self, Self::Down | Self::DownLeft | Self::DownRight)
    }

    /// -1 for the left column, 1 for the right column, 0 otherwise.
    pub const fn horizontal_sign(self) -> i32 {
        match self {
            Self::Left | Self::UpLeft | Self::DownLeft => -1,
            Self::Right | Self::UpRight | Self::DownRight => 1,
            Self::Neutral | Self::Up | Self::Down => 0,
        }
    }
}

/// Level-triggered key state for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Everything the simulation needs to know about the player's input this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputIntent {
    pub direction: Direction,
    /// Up is currently held (level). Jumps start from this.
    pub hold_up: bool,
    /// Rising edges this tick.
    pub up_pressed: bool,
    pub down_pressed: bool,
    pub left_pressed: bool,
    pub right_pressed: bool,
    /// Sustained while the dash direction stays held after a double tap.
    pub double_tap_left: bool,
    pub double_tap_right: bool,
}

impl InputIntent {
    /// Intent of a player simply holding `direction`, with no edges or dashes.
    pub const fn holding(direction: Direction) -> Self {
        Self {
            direction,
            hold_up: direction.contains_up(),
            up_pressed: false,
            down_pressed: false,
            left_pressed: false,
            right_pressed: false,
            double_tap_left: false,
            double_tap_right: false,
        }
    }
}

/// Stateful classifier turning per-tick [`RawInput`] into [`InputIntent`].
///
/// Keeps the previous raw state (for rising edges), the previous direction
/// (for left/right disambiguation and the neutral-before-tap rule) and the
/// timestamp of the last press of each horizontal key.
#[derive(Clone, Debug)]
pub struct InputClassifier {
    dash_window: Duration,
    previous_raw: RawInput,
    previous_direction: Direction,
    double_tap_left: bool,
    double_tap_right: bool,
    last_left_press: Option<Duration>,
    last_right_press: Option<Duration>,
}

impl Default for InputClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DASH_WINDOW)
    }
}

impl InputClassifier {
    pub fn new(dash_window: Duration) -> Self {
        Self {
            dash_window,
            previous_raw: RawInput::default(),
            previous_direction: Direction::Neutral,
            double_tap_left: false,
            double_tap_right: false,
            last_left_press: None,
            last_right_press: None,
        }
    }

    pub fn previous_direction(&self) -> Direction {
        self.previous_direction
    }

    /// Classifies one tick of input. `now` must come from a monotonic clock.
    pub fn classify(&mut self, raw: RawInput, now: Duration) -> InputIntent {
        let previous = self.previous_direction;
        let direction = resolve_direction(raw, previous);

        let up_pressed = raw.up && !self.previous_raw.up;
        let down_pressed = raw.down && !self.previous_raw.down;
        let left_pressed = raw.left && !self.previous_raw.left;
        let right_pressed = raw.right && !self.previous_raw.right;

        self.double_tap_left = if left_pressed {
            let tapped = is_double_tap(self.last_left_press, now, self.dash_window, previous);
            self.last_left_press = Some(now);
            if tapped {
                debug!("Double tap left at {:?}", now);
            }
            tapped
        } else {
            self.double_tap_left && direction == Direction::Left
        };

        self.double_tap_right = if right_pressed {
            let tapped = is_double_tap(self.last_right_press, now, self.dash_window, previous);
            self.last_right_press = Some(now);
            if tapped {
                debug!("Double tap right at {:?}", now);
            }
            tapped
        } else {
            self.double_tap_right && direction == Direction::Right
        };

        self.previous_raw = raw;
        self.previous_direction = direction;

        InputIntent {
            direction,
            hold_up: raw.up,
            up_pressed,
            down_pressed,
            left_pressed,
            right_pressed,
            double_tap_left: self.double_tap_left,
            double_tap_right: self.double_tap_right,
        }
    }
}

fn is_double_tap(last_press: Option<Duration>, now: Duration, window: Duration, previous: Direction) -> bool {
    previous == Direction::Neutral
        && last_press.is_some_and(|pressed_at| now.saturating_sub(pressed_at) < window)
}

/// Fixed precedence: down+right, down+left, up+right, up+left, left/right, up, down.
///
/// Both horizontal keys held keeps whichever side was already active, so a
/// press and release landing on the same tick does not flip the direction.
fn resolve_direction(raw: RawInput, previous: Direction) -> Direction {
    if raw.down && raw.right {
        Direction::DownRight
    } else if raw.down && raw.left {
        Direction::DownLeft
    } else if raw.up && raw.right {
        Direction::UpRight
    } else if raw.up && raw.left {
        Direction::UpLeft
    } else if raw.left {
        if raw.right && previous == Direction::Right {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if raw.right {
        Direction::Right
    } else if raw.up {
        Direction::Up
    } else if raw.down {
        Direction::Down
    } else {
        Direction::Neutral
    }
}
