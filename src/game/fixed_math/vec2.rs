use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{FixedError, FixedScalar};

/// Pair of [`FixedScalar`] components. Operations are component-wise only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedVector2 {
    pub x: FixedScalar,
    pub y: FixedScalar,
}

impl FixedVector2 {
    pub const ZERO: Self = Self { x: FixedScalar::ZERO, y: FixedScalar::ZERO };

    pub const fn new(x: FixedScalar, y: FixedScalar) -> Self {
        Self { x, y }
    }

    /// Divides both components by an integer.
    pub fn try_div_int(self, divisor: i32) -> Result<Self, FixedError> {
        let divisor = FixedScalar::from_int(divisor);
        Ok(Self {
            x: self.x.try_div(divisor)?,
            y: self.y.try_div(divisor)?,
        })
    }

    /// Lossy float view for rendering. Never feed the result back into the simulation.
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x.to_f32(), self.y.to_f32())
    }
}

impl std::ops::Add for FixedVector2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for FixedVector2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Div<i32> for FixedVector2 {
    type Output = Self;

    /// # Panics
    /// Panics when `rhs` is zero.
    fn div(self, rhs: i32) -> Self::Output {
        let divisor = FixedScalar::from_int(rhs);
        Self { x: self.x / divisor, y: self.y / divisor }
    }
}
