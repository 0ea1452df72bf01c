//! Deterministic fixed-point mathematics library.
//!
//! This module provides deterministic math types and operations using fixed-point
//! arithmetic to ensure identical behavior across different platforms and architectures.
//! Every simulation quantity (positions, velocities, rates, the tick delta) is a
//! [`FixedScalar`], so two machines fed the same inputs produce bit-identical state,
//! which is what replays and lockstep netplay rely on.
//!
//! Overflow never wraps silently: addition, subtraction and multiplication saturate
//! at [`FixedScalar::MIN`] / [`FixedScalar::MAX`]. Division by zero is reported as
//! [`FixedError::DivideByZero`].

use thiserror::Error;

pub use scalar::FixedScalar;
pub use vec2::FixedVector2;

mod scalar;
mod vec2;


/// Errors raised by fallible fixed-point operations and conversions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixedError {
    #[error("fixed-point division by zero")]
    DivideByZero,
    #[error("value is outside the representable Q31.32 range")]
    OutOfRange,
    #[error("non-finite value cannot be converted to fixed point")]
    NotFinite,
    #[error("invalid fixed-point literal `{0}`")]
    Parse(String),
}
