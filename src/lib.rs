pub mod game;

/// Fixed ticks between two `profile_log!` lines: one second at the default 60 Hz.
pub const PROFILE_LOG_INTERVAL: u64 = 60;

// ============================================================================
// Profiling Macros
// ============================================================================

/// Logs on every [`PROFILE_LOG_INTERVAL`]th [`SimTick`](game::fighter::SimTick)
/// when the `perf_stats` feature is enabled, and compiles to nothing otherwise.
///
/// ```ignore
/// profile_log!(tick, "tick {} fighter {:?}", tick.0, fighter.0.report());
/// ```
///
/// Without `perf_stats` the arguments are not evaluated, so it is safe to hash
/// or snapshot fighter state inside them.
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {
        if $tick.0 % $crate::PROFILE_LOG_INTERVAL == 0 {
            bevy::prelude::info!($($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {};
}
