use std::time::Duration;

/// Default event poll interval in milliseconds. Alarm and timer logic
/// advances only when the wall-clock second changes.
pub const DEFAULT_TICK_MS: u64 = 250;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}
