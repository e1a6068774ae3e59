/// Smallest accepted search window; values this low are only useful for debugging.
pub const MIN_WINDOW: usize = 16;
pub const MAX_WINDOW: usize = 32_000;
pub const DEFAULT_WINDOW: usize = 1_000;

/// Bytes per binary location record.
pub const RECORD_SIZE: usize = 8;

pub const METERS_TO_NAUTICAL_MILES: f64 = 0.000_539_956_8;

/// Mean Earth radius used by the spherical distance model.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Stations between construction-loop progress log lines.
pub const PROGRESS_INTERVAL: usize = 100_000;
