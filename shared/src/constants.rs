pub const DEFAULT_TICKS_PER_SECOND: f64 = 60.0;
pub const DEFAULT_CONFIG_PATH: &str = "sea.ron";

/// Gravity used by the wave dispersion relation (m/s²)
pub const WAVE_GRAVITY: f32 = 9.8;
/// Number of Gerstner components the sea surface sums
pub const MAX_WAVE_COMPONENTS: usize = 3;

/// Depth probes start this far above the vertex and subtract it again from the hit distance,
/// so vertices next to the shore are not reported as deep water.
pub const PROBE_HEIGHT: f32 = 100.0;
pub const DEFAULT_MAX_WATER_DEPTH: f32 = 20.0;
pub const MAX_GRADIENT_KEYS: usize = 8;

/// First vertex count that no longer fits a 16-bit index buffer.
pub const U16_VERTEX_LIMIT: usize = 1 << 16;
pub const VERTICES_PER_QUAD: usize = 6;

pub const DEFAULT_SHIP_HEIGHT_SCALE: f32 = 10.0;
pub const DEFAULT_BULLET_GRAVITY: f32 = 9.8;
pub const DEFAULT_BULLET_LIFETIME: f32 = 5.0;
/// Each Euler axis of the muzzle jitter is drawn from [-GUN_SPREAD_DEGREES, GUN_SPREAD_DEGREES]
pub const GUN_SPREAD_DEGREES: f32 = 5.0;
/// Guns start with a random phase in [0, GUN_MAX_INITIAL_DELAY) so they don't fire in lockstep
pub const GUN_MAX_INITIAL_DELAY: f32 = 1.5;
pub const TRAJECTORY_PREVIEW_STEPS: usize = 10;

pub const CONFIG_READ_ERROR: &str = "Failed to read sea configuration";
pub const CONFIG_WRITE_ERROR: &str = "Failed to write sea configuration";
