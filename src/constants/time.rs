//! Time system constants.

/// Largest simulated step for one frame (seconds)
pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;
/// Seconds between automatic saves
pub const AUTOSAVE_INTERVAL: f32 = 10.0;
/// Fixed step used by the headless runner
pub const HEADLESS_STEP: f32 = 1.0 / 60.0;
