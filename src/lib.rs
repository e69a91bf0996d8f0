//! Road Rush - a vertical-scrolling traffic-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, difficulty, session state)
//! - `renderer`: 2D canvas rendering (wasm only)
//! - `audio`: Synthesized sound cues (wasm only)
//! - `highscore`: Persisted best-score cell
//! - `settings`: Persisted preferences

pub mod highscore;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use highscore::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (CSS pixels)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Width of the shoulder strip on each side of the road
    pub const ROAD_SHOULDER: f32 = 30.0;

    /// Player car defaults
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    /// Horizontal movement per step while a direction key is held
    pub const PLAYER_SPEED: f32 = 7.0;
    /// Player spawn distance from the bottom edge
    pub const PLAYER_START_OFFSET: f32 = 100.0;

    /// Enemy car defaults
    pub const ENEMY_WIDTH: f32 = 50.0;
    pub const ENEMY_HEIGHT: f32 = 90.0;
    /// Session-start value of the enemy base speed
    pub const ENEMY_START_SPEED: f32 = 2.0;
    /// Uniform random span added on top of the spawn-speed floor
    pub const ENEMY_SPEED_SPREAD: f32 = 2.0;
    /// Spawn-speed floor bump per 100 points of score
    pub const ENEMY_TIER_BONUS: f32 = 0.3;
    /// Speed creep applied to live enemies at each 100-point crossing
    pub const ENEMY_CREEP: f32 = 0.05;
    /// Number of enemy sprite variants the renderer can pick from
    pub const ENEMY_SPRITES: usize = 4;

    /// Road marking ring (recycled, never grows or shrinks)
    pub const MARKING_COUNT: usize = 10;
    pub const MARKING_WIDTH: f32 = 4.0;
    pub const MARKING_HEIGHT: f32 = 30.0;
    pub const MARKING_SPACING: f32 = 60.0;
    /// Marking scroll per step, before the game-speed multiplier
    pub const MARKING_SCROLL: f32 = 5.0;

    /// Spawner: per-step probability, before the game-speed multiplier
    pub const SPAWN_RATE_BASE: f32 = 0.02;
    pub const SPAWN_RATE_STEP: f32 = 0.005;
    pub const SPAWN_RATE_SCORE_STEP: u64 = 500;

    pub const START_LIVES: u8 = 3;

    /// Difficulty step: every SPEED_INTERVAL points of score
    pub const SPEED_INTERVAL: u64 = 900;
    pub const GAME_SPEED_STEP: f32 = 0.2;
    pub const ENEMY_BASE_SPEED_STEP: f32 = 0.5;

    /// Boost resource
    pub const BOOST_MAX: f32 = 100.0;
    pub const BOOST_MIN_ACTIVATION: f32 = 20.0;
    pub const BOOST_REGEN: f32 = 0.1;
    pub const BOOST_DRAIN: f32 = 1.0;

    /// Explosion animation
    pub const EXPLOSION_SIZE: f32 = 100.0;
    pub const EXPLOSION_FRAMES: u8 = 3;
    pub const EXPLOSION_FRAME_DELAY: u8 = 5;
    /// Follow-up explosions spawned after the primary one
    pub const SECONDARY_EXPLOSIONS: u32 = 3;
    /// Tick gap between staggered follow-up explosions (~50 ms at 60 Hz)
    pub const SECONDARY_STAGGER_TICKS: u64 = 3;
    /// Follow-up explosions land within +/- this offset of the crash point
    pub const SECONDARY_OFFSET_RANGE: f32 = 20.0;

    /// Transient banner durations (ticks at ~60 Hz)
    pub const CRASH_BANNER_TICKS: u32 = 30;
    pub const SPEED_BANNER_TICKS: u32 = 60;
    /// Delay between losing the last life and the session ending
    pub const GAME_OVER_DELAY_TICKS: u64 = 60;
}
