//! Nex Runner - side-scrolling arcade runner core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `input`: Raw keyboard/touch input to discrete actions
//! - `game_loop`: Fixed-rate driver owning the authoritative state
//! - `preview`: Decorative menu animation (no gameplay semantics)
//! - `renderer`: Draw-list primitives used by the preview
//! - `platform`: Browser adapter
//! - `tuning`: Data-driven game balance

pub mod game_loop;
pub mod highscores;
pub mod input;
pub mod platform;
pub mod preview;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game_loop::{ActiveEffects, FrameSnapshot, GameLoop, GamePhase};
pub use highscores::HighScores;
pub use input::{Command, InputTranslator, Key, RawInput};
pub use settings::{QualityPreset, Settings};
pub use sim::{Action, SimulationState, Snapshot, create_initial_state, snapshot, step};
pub use tuning::{GameMode, HitboxInset, ObstacleShape, SpawnPolicy, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const TICK_RATE_HZ: f64 = 60.0;
    /// Fixed simulation timestep in milliseconds
    pub const SIM_DT_MS: f64 = 1000.0 / TICK_RATE_HZ;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will account for
    pub const MAX_FRAME_MS: f64 = 250.0;

    /// Ground band thickness at the bottom of the world
    pub const GROUND_HEIGHT: f64 = 80.0;
    /// Downward acceleration per tick
    pub const GRAVITY: f64 = 0.8;
    /// Initial vertical velocity of a jump (negative = up)
    pub const JUMP_FORCE: f64 = -15.0;
    /// Scroll speed in pixels per tick
    pub const BASE_SPEED: f64 = 5.0;

    /// Player defaults
    pub const PLAYER_SIZE: f64 = 40.0;
    /// Player x as a fraction of world width
    pub const PLAYER_X_FRACTION: f64 = 0.2;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f64 = 40.0;
    pub const OBSTACLE_LOW_HEIGHT: f64 = 40.0;
    pub const OBSTACLE_HIGH_HEIGHT: f64 = 60.0;
    /// Distance between the ground line and an obstacle's top edge
    pub const OBSTACLE_LOW_CLEARANCE: f64 = 40.0;
    pub const OBSTACLE_HIGH_CLEARANCE: f64 = 100.0;

    /// Power-up defaults
    pub const POWER_UP_SIZE: f64 = 30.0;
    /// Minimum height of a power-up above the ground line
    pub const POWER_UP_MIN_LIFT: f64 = 100.0;
    /// Random extra height range on top of the minimum lift
    pub const POWER_UP_LIFT_RANGE: f64 = 100.0;
    pub const POWER_UP_BONUS: u64 = 100;

    /// New entities appear this far past the right edge
    pub const SPAWN_OFFSET: f64 = 50.0;

    /// Duration of a timed power-up effect (15 seconds at 60 Hz)
    pub const EFFECT_DURATION_TICKS: u32 = 15 * 60;
    /// Default scroll multiplier of the Speed effect
    pub const SPEED_BOOST: f64 = 1.5;

    /// Power shot projectiles
    pub const PROJECTILE_SIZE: f64 = 16.0;
    pub const PROJECTILE_SPEED: f64 = 12.0;
    /// Score for destroying an obstacle with a projectile
    pub const PROJECTILE_KILL_BONUS: u64 = 2;

    /// Seed used by `create_initial_state`
    pub const DEFAULT_SEED: u64 = 0x4E45_5852;
}
