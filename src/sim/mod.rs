//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed logical tick only
//! - Seeded RNG only, owned by each state
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod geometry;
pub mod spawn;
pub mod state;
pub mod step;

pub use geometry::{Aabb, intersects};
pub use spawn::{
    SpawnTimers, Spawner, Spawns, spawn_obstacle, spawn_power_up, spawn_shaped_obstacle,
};
pub use state::{
    Capabilities, KinematicBody, Obstacle, ObstacleKind, Player, PowerUp, PowerUpKind,
    Projectile, SimulationState, Snapshot, World, create_initial_state, snapshot,
};
pub use step::{Action, apply, step};
