//! Game state and core simulation types
//!
//! Everything a running simulation mutates lives in [`SimulationState`].
//! Per-instance accumulators (velocity, tick counter, spawn timers, RNG) are
//! fields here, never globals, so two instances never alias each other.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::spawn::Spawner;
use crate::consts::*;
use crate::tuning::{HitboxInset, Tuning};

/// World dimensions supplied by the host (viewport/canvas size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub width: f64,
    pub height: f64,
}

impl World {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Y of the ground line (top of the ground band)
    #[inline]
    pub fn ground_line(&self, ground_height: f64) -> f64 {
        self.height - ground_height
    }
}

/// Position, size and velocity shared by every simulated object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    pub position: DVec2,
    pub size: DVec2,
    pub velocity: DVec2,
}

impl KinematicBody {
    pub fn new(position: DVec2, size: DVec2) -> Self {
        debug_assert!(size.x > 0.0 && size.y > 0.0);
        Self {
            position,
            size,
            velocity: DVec2::ZERO,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: self.position,
            size: self.size,
        }
    }

    /// Fully scrolled past the left edge
    #[inline]
    pub fn is_past_left_edge(&self) -> bool {
        self.position.x + self.size.x <= 0.0
    }
}

/// Pre-slide geometry, kept so a slide can be undone exactly
#[derive(Debug, Clone, Copy, PartialEq)]
struct SlideAnchor {
    y: f64,
    height: f64,
    /// Y right after entering the slide
    slid_y: f64,
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: KinematicBody,
    pub is_jumping: bool,
    pub is_sliding: bool,
    /// Negative = upward
    pub jump_force: f64,
    pub gravity: f64,
    #[serde(skip)]
    hitbox_inset: HitboxInset,
    #[serde(skip)]
    slide_anchor: Option<SlideAnchor>,
}

impl Player {
    /// Standing on the ground at 20% of the world width
    pub fn new(world: World, tuning: &Tuning) -> Self {
        let size = tuning.player_size;
        let position = DVec2::new(
            world.width * PLAYER_X_FRACTION,
            world.ground_line(tuning.ground_height) - size,
        );
        Self {
            body: KinematicBody::new(position, DVec2::splat(size)),
            is_jumping: false,
            is_sliding: false,
            jump_force: tuning.jump_force,
            gravity: tuning.gravity,
            hitbox_inset: tuning.hitbox_inset,
            slide_anchor: None,
        }
    }

    /// Body shrunk by the tuned inset
    pub fn hitbox(&self) -> Aabb {
        let inset = self.hitbox_inset;
        Aabb {
            min: self.body.position + DVec2::new(inset.left, inset.top),
            size: self.body.size - DVec2::new(inset.left + inset.right, inset.top + inset.bottom),
        }
    }

    /// Start a jump unless one is in progress
    pub fn jump(&mut self) {
        if self.is_jumping {
            return;
        }
        self.is_jumping = true;
        self.body.velocity.y = self.jump_force;
    }

    /// Halve height, keeping the bottom edge in place
    pub fn start_slide(&mut self) {
        if self.is_sliding {
            return;
        }
        let height = self.body.size.y;
        let anchor = SlideAnchor {
            y: self.body.position.y,
            height,
            slid_y: self.body.position.y + height / 2.0,
        };
        self.is_sliding = true;
        self.body.size.y = height / 2.0;
        self.body.position.y = anchor.slid_y;
        self.slide_anchor = Some(anchor);
    }

    /// Undo `start_slide`. Exact when the player has not moved vertically since.
    pub fn end_slide(&mut self) {
        if !self.is_sliding {
            return;
        }
        self.is_sliding = false;
        match self.slide_anchor.take() {
            Some(anchor) if self.body.position.y == anchor.slid_y => {
                self.body.position.y = anchor.y;
                self.body.size.y = anchor.height;
            }
            Some(anchor) => {
                self.body.position.y -= anchor.height / 2.0;
                self.body.size.y = anchor.height;
            }
            None => {
                self.body.position.y -= self.body.size.y;
                self.body.size.y *= 2.0;
            }
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Sits on the ground; jump over it
    Low,
    /// Floats above the ground; slide under it
    High,
}

impl ObstacleKind {
    pub fn height(&self) -> f64 {
        match self {
            ObstacleKind::Low => OBSTACLE_LOW_HEIGHT,
            ObstacleKind::High => OBSTACLE_HIGH_HEIGHT,
        }
    }

    /// Distance from the ground line up to the obstacle's top edge
    pub fn clearance(&self) -> f64 {
        match self {
            ObstacleKind::Low => OBSTACLE_LOW_CLEARANCE,
            ObstacleKind::High => OBSTACLE_HIGH_CLEARANCE,
        }
    }

    /// Distance from the ground line up to the obstacle's bottom edge
    pub fn bottom_gap(&self) -> f64 {
        self.clearance() - self.height()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub body: KinematicBody,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, position: DVec2) -> Self {
        Self {
            body: KinematicBody::new(position, DVec2::new(OBSTACLE_WIDTH, kind.height())),
            kind,
        }
    }

    /// Obstacle with an explicit size (comets)
    pub fn with_size(kind: ObstacleKind, position: DVec2, size: DVec2) -> Self {
        Self {
            body: KinematicBody::new(position, size),
            kind,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Shield,
    Points,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Speed, PowerUpKind::Shield, PowerUpKind::Points];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub body: KinematicBody,
    pub kind: PowerUpKind,
    /// False once collected; removed on the next update
    pub active: bool,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, position: DVec2) -> Self {
        Self {
            body: KinematicBody::new(position, DVec2::splat(POWER_UP_SIZE)),
            kind,
            active: true,
        }
    }
}

/// Power shot projectile, flying right
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub body: KinematicBody,
}

impl Projectile {
    /// Leaves from the middle of the player's front edge
    pub fn fired_from(player: &Player) -> Self {
        let body = &player.body;
        let position = DVec2::new(
            body.position.x + body.size.x,
            body.position.y + body.size.y / 2.0 - PROJECTILE_SIZE / 2.0,
        );
        let mut body = KinematicBody::new(position, DVec2::splat(PROJECTILE_SIZE));
        body.velocity.x = PROJECTILE_SPEED;
        Self { body }
    }
}

/// Gameplay modifiers currently granted by collected power-ups.
///
/// Set by the game loop from its effect timers; `shield` is cleared by the
/// simulation when it absorbs a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// Absorbs the next obstacle hit
    pub shield: bool,
    /// Scroll faster by `Tuning::speed_boost`
    pub speed_boost: bool,
    /// `Shoot` fires projectiles
    pub power_shot: bool,
}

/// Complete simulation state (aggregate root)
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub world: World,
    pub tuning: Tuning,
    pub player: Player,
    /// Spawn order, oldest first
    pub obstacles: Vec<Obstacle>,
    /// Spawn order, oldest first
    pub power_ups: Vec<PowerUp>,
    /// Fire order, oldest first
    pub projectiles: Vec<Projectile>,
    pub capabilities: Capabilities,
    pub score: u64,
    /// Pixels per tick
    pub scroll_speed: f64,
    pub is_over: bool,
    /// Ticks survived
    pub ticks: u64,
    pub(crate) spawner: Spawner,
}

impl SimulationState {
    /// Invalid tuning is replaced by its mode's defaults
    pub fn new(world: World, tuning: Tuning, seed: u64) -> Self {
        let tuning = tuning.validated_or_default();
        let spawner = Spawner::new(seed, &tuning.spawn);
        Self {
            world,
            player: Player::new(world, &tuning),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            projectiles: Vec::new(),
            capabilities: Capabilities::default(),
            score: 0,
            scroll_speed: tuning.scroll_speed_at(0),
            is_over: false,
            ticks: 0,
            tuning,
            spawner,
        }
    }

    /// Fresh state for the same world and tuning, seeded from this one's RNG
    pub fn reset(&mut self) {
        let seed = self.spawner.next_seed();
        *self = Self::new(self.world, self.tuning.clone(), seed);
    }

    /// Host viewport changed; affects ground clamps, spawns and resets from now on
    pub fn resize(&mut self, width: f64, height: f64) {
        self.world = World::new(width, height);
    }

    /// Y the player rests at with its current height
    pub fn ground_y(&self) -> f64 {
        self.world.ground_line(self.tuning.ground_height) - self.player.body.size.y
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            player: &self.player,
            obstacles: &self.obstacles,
            power_ups: &self.power_ups,
            projectiles: &self.projectiles,
            capabilities: self.capabilities,
            score: self.score,
            is_over: self.is_over,
        }
    }
}

/// Default-tuned state for a world of the given size
pub fn create_initial_state(width: f64, height: f64) -> SimulationState {
    SimulationState::new(World::new(width, height), Tuning::default(), DEFAULT_SEED)
}

/// Free-function form of [`SimulationState::snapshot`]
pub fn snapshot(state: &SimulationState) -> Snapshot<'_> {
    state.snapshot()
}

/// Read-only projection of the state for drawing
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub player: &'a Player,
    pub obstacles: &'a [Obstacle],
    pub power_ups: &'a [PowerUp],
    pub projectiles: &'a [Projectile],
    pub capabilities: Capabilities,
    pub score: u64,
    pub is_over: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_initial_state() {
        let state = create_initial_state(800.0, 400.0);
        assert_eq!(state.player.body.position, DVec2::new(160.0, 280.0));
        assert_eq!(state.player.body.size, DVec2::new(40.0, 40.0));
        assert_eq!(state.player.jump_force, JUMP_FORCE);
        assert_eq!(state.ground_y(), 280.0);
        assert!(state.obstacles.is_empty());
        assert!(state.power_ups.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.scroll_speed, BASE_SPEED);
        assert!(!state.is_over);
    }

    #[test]
    fn test_slide_keeps_bottom_edge() {
        let mut state = create_initial_state(800.0, 400.0);
        let bottom = state.player.body.aabb().max().y;
        state.player.start_slide();
        assert!(state.player.is_sliding);
        assert_eq!(state.player.body.size.y, 20.0);
        assert_eq!(state.player.body.aabb().max().y, bottom);

        // Second start is a no-op
        state.player.start_slide();
        assert_eq!(state.player.body.size.y, 20.0);
    }

    #[test]
    fn test_slide_end_after_vertical_move() {
        let mut state = create_initial_state(800.0, 400.0);
        state.player.start_slide();
        state.player.body.position.y -= 7.5;
        state.player.end_slide();
        assert_eq!(state.player.body.size.y, 40.0);
        assert_eq!(state.player.body.position.y, 280.0 + 20.0 - 7.5 - 20.0);
    }

    #[test]
    fn test_reset_is_independent() {
        let mut state = create_initial_state(800.0, 400.0);
        state.obstacles.push(Obstacle::new(ObstacleKind::Low, DVec2::new(10.0, 10.0)));
        state.score = 42;
        state.is_over = true;
        state.resize(1024.0, 600.0);
        state.reset();
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
        assert!(!state.is_over);
        assert_eq!(state.world, World::new(1024.0, 600.0));
        assert_eq!(state.player.body.position.y, 600.0 - GROUND_HEIGHT - PLAYER_SIZE);
    }

    #[test]
    fn test_snapshot_projection() {
        let mut state = create_initial_state(800.0, 400.0);
        state.power_ups.push(PowerUp::new(PowerUpKind::Shield, DVec2::new(300.0, 150.0)));
        let snap = snapshot(&state);
        assert_eq!(snap.power_ups.len(), 1);
        assert_eq!(snap.score, 0);
        let json = serde_json::to_value(snap).unwrap();
        assert_eq!(json["power_ups"][0]["kind"], "Shield");
        assert_eq!(json["is_over"], false);
    }

    #[test]
    fn test_hitbox_inset() {
        let tuning = Tuning {
            hitbox_inset: HitboxInset {
                left: 5.0,
                top: 10.0,
                right: 5.0,
                bottom: 0.0,
            },
            ..Tuning::default()
        };
        let state = SimulationState::new(World::new(800.0, 400.0), tuning, 1);
        let hitbox = state.player.hitbox();
        assert_eq!(hitbox.min, DVec2::new(165.0, 290.0));
        assert_eq!(hitbox.size, DVec2::new(30.0, 30.0));
        // Default tuning: hitbox is the body
        let plain = create_initial_state(800.0, 400.0);
        assert_eq!(plain.player.hitbox(), plain.player.body.aabb());
    }

    #[test]
    fn test_projectile_leaves_front_edge() {
        let state = create_initial_state(800.0, 400.0);
        let shot = Projectile::fired_from(&state.player);
        assert_eq!(shot.body.position, DVec2::new(200.0, 292.0));
        assert_eq!(shot.body.size, DVec2::splat(PROJECTILE_SIZE));
        assert_eq!(shot.body.velocity.x, PROJECTILE_SPEED);
    }

    #[test]
    fn test_invalid_tuning_is_replaced() {
        let tuning = Tuning {
            player_size: -1.0,
            ..Tuning::default()
        };
        let state = SimulationState::new(World::new(800.0, 400.0), tuning, 1);
        assert_eq!(state.tuning, Tuning::default());
        assert_eq!(state.player.body.size, DVec2::splat(PLAYER_SIZE));
    }

    proptest! {
        #[test]
        fn prop_slide_round_trip_is_exact(y in -1.0e4..1.0e4f64, h in 0.5..500.0f64) {
            let mut state = create_initial_state(800.0, 400.0);
            state.player.body.position.y = y;
            state.player.body.size.y = h;
            state.player.start_slide();
            state.player.end_slide();
            prop_assert_eq!(state.player.body.position.y, y);
            prop_assert_eq!(state.player.body.size.y, h);
            prop_assert!(!state.player.is_sliding);
        }
    }
}
