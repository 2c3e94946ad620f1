//! Simulation step
//!
//! The reducer: one discrete action in, next state out. Every action is total;
//! stale or out-of-range references degrade to no-ops.

use serde::{Deserialize, Serialize};

use super::geometry::intersects;
use super::state::{Obstacle, Projectile, SimulationState};
use crate::consts::{POWER_UP_BONUS, PROJECTILE_KILL_BONUS, SPAWN_OFFSET};

/// The closed set of actions the core accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Jump,
    SlideStart,
    SlideEnd,
    /// Fire a projectile; needs the power shot
    Shoot,
    /// Advance the world by one tick
    Update,
    /// Consume the power-up at this index in `power_ups`
    CollectPowerUp(usize),
    /// Force the run to end (external triggers)
    GameOver,
    /// Replace the state with a fresh one for the current world
    Reset,
}

/// Pure transition: consume a state, return its successor
pub fn step(mut state: SimulationState, action: Action) -> SimulationState {
    apply(&mut state, action);
    state
}

/// In-place form of [`step`]
pub fn apply(state: &mut SimulationState, action: Action) {
    // Terminal: only Reset (and an idempotent GameOver) get through
    if state.is_over && !matches!(action, Action::Reset | Action::GameOver) {
        return;
    }

    match action {
        Action::Jump => state.player.jump(),
        Action::SlideStart => state.player.start_slide(),
        Action::SlideEnd => state.player.end_slide(),
        Action::Shoot => {
            if state.capabilities.power_shot {
                state.projectiles.push(Projectile::fired_from(&state.player));
            }
        }
        Action::Update => update(state),
        Action::CollectPowerUp(index) => {
            if let Some(power_up) = state.power_ups.get_mut(index).filter(|p| p.active) {
                power_up.active = false;
                state.score += POWER_UP_BONUS;
                log::debug!("Collected {:?} power-up, score {}", power_up.kind, state.score);
            }
        }
        Action::GameOver => {
            if !state.is_over {
                log::info!("Game over (forced) at score {}", state.score);
            }
            state.is_over = true;
        }
        Action::Reset => {
            state.reset();
            log::info!("Simulation reset ({}x{})", state.world.width, state.world.height);
        }
    }
}

/// One tick: physics, scroll/filter, spawn, collision, score. Order matters.
fn update(state: &mut SimulationState) {
    // Physics
    let ground_y = state.ground_y();
    let player = &mut state.player;
    player.body.velocity.y += player.gravity;
    let mut new_y = player.body.position.y + player.body.velocity.y;
    if new_y > ground_y {
        new_y = ground_y;
        player.body.velocity.y = 0.0;
        player.is_jumping = false;
    }
    player.body.position.y = new_y;

    // Scroll and drop whatever left the screen
    let mut speed = state.tuning.scroll_speed_at(state.ticks);
    if state.capabilities.speed_boost {
        speed *= state.tuning.speed_boost;
    }
    state.scroll_speed = speed;
    for obstacle in &mut state.obstacles {
        obstacle.body.position.x -= speed;
    }
    state.obstacles.retain(|o| !o.body.is_past_left_edge());
    let power_up_speed = state.tuning.power_up_speed.unwrap_or(speed);
    for power_up in &mut state.power_ups {
        power_up.body.position.x -= power_up_speed;
    }
    state
        .power_ups
        .retain(|p| p.active && !p.body.is_past_left_edge());
    for projectile in &mut state.projectiles {
        projectile.body.position.x += projectile.body.velocity.x;
    }
    let right_edge = state.world.width + SPAWN_OFFSET;
    state
        .projectiles
        .retain(|p| p.body.position.x < right_edge);

    // Spawn
    let spawns = state.spawner.roll(&state.tuning, state.world);
    state.obstacles.extend(spawns.obstacle);
    state.power_ups.extend(spawns.power_up);

    // Projectiles: each one destroys at most one obstacle
    let mut kills = 0;
    state.projectiles.retain(|projectile| {
        let shot = projectile.body.aabb();
        match state
            .obstacles
            .iter()
            .position(|o| intersects(&shot, &o.body.aabb()))
        {
            Some(index) => {
                state.obstacles.remove(index);
                kills += 1;
                false
            }
            None => true,
        }
    });
    if kills > 0 {
        state.score += kills * PROJECTILE_KILL_BONUS;
        log::debug!("Shot down {} obstacle(s), score {}", kills, state.score);
    }

    // Collision
    let hitbox = state.player.hitbox();
    let hit = |o: &Obstacle| intersects(&hitbox, &o.body.aabb());
    if let Some(index) = state.obstacles.iter().position(hit) {
        if state.capabilities.shield {
            state.capabilities.shield = false;
            state.obstacles.remove(index);
            log::info!("Shield absorbed a hit at score {}", state.score);
        }
        if state.obstacles.iter().any(hit) {
            state.is_over = true;
            log::info!("Game over after {} ticks, score {}", state.ticks, state.score);
            return;
        }
    }

    // Score
    state.ticks += 1;
    state.score += 1;
}
