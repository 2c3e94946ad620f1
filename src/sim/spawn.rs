//! Procedural spawner
//!
//! Builds new obstacles and power-ups just past the right edge of the world
//! and decides, once per tick, whether any should appear.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Obstacle, ObstacleKind, PowerUp, PowerUpKind, World};
use crate::consts::*;
use crate::tuning::{ObstacleShape, SpawnPolicy, Tuning};

/// Obstacle at the right edge; High and Low with equal probability
pub fn spawn_obstacle<R: Rng>(rng: &mut R, world: World, ground_height: f64) -> Obstacle {
    spawn_shaped_obstacle(rng, world, ground_height, &ObstacleShape::Fixed)
}

/// [`spawn_obstacle`] with a tuned shape. Comets keep the bottom edge a
/// fixed-size obstacle of the same kind would have, then jitter vertically.
pub fn spawn_shaped_obstacle<R: Rng>(
    rng: &mut R,
    world: World,
    ground_height: f64,
    shape: &ObstacleShape,
) -> Obstacle {
    let kind = if rng.random_bool(0.5) {
        ObstacleKind::High
    } else {
        ObstacleKind::Low
    };
    let x = world.width + SPAWN_OFFSET;
    let ground_line = world.ground_line(ground_height);
    match shape {
        ObstacleShape::Fixed => Obstacle::new(kind, DVec2::new(x, ground_line - kind.clearance())),
        ObstacleShape::Comet { size, y_jitter } => {
            let side = rng.random_range(size.clone()) as f64;
            let jitter = (rng.random::<f64>() * 2.0 - 1.0) * y_jitter;
            let y = ground_line - kind.bottom_gap() - side + jitter;
            Obstacle::with_size(kind, DVec2::new(x, y), DVec2::splat(side))
        }
    }
}

/// Power-up at the right edge, 100..200 px above the ground line
pub fn spawn_power_up<R: Rng>(rng: &mut R, world: World, ground_height: f64) -> PowerUp {
    let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
    let lift = POWER_UP_MIN_LIFT + rng.random::<f64>() * POWER_UP_LIFT_RANGE;
    let y = world.ground_line(ground_height) - lift;
    PowerUp::new(kind, DVec2::new(world.width + SPAWN_OFFSET, y))
}

/// Ticks left before the next countdown spawn of each class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnTimers {
    pub obstacle: u32,
    pub power_up: u32,
}

/// Entities produced by one spawner roll
#[derive(Debug, Clone, Default)]
pub struct Spawns {
    pub obstacle: Option<Obstacle>,
    pub power_up: Option<PowerUp>,
}

/// Per-state spawn RNG and countdown timers
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    timers: Option<SpawnTimers>,
}

impl Spawner {
    pub fn new(seed: u64, policy: &SpawnPolicy) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let timers = Self::initial_timers(&mut rng, policy);
        Self { rng, timers }
    }

    fn initial_timers(rng: &mut Pcg32, policy: &SpawnPolicy) -> Option<SpawnTimers> {
        match policy {
            SpawnPolicy::Probabilistic { .. } => None,
            SpawnPolicy::Countdown {
                first_obstacle_ticks,
                first_power_up_ticks,
                ..
            } => Some(SpawnTimers {
                obstacle: rng.random_range(first_obstacle_ticks.clone()),
                power_up: rng.random_range(first_power_up_ticks.clone()),
            }),
        }
    }

    #[cfg(test)]
    pub(crate) fn timers(&self) -> Option<SpawnTimers> {
        self.timers
    }

    /// Seed for a successor state
    pub fn next_seed(&mut self) -> u64 {
        self.rng.random()
    }

    /// Run one tick of the tuned spawn policy
    pub fn roll(&mut self, tuning: &Tuning, world: World) -> Spawns {
        let policy = &tuning.spawn;
        let ground_height = tuning.ground_height;
        let shape = &tuning.obstacle_shape;
        let mut spawns = Spawns::default();
        match policy {
            SpawnPolicy::Probabilistic {
                obstacle_chance,
                power_up_chance,
            } => {
                // Always one draw per class so the sequence does not depend on outcomes
                let obstacle_roll: f64 = self.rng.random();
                let power_up_roll: f64 = self.rng.random();
                if obstacle_roll < *obstacle_chance {
                    spawns.obstacle =
                        Some(spawn_shaped_obstacle(&mut self.rng, world, ground_height, shape));
                }
                if power_up_roll < *power_up_chance {
                    spawns.power_up = Some(spawn_power_up(&mut self.rng, world, ground_height));
                }
            }
            SpawnPolicy::Countdown {
                obstacle_ticks,
                power_up_ticks,
                ..
            } => {
                let mut timers = match self.timers {
                    Some(timers) => timers,
                    None => match Self::initial_timers(&mut self.rng, policy) {
                        Some(timers) => timers,
                        None => return spawns,
                    },
                };

                timers.obstacle = timers.obstacle.saturating_sub(1);
                if timers.obstacle == 0 {
                    spawns.obstacle =
                        Some(spawn_shaped_obstacle(&mut self.rng, world, ground_height, shape));
                    timers.obstacle = self.rng.random_range(obstacle_ticks.clone());
                }

                timers.power_up = timers.power_up.saturating_sub(1);
                if timers.power_up == 0 {
                    spawns.power_up = Some(spawn_power_up(&mut self.rng, world, ground_height));
                    timers.power_up = self.rng.random_range(power_up_ticks.clone());
                }

                self.timers = Some(timers);
            }
        }

        if let Some(obstacle) = &spawns.obstacle {
            log::debug!(
                "Spawned {:?} obstacle {}px at y={:.1}",
                obstacle.kind,
                obstacle.body.size.y,
                obstacle.body.position.y
            );
        }
        if let Some(power_up) = &spawns.power_up {
            log::debug!("Spawned {:?} power-up at y={:.1}", power_up.kind, power_up.body.position.y);
        }
        spawns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::GameMode;

    const WORLD: World = World {
        width: 800.0,
        height: 400.0,
    };

    fn with_policy(spawn: SpawnPolicy) -> Tuning {
        Tuning {
            spawn,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_obstacle_geometry() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen_low = false;
        let mut seen_high = false;
        for _ in 0..200 {
            let o = spawn_obstacle(&mut rng, WORLD, GROUND_HEIGHT);
            assert_eq!(o.body.position.x, 850.0);
            assert_eq!(o.body.size.x, 40.0);
            match o.kind {
                ObstacleKind::Low => {
                    seen_low = true;
                    assert_eq!(o.body.position.y, 280.0);
                    assert_eq!(o.body.size.y, 40.0);
                }
                ObstacleKind::High => {
                    seen_high = true;
                    assert_eq!(o.body.position.y, 220.0);
                    assert_eq!(o.body.size.y, 60.0);
                }
            }
        }
        assert!(seen_low && seen_high);
    }

    #[test]
    fn test_comet_geometry() {
        let shape = ObstacleShape::Comet {
            size: 20..44,
            y_jitter: 10.0,
        };
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..300 {
            let o = spawn_shaped_obstacle(&mut rng, WORLD, GROUND_HEIGHT, &shape);
            let side = o.body.size.x;
            assert_eq!(o.body.size.y, side);
            assert!((20.0..44.0).contains(&side));
            assert_eq!(o.body.position.x, 850.0);
            // Bottom edge within the jitter of the fixed-size bottom edge
            let bottom = o.body.position.y + side;
            let expected = 320.0 - o.kind.bottom_gap();
            assert!((bottom - expected).abs() <= 10.0, "bottom {bottom} vs {expected}");
        }
    }

    #[test]
    fn test_storm_spawns_comets() {
        let tuning = Tuning::for_mode(GameMode::Storm);
        let mut spawner = Spawner::new(3, &tuning.spawn);
        let comet = (0..200)
            .find_map(|_| spawner.roll(&tuning, WORLD).obstacle)
            .expect("storm spawns within 200 ticks");
        assert_eq!(comet.body.size.x, comet.body.size.y);
    }

    #[test]
    fn test_power_up_geometry() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            let p = spawn_power_up(&mut rng, WORLD, GROUND_HEIGHT);
            assert_eq!(p.body.position.x, 850.0);
            assert_eq!(p.body.size, DVec2::splat(30.0));
            assert!(p.active);
            // ground line 320, lift in [100, 200)
            assert!(p.body.position.y <= 220.0);
            assert!(p.body.position.y > 120.0);
        }
    }

    #[test]
    fn test_probabilistic_rate() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::new(1234, &tuning.spawn);
        assert!(spawner.timers().is_none());
        let mut obstacles = 0;
        let mut power_ups = 0;
        for _ in 0..20_000 {
            let spawns = spawner.roll(&tuning, WORLD);
            obstacles += spawns.obstacle.is_some() as u32;
            power_ups += spawns.power_up.is_some() as u32;
        }
        // Expected 400 and 100
        assert!((300..500).contains(&obstacles), "obstacles = {obstacles}");
        assert!((50..160).contains(&power_ups), "power_ups = {power_ups}");
    }

    #[test]
    fn test_zero_chance_never_spawns() {
        let tuning = with_policy(SpawnPolicy::Probabilistic {
            obstacle_chance: 0.0,
            power_up_chance: 0.0,
        });
        let mut spawner = Spawner::new(1, &tuning.spawn);
        for _ in 0..5_000 {
            let spawns = spawner.roll(&tuning, WORLD);
            assert!(spawns.obstacle.is_none() && spawns.power_up.is_none());
        }
    }

    #[test]
    fn test_countdown_cadence() {
        let tuning = Tuning::for_mode(GameMode::Storm);
        let mut spawner = Spawner::new(99, &tuning.spawn);
        let first = spawner.timers().unwrap();
        assert!((45..90).contains(&first.obstacle));
        assert!((250..700).contains(&first.power_up));

        // Nothing until the first countdown expires
        for _ in 0..first.obstacle - 1 {
            assert!(spawner.roll(&tuning, WORLD).obstacle.is_none());
        }
        assert!(spawner.roll(&tuning, WORLD).obstacle.is_some());

        let rearmed = spawner.timers().unwrap();
        assert!((60..120).contains(&rearmed.obstacle));
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let tuning = with_policy(SpawnPolicy::Probabilistic {
            obstacle_chance: 0.5,
            power_up_chance: 0.5,
        });
        let mut a = Spawner::new(42, &tuning.spawn);
        let mut b = Spawner::new(42, &tuning.spawn);
        for _ in 0..100 {
            let sa = a.roll(&tuning, WORLD);
            let sb = b.roll(&tuning, WORLD);
            assert_eq!(sa.obstacle, sb.obstacle);
            assert_eq!(sa.power_up, sb.power_up);
        }
    }
}
