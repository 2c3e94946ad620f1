//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives in [`Tuning`]. Each game
//! mode picks exactly one [`SpawnPolicy`]; policies are never blended.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Game skins with their own balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Endless runner: probabilistic spawns, constant speed
    #[default]
    Runner,
    /// Stormy night: countdown spawns, speed ramps up over time
    Storm,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Runner => "Runner",
            GameMode::Storm => "Storm",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "runner" | "run" => Some(GameMode::Runner),
            "storm" | "samurai" => Some(GameMode::Storm),
            _ => None,
        }
    }
}

/// How new obstacles and power-ups are scheduled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpawnPolicy {
    /// One uniform draw per entity class per tick; spawn iff below the chance
    Probabilistic {
        obstacle_chance: f64,
        power_up_chance: f64,
    },
    /// Per-class countdowns re-armed with a random duration after each spawn
    Countdown {
        obstacle_ticks: Range<u32>,
        power_up_ticks: Range<u32>,
        first_obstacle_ticks: Range<u32>,
        first_power_up_ticks: Range<u32>,
    },
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        SpawnPolicy::Probabilistic {
            obstacle_chance: 0.02,
            power_up_chance: 0.005,
        }
    }
}

/// Geometry of spawned obstacles
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum ObstacleShape {
    /// 40 wide; 40 tall (Low) or 60 tall (High)
    #[default]
    Fixed,
    /// Square comets with a random side in `size` and a vertical jitter of
    /// up to `y_jitter` either way
    Comet { size: Range<u32>, y_jitter: f64 },
}

/// Margins trimmed off the player body to get its collision box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HitboxInset {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Errors from loading a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl TuningError {
    fn invalid(field: &'static str, reason: &'static str) -> Self {
        TuningError::Invalid { field, reason }
    }
}

/// Gameplay balance for one simulation instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub mode: GameMode,
    /// Fixed logical tick rate
    pub tick_rate_hz: f64,
    pub gravity: f64,
    /// Negative = upward
    pub jump_force: f64,
    /// Player width and standing height
    pub player_size: f64,
    pub ground_height: f64,
    /// Scroll speed at tick 0
    pub base_speed: f64,
    /// Ticks between speed increases (0 = constant speed)
    pub speed_ramp_interval: u64,
    pub speed_ramp_step: f64,
    /// Scroll multiplier while a Speed effect is active
    pub speed_boost: f64,
    /// Power-ups scroll at this fixed speed instead of the world speed
    pub power_up_speed: Option<f64>,
    /// Collecting any power-up grants the power shot instead of its own effect
    pub power_ups_grant_shot: bool,
    pub obstacle_shape: ObstacleShape,
    pub hitbox_inset: HitboxInset,
    pub spawn: SpawnPolicy,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            mode: GameMode::Runner,
            tick_rate_hz: TICK_RATE_HZ,
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            player_size: PLAYER_SIZE,
            ground_height: GROUND_HEIGHT,
            base_speed: BASE_SPEED,
            speed_ramp_interval: 0,
            speed_ramp_step: 0.0,
            speed_boost: SPEED_BOOST,
            power_up_speed: None,
            power_ups_grant_shot: false,
            obstacle_shape: ObstacleShape::Fixed,
            hitbox_inset: HitboxInset::default(),
            spawn: SpawnPolicy::default(),
        }
    }
}

impl Tuning {
    /// Balance for a given game mode
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Runner => Self::default(),
            GameMode::Storm => Self {
                mode,
                jump_force: -16.0,
                base_speed: 6.0,
                speed_ramp_interval: 600,
                speed_ramp_step: 1.0,
                power_up_speed: Some(3.0),
                power_ups_grant_shot: true,
                obstacle_shape: ObstacleShape::Comet {
                    size: 20..44,
                    y_jitter: 10.0,
                },
                hitbox_inset: HitboxInset {
                    left: 5.0,
                    top: 10.0,
                    right: 5.0,
                    bottom: 0.0,
                },
                spawn: SpawnPolicy::Countdown {
                    obstacle_ticks: 60..120,
                    power_up_ticks: 300..900,
                    first_obstacle_ticks: 45..90,
                    first_power_up_ticks: 250..700,
                },
                ..Self::default()
            },
        }
    }

    /// Parse and validate a JSON tuning document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.tick_rate_hz > 0.0) {
            return Err(TuningError::invalid("tick_rate_hz", "must be positive"));
        }
        if !(self.player_size > 0.0) {
            return Err(TuningError::invalid("player_size", "must be positive"));
        }
        if !(self.ground_height >= 0.0) {
            return Err(TuningError::invalid("ground_height", "must not be negative"));
        }
        if !(self.base_speed >= 0.0) {
            return Err(TuningError::invalid("base_speed", "must not be negative"));
        }
        if !(self.speed_boost > 0.0) {
            return Err(TuningError::invalid("speed_boost", "must be positive"));
        }
        if let Some(speed) = self.power_up_speed {
            if !(speed >= 0.0) {
                return Err(TuningError::invalid("power_up_speed", "must not be negative"));
            }
        }
        if let ObstacleShape::Comet { size, y_jitter } = &self.obstacle_shape {
            if size.is_empty() || size.start == 0 {
                return Err(TuningError::invalid("size", "must be a non-empty range above zero"));
            }
            if !(*y_jitter >= 0.0) {
                return Err(TuningError::invalid("y_jitter", "must not be negative"));
            }
        }
        let inset = self.hitbox_inset;
        for (field, margin) in [
            ("hitbox_inset.left", inset.left),
            ("hitbox_inset.top", inset.top),
            ("hitbox_inset.right", inset.right),
            ("hitbox_inset.bottom", inset.bottom),
        ] {
            if !(margin >= 0.0) {
                return Err(TuningError::invalid(field, "must not be negative"));
            }
        }
        if inset.left + inset.right >= self.player_size
            || inset.top + inset.bottom >= self.player_size / 2.0
        {
            return Err(TuningError::invalid(
                "hitbox_inset",
                "must leave a positive hitbox, also while sliding",
            ));
        }
        match &self.spawn {
            SpawnPolicy::Probabilistic {
                obstacle_chance,
                power_up_chance,
            } => {
                if !(0.0..=1.0).contains(obstacle_chance) {
                    return Err(TuningError::invalid("obstacle_chance", "must be within [0, 1]"));
                }
                if !(0.0..=1.0).contains(power_up_chance) {
                    return Err(TuningError::invalid("power_up_chance", "must be within [0, 1]"));
                }
            }
            SpawnPolicy::Countdown {
                obstacle_ticks,
                power_up_ticks,
                first_obstacle_ticks,
                first_power_up_ticks,
            } => {
                let ranges = [
                    ("obstacle_ticks", obstacle_ticks),
                    ("power_up_ticks", power_up_ticks),
                    ("first_obstacle_ticks", first_obstacle_ticks),
                    ("first_power_up_ticks", first_power_up_ticks),
                ];
                for (field, range) in ranges {
                    if range.is_empty() || range.start == 0 {
                        return Err(TuningError::invalid(field, "must be a non-empty range above zero"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Milliseconds per logical tick
    pub fn tick_ms(&self) -> f64 {
        1000.0 / self.tick_rate_hz
    }

    /// Balance for this tuning's mode, used when a hand-built tuning is invalid
    pub fn validated_or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                log::warn!("{}; using {} defaults", e, self.mode.as_str());
                Self::for_mode(self.mode)
            }
        }
    }

    /// Scroll speed after `ticks` survived ticks
    pub fn scroll_speed_at(&self, ticks: u64) -> f64 {
        if self.speed_ramp_interval == 0 {
            self.base_speed
        } else {
            self.base_speed + (ticks / self.speed_ramp_interval) as f64 * self.speed_ramp_step
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_is_default() {
        let tuning = Tuning::for_mode(GameMode::Runner);
        assert_eq!(tuning, Tuning::default());
        assert!(matches!(tuning.spawn, SpawnPolicy::Probabilistic { .. }));
        assert_eq!(tuning.scroll_speed_at(10_000), BASE_SPEED);
    }

    #[test]
    fn test_storm_speed_ramp() {
        let tuning = Tuning::for_mode(GameMode::Storm);
        assert!(matches!(tuning.spawn, SpawnPolicy::Countdown { .. }));
        assert_eq!(tuning.scroll_speed_at(0), 6.0);
        assert_eq!(tuning.scroll_speed_at(599), 6.0);
        assert_eq!(tuning.scroll_speed_at(600), 7.0);
        assert_eq!(tuning.scroll_speed_at(1800), 9.0);
    }

    #[test]
    fn test_from_json_partial() {
        let tuning = Tuning::from_json(r#"{ "gravity": 1.2, "base_speed": 3.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 1.2);
        assert_eq!(tuning.base_speed, 3.0);
        assert_eq!(tuning.jump_force, JUMP_FORCE);
    }

    #[test]
    fn test_from_json_rejects_bad_chance() {
        let json = r#"{ "spawn": { "Probabilistic": { "obstacle_chance": 1.5, "power_up_chance": 0.0 } } }"#;
        let err = Tuning::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "obstacle_chance",
                ..
            }
        ));
    }

    #[test]
    fn test_from_json_rejects_empty_range() {
        let mut tuning = Tuning::for_mode(GameMode::Storm);
        if let SpawnPolicy::Countdown { obstacle_ticks, .. } = &mut tuning.spawn {
            *obstacle_ticks = 10..10;
        }
        let json = serde_json::to_string(&tuning).unwrap();
        assert!(Tuning::from_json(&json).is_err());
    }

    #[test]
    fn test_from_json_parse_error() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_storm_comet_geometry() {
        let tuning = Tuning::for_mode(GameMode::Storm);
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.power_up_speed, Some(3.0));
        assert!(tuning.power_ups_grant_shot);
        assert!(matches!(tuning.obstacle_shape, ObstacleShape::Comet { .. }));
        assert_eq!(tuning.hitbox_inset.top, 10.0);
    }

    #[test]
    fn test_rejects_hitbox_inset_swallowing_player() {
        let tuning = Tuning {
            hitbox_inset: HitboxInset {
                left: 20.0,
                right: 20.0,
                ..HitboxInset::default()
            },
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid {
                field: "hitbox_inset",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_mode() {
        let mut tuning = Tuning::for_mode(GameMode::Storm);
        if let SpawnPolicy::Countdown { obstacle_ticks, .. } = &mut tuning.spawn {
            *obstacle_ticks = 5..5;
        }
        tuning.gravity = 2.0;
        let fixed = tuning.validated_or_default();
        assert_eq!(fixed, Tuning::for_mode(GameMode::Storm));

        let mut ok = Tuning::default();
        ok.gravity = 2.0;
        assert_eq!(ok.clone().validated_or_default(), ok);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(GameMode::from_str("STORM"), Some(GameMode::Storm));
        assert_eq!(GameMode::from_str("runner"), Some(GameMode::Runner));
        assert_eq!(GameMode::from_str("pong"), None);
    }
}
