//! Game loop driver
//!
//! Owns the only mutable [`SimulationState`]. The host feeds it wall-clock
//! deltas and input; it runs `Update` at a fixed logical rate and hands back
//! a read-only [`FrameSnapshot`] for drawing.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::highscores::HighScores;
use crate::input::{Command, InputTranslator, RawInput};
use crate::sim::{
    Action, Capabilities, PowerUpKind, SimulationState, Snapshot, World, apply, intersects,
};
use crate::tuning::{GameMode, Tuning};

/// Presentation-facing state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh state, waiting for start
    #[default]
    Idle,
    /// Ticking
    Running,
    /// Tick scheduling stopped, state kept
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

/// Timed power-up effects, in ticks remaining
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActiveEffects {
    pub speed_ticks: u32,
    /// Ends early when the shield absorbs a hit
    pub shield_ticks: u32,
    pub power_shot_ticks: u32,
}

impl ActiveEffects {
    /// Start (or refresh) the effect of a collected power-up
    pub fn grant(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Speed => self.speed_ticks = EFFECT_DURATION_TICKS,
            PowerUpKind::Shield => self.shield_ticks = EFFECT_DURATION_TICKS,
            PowerUpKind::Points => {}
        }
    }

    pub fn grant_power_shot(&mut self) {
        self.power_shot_ticks = EFFECT_DURATION_TICKS;
    }

    fn tick(&mut self) {
        self.speed_ticks = self.speed_ticks.saturating_sub(1);
        self.shield_ticks = self.shield_ticks.saturating_sub(1);
        self.power_shot_ticks = self.power_shot_ticks.saturating_sub(1);
    }

    /// What the simulation may do while these effects run
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            shield: self.shield_ticks > 0,
            speed_boost: self.speed_ticks > 0,
            power_shot: self.power_shot_ticks > 0,
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::Speed => self.speed_ticks > 0,
            PowerUpKind::Shield => self.shield_ticks > 0,
            PowerUpKind::Points => false,
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameSnapshot<'a> {
    #[serde(flatten)]
    pub sim: Snapshot<'a>,
    pub phase: GamePhase,
    pub mode: GameMode,
    pub effects: ActiveEffects,
}

/// Fixed-rate driver around one simulation instance
#[derive(Debug)]
pub struct GameLoop {
    state: SimulationState,
    phase: GamePhase,
    translator: InputTranslator,
    effects: ActiveEffects,
    high_scores: HighScores,
    accumulator: f64,
    shut_down: bool,
}

impl GameLoop {
    pub fn new(width: f64, height: f64, tuning: Tuning, seed: u64) -> Self {
        log::info!(
            "{} mode, {}x{} world, seed {}",
            tuning.mode.as_str(),
            width,
            height,
            seed
        );
        Self {
            state: SimulationState::new(World::new(width, height), tuning, seed),
            phase: GamePhase::Idle,
            translator: InputTranslator::new(),
            effects: ActiveEffects::default(),
            high_scores: HighScores::new(),
            accumulator: 0.0,
            shut_down: false,
        }
    }

    pub fn with_mode(width: f64, height: f64, mode: GameMode, seed: u64) -> Self {
        Self::new(width, height, Tuning::for_mode(mode), seed)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn effects(&self) -> ActiveEffects {
        self.effects
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot {
            sim: self.state.snapshot(),
            phase: self.phase,
            mode: self.state.tuning.mode,
            effects: self.effects,
        }
    }

    /// Apply one simulation action. Actions arrive in order and are never batched.
    pub fn dispatch(&mut self, action: Action) {
        if self.shut_down {
            log::warn!("Dropped {:?}: game loop is shut down", action);
            return;
        }
        match action {
            Action::Update => {
                if self.phase == GamePhase::Running {
                    self.run_tick();
                }
            }
            Action::Jump | Action::SlideStart | Action::Shoot | Action::CollectPowerUp(_) => {
                if self.phase == GamePhase::Running {
                    apply(&mut self.state, action);
                }
            }
            Action::SlideEnd => apply(&mut self.state, action),
            Action::GameOver => {
                apply(&mut self.state, action);
                self.sync_phase();
            }
            Action::Reset => self.restart(),
        }
    }

    /// Translate a raw device event and act on it
    pub fn handle_input(&mut self, input: RawInput) {
        if self.shut_down {
            log::warn!("Dropped {:?}: game loop is shut down", input);
            return;
        }
        if let Some(command) = self.translator.translate(input, self.phase) {
            self.execute(command);
        }
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Start => self.start(),
            Command::Resume => self.resume(),
            Command::Pause => self.pause(),
            Command::Restart => self.restart(),
            Command::Sim(action) => self.dispatch(action),
        }
    }

    pub fn start(&mut self) {
        if self.shut_down || self.phase != GamePhase::Idle {
            return;
        }
        self.accumulator = 0.0;
        self.phase = GamePhase::Running;
        log::info!("Run started");
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
            log::info!("Paused at score {}", self.state.score);
        }
    }

    pub fn resume(&mut self) {
        if self.shut_down || self.phase != GamePhase::Paused {
            return;
        }
        // Time spent paused is not simulated
        self.accumulator = 0.0;
        self.phase = GamePhase::Running;
        log::info!("Resumed");
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Fresh state for the current world, back to Idle
    pub fn restart(&mut self) {
        if self.shut_down {
            return;
        }
        apply(&mut self.state, Action::Reset);
        self.effects = ActiveEffects::default();
        self.accumulator = 0.0;
        self.phase = GamePhase::Idle;
    }

    /// Host viewport changed
    pub fn resize(&mut self, width: f64, height: f64) {
        self.state.resize(width, height);
        if self.phase == GamePhase::Idle {
            // Nothing in play yet: re-seat the player on the new ground
            apply(&mut self.state, Action::Reset);
        }
    }

    /// Stop ticking for good; later calls are no-ops
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.accumulator = 0.0;
        self.translator.release_all();
        log::info!("Game loop shut down");
    }

    /// Account for `delta_ms` of wall time; returns ticks run
    pub fn advance(&mut self, delta_ms: f64) -> u32 {
        if self.shut_down || self.phase != GamePhase::Running {
            return 0;
        }

        let delta = if delta_ms > MAX_FRAME_MS {
            log::warn!("Frame delta {:.1}ms clamped to {}ms", delta_ms, MAX_FRAME_MS);
            MAX_FRAME_MS
        } else {
            delta_ms.max(0.0)
        };
        self.accumulator += delta;

        let tick_ms = self.state.tuning.tick_ms();
        let mut substeps = 0;
        while self.accumulator >= tick_ms && substeps < MAX_SUBSTEPS {
            self.run_tick();
            self.accumulator -= tick_ms;
            substeps += 1;
            if self.phase != GamePhase::Running {
                self.accumulator = 0.0;
                break;
            }
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(tick_ms);
        }
        substeps
    }

    fn run_tick(&mut self) {
        apply(&mut self.state, Action::Update);
        if self.effects.shield_ticks > 0 && !self.state.capabilities.shield {
            // Spent on a hit during this tick
            self.effects.shield_ticks = 0;
        }
        self.effects.tick();
        if !self.state.is_over {
            self.collect_power_ups();
        }
        self.state.capabilities = self.effects.capabilities();
        self.sync_phase();
    }

    /// Raise `CollectPowerUp` for every active power-up touching the player
    fn collect_power_ups(&mut self) {
        let hitbox = self.state.player.hitbox();
        let touched: Vec<(usize, PowerUpKind)> = self
            .state
            .power_ups
            .iter()
            .enumerate()
            .filter(|(_, p)| p.active && intersects(&hitbox, &p.body.aabb()))
            .map(|(i, p)| (i, p.kind))
            .collect();

        // Highest index first so earlier indices stay valid
        for (index, kind) in touched.into_iter().rev() {
            apply(&mut self.state, Action::CollectPowerUp(index));
            if self.state.tuning.power_ups_grant_shot {
                self.effects.grant_power_shot();
                log::debug!("Power shot granted");
            } else {
                self.effects.grant(kind);
                log::debug!("{:?} effect granted", kind);
            }
        }
    }

    fn sync_phase(&mut self) {
        if !self.state.is_over || self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.accumulator = 0.0;
        let score = self.state.score;
        match self
            .high_scores
            .add_score(score, self.state.tuning.mode, self.state.ticks)
        {
            Some(rank) => log::info!("Game over: score {} (rank {})", score, rank),
            None => log::info!("Game over: score {}", score),
        }
    }
}
