//! Nex Runner headless entry point
//!
//! Plays one game with a simple autopilot at the fixed tick rate and logs the
//! result. The browser build drives the library through `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use nex_runner::consts::DEFAULT_SEED;
    use nex_runner::input::{Key, RawInput};
    use nex_runner::sim::{Obstacle, ObstacleKind, Player};
    use nex_runner::{FrameSnapshot, GameLoop, GameMode, GamePhase, Tuning};

    #[derive(Parser)]
    #[command(name = "nex-runner")]
    #[command(about = "Run a headless autopilot game and report the score")]
    struct Args {
        /// Game mode: runner or storm
        #[arg(default_value = "runner", value_parser = parse_mode)]
        mode: GameMode,

        /// RNG seed
        #[arg(default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Stop after this many ticks if still alive
        #[arg(default_value_t = 60 * 60 * 5)]
        ticks: u64,

        /// JSON tuning file overriding the mode's balance
        #[arg(long, env = "NEX_RUNNER_TUNING")]
        tuning: Option<PathBuf>,

        /// World size
        #[arg(long, default_value_t = 960.0)]
        width: f64,
        #[arg(long, default_value_t = 540.0)]
        height: f64,
    }

    fn parse_mode(s: &str) -> Result<GameMode, String> {
        GameMode::from_str(s).ok_or_else(|| format!("unknown mode `{s}` (expected runner or storm)"))
    }

    fn load_tuning(args: &Args) -> Result<Tuning> {
        let Some(path) = &args.tuning else {
            return Ok(Tuning::for_mode(args.mode));
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tuning file {}", path.display()))?;
        let tuning = Tuning::from_json(&json)
            .with_context(|| format!("Invalid tuning in {}", path.display()))?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Horizontal gap from the player's front edge to an obstacle's back edge
    fn gap(player: &Player, obstacle: &Obstacle) -> f64 {
        obstacle.body.position.x - (player.body.position.x + player.body.size.x)
    }

    /// What the autopilot wants to hold this tick
    struct Intent {
        jump: bool,
        slide: bool,
        shoot: bool,
    }

    fn decide(snap: &FrameSnapshot<'_>, speed: f64) -> Intent {
        let player = snap.sim.player;
        let mut intent = Intent {
            jump: false,
            slide: false,
            shoot: false,
        };
        for obstacle in snap.sim.obstacles {
            let gap = gap(player, obstacle);
            let passed = gap < -(obstacle.body.size.x + player.body.size.x);
            if passed {
                continue;
            }
            if snap.sim.capabilities.power_shot && gap > 0.0 && snap.sim.projectiles.is_empty() {
                intent.shoot = true;
            }
            match obstacle.kind {
                // Take off early enough to be high when the obstacle arrives
                ObstacleKind::Low => {
                    if gap > speed * 3.0 && gap <= speed * 8.0 {
                        intent.jump = true;
                    }
                }
                ObstacleKind::High => {
                    if gap <= speed * 6.0 {
                        intent.slide = true;
                    }
                }
            }
        }
        // Never leave the ground under a floating obstacle
        if intent.slide {
            intent.jump = false;
        }
        intent
    }

    fn press(game: &mut GameLoop, key: Key) {
        game.handle_input(RawInput::KeyDown { key, repeat: false });
    }

    fn release(game: &mut GameLoop, key: Key) {
        game.handle_input(RawInput::KeyUp { key });
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        let tuning = match load_tuning(&args) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{e:#}");
                return Err(e);
            }
        };
        let tick_ms = tuning.tick_ms();
        let ramp = tuning.clone();

        let mut game = GameLoop::new(args.width, args.height, tuning, args.seed);
        press(&mut game, Key::Space);
        release(&mut game, Key::Space);

        let mut ticks = 0u64;
        let mut sliding = false;
        while ticks < args.ticks && game.phase() == GamePhase::Running {
            let snap = game.snapshot();
            let mut speed = ramp.scroll_speed_at(ticks);
            if snap.sim.capabilities.speed_boost {
                speed *= ramp.speed_boost;
            }
            let intent = decide(&snap, speed);
            if intent.shoot {
                press(&mut game, Key::ArrowRight);
                release(&mut game, Key::ArrowRight);
            }
            if intent.jump {
                press(&mut game, Key::Space);
                release(&mut game, Key::Space);
            }
            if intent.slide != sliding {
                if intent.slide {
                    press(&mut game, Key::ArrowDown);
                } else {
                    release(&mut game, Key::ArrowDown);
                }
                sliding = intent.slide;
            }
            ticks += u64::from(game.advance(tick_ms));
        }

        let snap = game.snapshot();
        log::info!(
            "{} run finished after {} ticks: score {}{}",
            snap.mode.as_str(),
            ticks,
            snap.sim.score,
            if snap.sim.is_over { "" } else { " (alive)" }
        );
        if let Some(best) = game.high_scores().top_score() {
            log::debug!("Session best {}", best);
        }
        println!("{}", snap.sim.score);
        game.shutdown();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
