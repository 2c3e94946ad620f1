//! Input translation
//!
//! Maps raw keyboard/touch events to commands for the game loop. Only edges
//! are forwarded: a key that is already held never fires again until released.

use serde::{Deserialize, Serialize};

use crate::game_loop::GamePhase;
use crate::sim::Action;

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Space,
    ArrowDown,
    /// Fires while the power shot is active
    ArrowRight,
    Escape,
}

impl Key {
    /// From a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Space" => Some(Key::Space),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowRight" => Some(Key::ArrowRight),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Device-level input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    /// `repeat` is the OS auto-repeat flag
    KeyDown { key: Key, repeat: bool },
    KeyUp { key: Key },
    /// Touch began at `y` on a screen `screen_height` tall
    TouchStart { y: f64, screen_height: f64 },
    TouchEnd,
}

/// What the game loop should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Resume,
    Pause,
    /// Reset after a finished run
    Restart,
    Sim(Action),
}

/// Edge-triggered translator; tracks which keys are down
#[derive(Debug, Clone, Default)]
pub struct InputTranslator {
    space_held: bool,
    down_held: bool,
    right_held: bool,
    escape_held: bool,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    fn held_mut(&mut self, key: Key) -> &mut bool {
        match key {
            Key::Space => &mut self.space_held,
            Key::ArrowDown => &mut self.down_held,
            Key::ArrowRight => &mut self.right_held,
            Key::Escape => &mut self.escape_held,
        }
    }

    #[cfg(test)]
    fn is_held(&self, key: Key) -> bool {
        match key {
            Key::Space => self.space_held,
            Key::ArrowDown => self.down_held,
            Key::ArrowRight => self.right_held,
            Key::Escape => self.escape_held,
        }
    }

    /// Forget held keys (focus lost, listeners detached)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    pub fn translate(&mut self, input: RawInput, phase: GamePhase) -> Option<Command> {
        match input {
            RawInput::KeyDown { key, repeat } => {
                let held = self.held_mut(key);
                if repeat || *held {
                    return None;
                }
                *held = true;
                Self::key_press(key, phase)
            }
            RawInput::KeyUp { key } => {
                *self.held_mut(key) = false;
                match key {
                    Key::ArrowDown => Some(Command::Sim(Action::SlideEnd)),
                    Key::Space | Key::ArrowRight | Key::Escape => None,
                }
            }
            RawInput::TouchStart { y, screen_height } => {
                if phase != GamePhase::Running {
                    return None;
                }
                if y < screen_height / 2.0 {
                    Some(Command::Sim(Action::Jump))
                } else {
                    Some(Command::Sim(Action::SlideStart))
                }
            }
            RawInput::TouchEnd => Some(Command::Sim(Action::SlideEnd)),
        }
    }

    fn key_press(key: Key, phase: GamePhase) -> Option<Command> {
        match (key, phase) {
            (Key::Space, GamePhase::Running) => Some(Command::Sim(Action::Jump)),
            (Key::Space, GamePhase::Idle) => Some(Command::Start),
            (Key::Space, GamePhase::Paused) => Some(Command::Resume),
            (Key::Space, GamePhase::GameOver) => Some(Command::Restart),
            (Key::ArrowDown, GamePhase::Running) => Some(Command::Sim(Action::SlideStart)),
            (Key::ArrowDown, _) => None,
            (Key::ArrowRight, GamePhase::Running) => Some(Command::Sim(Action::Shoot)),
            (Key::ArrowRight, _) => None,
            (Key::Escape, GamePhase::Running) => Some(Command::Pause),
            (Key::Escape, GamePhase::Paused) => Some(Command::Resume),
            (Key::Escape, _) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(key: Key) -> RawInput {
        RawInput::KeyDown { key, repeat: false }
    }

    #[test]
    fn test_space_by_phase() {
        let mut t = InputTranslator::new();
        let cases = [
            (GamePhase::Idle, Command::Start),
            (GamePhase::Running, Command::Sim(Action::Jump)),
            (GamePhase::Paused, Command::Resume),
            (GamePhase::GameOver, Command::Restart),
        ];
        for (phase, expected) in cases {
            assert_eq!(t.translate(down(Key::Space), phase), Some(expected));
            t.translate(RawInput::KeyUp { key: Key::Space }, phase);
        }
    }

    #[test]
    fn test_held_key_is_edge_triggered() {
        let mut t = InputTranslator::new();
        let phase = GamePhase::Running;
        assert_eq!(
            t.translate(down(Key::ArrowDown), phase),
            Some(Command::Sim(Action::SlideStart))
        );
        assert!(t.is_held(Key::ArrowDown));
        // Browsers without the repeat flag still resend keydown
        assert_eq!(t.translate(down(Key::ArrowDown), phase), None);
        assert_eq!(
            t.translate(
                RawInput::KeyDown {
                    key: Key::ArrowDown,
                    repeat: true
                },
                phase
            ),
            None
        );
        assert_eq!(
            t.translate(RawInput::KeyUp { key: Key::ArrowDown }, phase),
            Some(Command::Sim(Action::SlideEnd))
        );
        assert_eq!(
            t.translate(down(Key::ArrowDown), phase),
            Some(Command::Sim(Action::SlideStart))
        );
    }

    #[test]
    fn test_repeat_flag_on_first_press_is_ignored() {
        let mut t = InputTranslator::new();
        let input = RawInput::KeyDown {
            key: Key::Space,
            repeat: true,
        };
        assert_eq!(t.translate(input, GamePhase::Running), None);
        assert!(!t.is_held(Key::Space));
    }

    #[test]
    fn test_escape_toggles_pause() {
        let mut t = InputTranslator::new();
        assert_eq!(t.translate(down(Key::Escape), GamePhase::Running), Some(Command::Pause));
        t.translate(RawInput::KeyUp { key: Key::Escape }, GamePhase::Paused);
        assert_eq!(t.translate(down(Key::Escape), GamePhase::Paused), Some(Command::Resume));
        t.translate(RawInput::KeyUp { key: Key::Escape }, GamePhase::Running);
        assert_eq!(t.translate(down(Key::Escape), GamePhase::Idle), None);
    }

    #[test]
    fn test_touch_halves() {
        let mut t = InputTranslator::new();
        let phase = GamePhase::Running;
        let upper = RawInput::TouchStart {
            y: 100.0,
            screen_height: 400.0,
        };
        let lower = RawInput::TouchStart {
            y: 200.0,
            screen_height: 400.0,
        };
        assert_eq!(t.translate(upper, phase), Some(Command::Sim(Action::Jump)));
        assert_eq!(t.translate(lower, phase), Some(Command::Sim(Action::SlideStart)));
        assert_eq!(
            t.translate(RawInput::TouchEnd, phase),
            Some(Command::Sim(Action::SlideEnd))
        );
        assert_eq!(t.translate(upper, GamePhase::Paused), None);
    }

    #[test]
    fn test_arrow_right_shoots_once_per_press() {
        let mut t = InputTranslator::new();
        let phase = GamePhase::Running;
        assert_eq!(
            t.translate(down(Key::ArrowRight), phase),
            Some(Command::Sim(Action::Shoot))
        );
        assert_eq!(t.translate(down(Key::ArrowRight), phase), None);
        assert_eq!(t.translate(RawInput::KeyUp { key: Key::ArrowRight }, phase), None);
        assert!(!t.is_held(Key::ArrowRight));
        assert_eq!(t.translate(down(Key::ArrowRight), GamePhase::Paused), None);
    }

    #[test]
    fn test_touch_split_follows_viewport_height() {
        let mut t = InputTranslator::new();
        // Canvas 400 tall inside an 800 tall viewport
        let touch = RawInput::TouchStart {
            y: 300.0,
            screen_height: 800.0,
        };
        assert_eq!(
            t.translate(touch, GamePhase::Running),
            Some(Command::Sim(Action::Jump))
        );
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("Space"), Some(Key::Space));
        assert_eq!(Key::from_code("ArrowDown"), Some(Key::ArrowDown));
        assert_eq!(Key::from_code("ArrowRight"), Some(Key::ArrowRight));
        assert_eq!(Key::from_code("Escape"), Some(Key::Escape));
        assert_eq!(Key::from_code("KeyA"), None);
    }

    #[test]
    fn test_release_all() {
        let mut t = InputTranslator::new();
        t.translate(down(Key::Space), GamePhase::Running);
        t.release_all();
        assert!(!t.is_held(Key::Space));
    }
}
