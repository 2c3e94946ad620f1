//! Browser adapter
//!
//! The page owns the canvas and the `requestAnimationFrame` loop; it forwards
//! DOM events and frame deltas here and reads back a JSON snapshot to draw.

use wasm_bindgen::prelude::*;
use web_sys::{KeyboardEvent, TouchEvent};

use crate::game_loop::GameLoop;
use crate::input::{Key, RawInput};
use crate::preview::PreviewScene;
use crate::renderer::DrawList;
use crate::settings::Settings;
use crate::tuning::{GameMode, Tuning};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

#[wasm_bindgen]
pub struct WebRunner {
    game: GameLoop,
    preview: PreviewScene,
    draw_list: DrawList,
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl WebRunner {
    /// `mode` is "runner" or "storm"; `tuning_json` overrides the mode's balance
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f64,
        height: f64,
        mode: &str,
        tuning_json: Option<String>,
    ) -> Result<WebRunner, JsError> {
        let mode = GameMode::from_str(mode).unwrap_or_default();
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json)?,
            None => Tuning::for_mode(mode),
        };
        let seed = js_sys::Date::now() as u64;
        Ok(WebRunner {
            game: GameLoop::new(width, height, tuning, seed),
            preview: PreviewScene::new(Settings::default(), seed ^ 0x5EED),
            draw_list: DrawList::new(),
            width,
            height,
        })
    }

    pub fn key_down(&mut self, event: &KeyboardEvent) {
        if let Some(key) = Key::from_code(&event.code()) {
            event.prevent_default();
            self.game.handle_input(RawInput::KeyDown {
                key,
                repeat: event.repeat(),
            });
        }
    }

    pub fn key_up(&mut self, event: &KeyboardEvent) {
        if let Some(key) = Key::from_code(&event.code()) {
            self.game.handle_input(RawInput::KeyUp { key });
        }
    }

    pub fn touch_start(&mut self, event: &TouchEvent) {
        if let Some(touch) = event.changed_touches().get(0) {
            event.prevent_default();
            // clientY is relative to the viewport
            let screen_height = web_sys::window()
                .and_then(|w| w.inner_height().ok())
                .and_then(|h| h.as_f64())
                .unwrap_or(self.height);
            self.game.handle_input(RawInput::TouchStart {
                y: touch.client_y() as f64,
                screen_height,
            });
        }
    }

    pub fn touch_end(&mut self, _event: &TouchEvent) {
        self.game.handle_input(RawInput::TouchEnd);
    }

    /// Start button / overlay click
    pub fn start(&mut self) {
        self.game.start();
    }

    pub fn toggle_pause(&mut self) {
        self.game.toggle_pause();
    }

    pub fn restart(&mut self) {
        self.game.restart();
    }

    /// Tab hidden or window blurred
    pub fn blur(&mut self) {
        self.game.pause();
    }

    /// Advance by one animation frame; returns ticks run
    pub fn frame(&mut self, delta_ms: f64) -> u32 {
        self.game.advance(delta_ms)
    }

    /// Menu background vertices (x, y, r, g, b, a as f32) for this frame
    pub fn preview_frame(&mut self, delta_ms: f64) -> Vec<u8> {
        self.draw_list.clear();
        self.preview
            .render(&mut self.draw_list, self.width, self.height, delta_ms);
        self.draw_list.as_bytes().to_vec()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.game.resize(width, height);
    }

    pub fn snapshot_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.game.snapshot())?)
    }

    pub fn high_scores_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(self.game.high_scores())?)
    }

    /// Stop ticking; the page drops its listeners and frame loop
    pub fn dispose(&mut self) {
        self.game.shutdown();
    }
}
