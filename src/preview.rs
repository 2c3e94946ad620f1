//! Decorative menu preview
//!
//! A looping night scene drawn behind the start menu: parallax stars, a ground
//! band and a bobbing runner silhouette. It has its own clock and RNG and never
//! touches gameplay state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{DrawList, colors};
use crate::settings::Settings;

/// Band at the top of the ground where stars never appear
const STAR_FLOOR_MARGIN: f32 = 100.0;
const GROUND_BAND: f32 = 80.0;
const RUNNER_SIZE: f32 = 40.0;
const RUNNER_X_FRACTION: f32 = 0.3;
/// Nominal frame length the star speeds are expressed in
const FRAME_MS: f32 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    /// Pixels per nominal frame
    pub speed: f32,
    pub size: f32,
    /// Twinkle phase in [0, 1)
    pub brightness: f32,
}

#[derive(Debug)]
pub struct PreviewScene {
    rng: Pcg32,
    settings: Settings,
    stars: Vec<Star>,
    elapsed_ms: f64,
}

impl PreviewScene {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            settings,
            stars: Vec::new(),
            elapsed_ms: 0.0,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap preferences; the starfield is rebuilt on the next frame
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.stars.clear();
    }

    fn star_band(&mut self, height: f32) -> f32 {
        self.rng.random::<f32>() * (height - STAR_FLOOR_MARGIN).max(0.0)
    }

    fn init_stars(&mut self, width: f32, height: f32) {
        let count = self.settings.quality.star_count();
        self.stars = (0..count)
            .map(|_| Star {
                pos: Vec2::new(self.rng.random::<f32>() * width, self.star_band(height)),
                speed: 0.1 + self.rng.random::<f32>() * 0.5,
                size: 1.0 + self.rng.random::<f32>() * 2.0,
                brightness: self.rng.random(),
            })
            .collect();
    }

    fn update_stars(&mut self, width: f32, height: f32, delta_ms: f32) {
        let scale = delta_ms / FRAME_MS;
        for i in 0..self.stars.len() {
            self.stars[i].pos.x -= self.stars[i].speed * scale;
            if self.stars[i].pos.x < 0.0 {
                let y = self.star_band(height);
                let brightness = self.rng.random();
                let star = &mut self.stars[i];
                star.pos = Vec2::new(width, y);
                star.brightness = brightness;
            }
        }
    }

    /// Bobbing phase, frozen under reduced motion
    fn motion_time(&self) -> f32 {
        if self.settings.reduced_motion {
            0.0
        } else {
            (self.elapsed_ms * 0.005) as f32
        }
    }

    /// Top-left of the runner silhouette this frame
    pub fn runner_origin(&self, width: f32, height: f32) -> Vec2 {
        let bounce = self.motion_time().sin() * 5.0;
        Vec2::new(width * RUNNER_X_FRACTION, height - STAR_FLOOR_MARGIN + bounce)
    }

    /// Advance the clock by `delta_ms` and draw one frame
    pub fn render(&mut self, ctx: &mut DrawList, width: f64, height: f64, delta_ms: f64) {
        let (width, height) = (width as f32, height as f32);
        let delta = delta_ms.max(0.0);
        self.elapsed_ms += delta;

        if self.stars.len() != self.settings.quality.star_count() {
            self.init_stars(width, height);
        }

        // Sky
        ctx.gradient_rect(
            Vec2::ZERO,
            Vec2::new(width, height),
            colors::SKY_TOP,
            colors::SKY_BOTTOM,
        );

        // Stars
        self.update_stars(width, height, delta as f32);
        let twinkle_time = (self.elapsed_ms * 0.001) as f32;
        for star in &self.stars {
            let twinkle = ((twinkle_time + star.brightness * 10.0).sin() + 1.0) * 0.5;
            ctx.rect(
                star.pos,
                Vec2::splat(star.size),
                [1.0, 1.0, 1.0, 0.2 + twinkle * 0.8],
            );
        }

        // Ground
        ctx.gradient_rect(
            Vec2::new(0.0, height - GROUND_BAND),
            Vec2::new(width, GROUND_BAND),
            colors::GROUND_TOP,
            colors::GROUND_BOTTOM,
        );

        // Runner and its two running shadows
        let origin = self.runner_origin(width, height);
        let time = self.motion_time();
        ctx.rect(origin, Vec2::splat(RUNNER_SIZE), colors::RUNNER);
        let shadow = Vec2::splat(RUNNER_SIZE - 10.0);
        ctx.rect(
            origin + Vec2::new(-20.0 + time.sin() * 20.0, 10.0),
            shadow,
            colors::SHADOW,
        );
        ctx.rect(
            origin + Vec2::new(40.0 + (time + std::f32::consts::PI).sin() * 20.0, 5.0),
            shadow,
            colors::SHADOW,
        );

        // Ambient particles
        let segments = self.settings.quality.circle_segments();
        for i in 0..self.settings.particle_count() {
            let i = i as f32;
            let center = Vec2::new(
                ((twinkle_time + i).sin() * 0.5 + 0.5) * width,
                ((twinkle_time + i * 0.7).cos() * 0.3 + 0.5) * height,
            );
            let radius = ((twinkle_time + i * 0.5).sin() + 1.0) * 3.0;
            ctx.circle(center, radius, colors::PARTICLE, segments);
        }
    }
}
