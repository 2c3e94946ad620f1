//! Presentation preferences
//!
//! Only the decorative preview reads these; gameplay never does.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Parallax stars in the preview background
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 50,
            QualityPreset::High => 100,
        }
    }

    /// Segments per ambient particle circle
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 6,
            QualityPreset::Medium => 10,
            QualityPreset::High => 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Ambient particles in the preview
    pub particles: bool,
    /// Freeze bobbing and running shadows
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            particles: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        if preset == QualityPreset::Low {
            self.particles = false;
        }
    }

    /// Effective particle count for the preview
    pub fn particle_count(&self) -> usize {
        if self.particles { 20 } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_preset_strips_extras() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert_eq!(settings.quality.star_count(), 0);
        assert_eq!(settings.particle_count(), 0);
    }

    #[test]
    fn test_default_is_full_quality() {
        let settings = Settings::default();
        assert_eq!(settings.quality.star_count(), 100);
        assert_eq!(settings.particle_count(), 20);
        assert!(!settings.reduced_motion);
    }

    #[test]
    fn test_partial_json() {
        let settings: Settings = serde_json::from_str(r#"{ "reduced_motion": true }"#).unwrap();
        assert!(settings.reduced_motion);
        assert_eq!(settings.quality, QualityPreset::High);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }
}
