//! Player preferences
//!
//! Persisted as JSON in LocalStorage. Volumes are read every frame, so a
//! slider change takes effect mid-run.

use serde::{Deserialize, Serialize};

use crate::{Result, storage};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 120,
            QualityPreset::Medium => 400,
            QualityPreset::High => 1000,
        }
    }

    /// Whether to draw the starfield
    pub fn starfield_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    pub quality: QualityPreset,
    /// Camera shake on obstacle hits
    pub screen_shake: bool,
    /// Sparkles, debris, fire
    pub particles: bool,

    /// Reduced motion (no shake, no twinkle)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 0.5,
            sfx_volume: 0.5,
            quality: QualityPreset::Medium,
            screen_shake: true,
            particles: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "gorbage_truck_settings";

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Parse stored JSON; missing fields take defaults, volumes are clamped
    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.set_music_volume(settings.music_volume);
        settings.set_sfx_volume(settings.sfx_volume);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Stored settings, or defaults when there are none or they are unreadable
    pub fn load() -> Self {
        let Some(json) = storage::read(Self::STORAGE_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        match self.to_json() {
            Ok(json) => {
                if storage::write(Self::STORAGE_KEY, &json) {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Settings not saved: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!((s.music_volume, s.sfx_volume), (0.5, 0.5));
        assert_eq!(s.max_particles(), 400);
        assert!(s.effective_screen_shake());
    }

    #[test]
    fn test_particle_caps() {
        let mut s = Settings::default();
        s.quality = QualityPreset::Low;
        assert_eq!(s.max_particles(), 120);
        s.quality = QualityPreset::High;
        assert_eq!(s.max_particles(), 1000);
        s.particles = false;
        assert_eq!(s.max_particles(), 0);
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut s = Settings::default();
        s.reduced_motion = true;
        assert!(!s.effective_screen_shake());
    }

    #[test]
    fn test_from_json_fills_defaults_and_clamps() {
        let s = Settings::from_json(r#"{"music_volume": 3.0, "quality": "High"}"#).unwrap();
        assert_eq!(s.music_volume, 1.0);
        assert_eq!(s.sfx_volume, 0.5);
        assert_eq!(s.quality, QualityPreset::High);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Settings::from_json("not json"),
            Err(crate::Error::Parse(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let mut s = Settings::default();
        s.set_sfx_volume(0.25);
        s.reduced_motion = true;
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }
}
