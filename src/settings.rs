//! Player preferences
//!
//! Stored as JSON under a single LocalStorage key; native builds always
//! start from defaults.

use serde::{Deserialize, Serialize};

use crate::consts::SENSITIVITY_DEFAULT;
use crate::input::clamp_sensitivity;
use crate::renderer::SceneOptions;

/// Graphics detail level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

/// What a preset allows the scene builder to spend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderBudget {
    pub max_particles: usize,
    pub starfield: bool,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 3] = [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High];

    pub fn label(self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Case-insensitive lookup by label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn budget(self) -> RenderBudget {
        match self {
            QualityPreset::Low => RenderBudget {
                max_particles: 60,
                starfield: false,
            },
            QualityPreset::Medium => RenderBudget {
                max_particles: 300,
                starfield: true,
            },
            QualityPreset::High => RenderBudget {
                max_particles: 1500,
                starfield: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Hand-movement sensitivity, restored on the next visit
    pub sensitivity: f32,
    pub quality: QualityPreset,
    /// Explosion debris on or off
    pub particles: bool,
    /// Background star-field; the Low preset forces it off
    pub starfield: bool,
    /// 0.0 - 1.0
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensitivity: SENSITIVITY_DEFAULT,
            quality: QualityPreset::default(),
            particles: true,
            starfield: true,
            master_volume: 0.8,
            muted: false,
        }
    }
}

/// LocalStorage key
pub const STORAGE_KEY: &str = "neon_vader_settings";

impl Settings {
    /// Switch preset; the star-field follows the preset's budget
    pub fn set_quality(&mut self, quality: QualityPreset) {
        self.quality = quality;
        self.starfield = quality.budget().starfield;
    }

    pub fn toggle_muted(&mut self) {
        self.muted = !self.muted;
    }

    pub fn set_sensitivity(&mut self, value: f32) {
        self.sensitivity = clamp_sensitivity(value);
    }

    /// Render options derived from these settings
    pub fn scene_options(&self) -> SceneOptions {
        let budget = self.quality.budget();
        SceneOptions {
            draw_stars: self.starfield && budget.starfield,
            max_particles: if self.particles { budget.max_particles } else { 0 },
        }
    }

    /// Volume to hand the audio engine
    pub fn volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    /// Parse stored JSON, repairing out-of-range values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sensitivity = clamp_sensitivity(settings.sensitivity);
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = local_storage().and_then(|s| s.get_item(STORAGE_KEY).ok().flatten());
        match stored.as_deref().map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Restored settings (sensitivity {:.2})", settings.sensitivity);
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring stored settings: {e}");
                Self::default()
            }
            None => Self::default(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = local_storage() else {
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(STORAGE_KEY, &json).is_err() {
                    log::warn!("LocalStorage rejected settings");
                }
            }
            Err(e) => log::warn!("Could not serialize settings: {e}"),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SENSITIVITY_MAX;

    fn at(quality: QualityPreset) -> Settings {
        let mut settings = Settings::default();
        settings.set_quality(quality);
        settings
    }

    #[test]
    fn test_low_quality_drops_starfield() {
        let options = at(QualityPreset::Low).scene_options();
        assert!(!options.draw_stars);
        assert_eq!(options.max_particles, 60);
    }

    #[test]
    fn test_low_budget_overrides_stored_starfield() {
        let settings = Settings {
            quality: QualityPreset::Low,
            starfield: true,
            ..Settings::default()
        };
        assert!(!settings.scene_options().draw_stars);
    }

    #[test]
    fn test_particles_off_caps_to_zero() {
        let settings = Settings {
            particles: false,
            ..at(QualityPreset::High)
        };
        assert_eq!(settings.scene_options().max_particles, 0);
    }

    #[test]
    fn test_muted_volume() {
        let mut settings = Settings::default();
        assert!((settings.volume() - 0.8).abs() < 1e-6);
        settings.toggle_muted();
        assert_eq!(settings.volume(), 0.0);
        settings.toggle_muted();
        assert!(settings.volume() > 0.0);
    }

    #[test]
    fn test_switching_back_up_restores_starfield() {
        let mut settings = at(QualityPreset::Low);
        assert!(!settings.scene_options().draw_stars);
        settings.set_quality(QualityPreset::from_label("High").unwrap_or_default());
        assert!(settings.scene_options().draw_stars);
        assert_eq!(settings.scene_options().max_particles, 1500);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings = Settings::from_json(r#"{"sensitivity": 1.2}"#).unwrap();
        assert_eq!(settings.sensitivity, 1.2);
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert!(settings.starfield);
    }

    #[test]
    fn test_quality_serializes_lowercase() {
        let json = serde_json::to_string(&at(QualityPreset::High)).unwrap();
        assert!(json.contains(r#""quality":"high""#));
    }

    #[test]
    fn test_stored_values_are_clamped() {
        let settings =
            Settings::from_json(r#"{"sensitivity": 9.0, "master_volume": 3.0}"#).unwrap();
        assert_eq!(settings.sensitivity, SENSITIVITY_MAX);
        assert_eq!(settings.master_volume, 1.0);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_label_lookup() {
        assert_eq!(QualityPreset::from_label(" HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::from_label("medium"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_label("ultra"), None);
        for preset in QualityPreset::ALL {
            assert_eq!(QualityPreset::from_label(preset.label()), Some(preset));
        }
    }
}
