//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web, defaults natively.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
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

    /// The preset after this one, wrapping High back to Low
    pub fn next(self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live juice particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }

    /// Segments per full circle when tessellating
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 12,
            QualityPreset::Medium => 24,
            QualityPreset::High => 48,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Juice particles on slices
    pub particles: bool,
    /// Shadow blur on floating text and the combo banner
    pub glow: bool,
    /// "xN COMBO!" banner near the last cut
    pub combo_banner: bool,

    // === Accessibility ===
    /// Reduced motion (no glow)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            glow: true,
            combo_banner: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        // Glow costs extra fills per frame
        self.glow = preset != QualityPreset::Low;
    }

    /// Effective glow (respects reduced_motion)
    pub fn effective_glow(&self) -> bool {
        self.glow && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// LocalStorage key
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "fruit_slash_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }

    #[test]
    fn test_preset_cycle() {
        let mut q = QualityPreset::Low;
        let mut names = Vec::new();
        for _ in 0..3 {
            names.push(q.as_str());
            q = q.next();
        }
        assert_eq!(names, ["Low", "Medium", "High"]);
        assert_eq!(q, QualityPreset::Low);
        assert_eq!(QualityPreset::parse(QualityPreset::High.as_str()), Some(QualityPreset::High));
    }

    #[test]
    fn test_apply_preset_keeps_toggles() {
        let mut s = Settings {
            combo_banner: false,
            ..Settings::default()
        };
        s.apply_preset(QualityPreset::Low);
        assert!(!s.glow);
        s.apply_preset(QualityPreset::High);
        assert!(s.glow, "leaving Low restores glow");
        assert!(!s.combo_banner);
        assert_eq!(s.max_particles(), 2000);

        // Saving is a no-op off the web but must not disturb the value
        s.save();
        assert_eq!(s.quality, QualityPreset::High);
    }

    #[test]
    fn test_particle_cap() {
        let mut s = Settings::from_preset(QualityPreset::High);
        assert_eq!(s.max_particles(), 2000);
        s.particles = false;
        assert_eq!(s.max_particles(), 0);
    }

    #[test]
    fn test_low_preset_and_reduced_motion_drop_glow() {
        assert!(!Settings::from_preset(QualityPreset::Low).effective_glow());
        let mut s = Settings::default();
        assert!(s.effective_glow());
        s.reduced_motion = true;
        assert!(!s.effective_glow());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"quality":"Low"}"#).unwrap();
        assert_eq!(s.quality, QualityPreset::Low);
        assert!(s.particles && s.combo_banner);
    }
}
