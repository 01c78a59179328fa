use crate::animation::Easing;
use crate::nav::HeightPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG: &str = include_str!("../../assets/default_config.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

fn default_title() -> String { "smooth track".to_string() }

impl Default for WindowConfig {
    fn default() -> Self {
        Self { width: 1280, height: 760, title: default_title() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub target_fps: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { target_fps: 120 }
    }
}

/// Scroll physics. All factors are per frame, not per second.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub friction: f32,
    pub spring_factor: f32,
    pub drag_speed: f32,
    pub elasticity: f32,
    pub wheel_debounce_ms: u64,
    /// Pixels per wheel "line" for devices that report line deltas.
    pub line_scroll_px: f32,
    pub jump_duration_secs: f32,
    pub jump_easing: Easing,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction: 0.08,
            spring_factor: 0.2,
            drag_speed: 1.5,
            elasticity: 0.2,
            wheel_debounce_ms: 100,
            line_scroll_px: 20.0,
            jump_duration_secs: 2.5,
            jump_easing: Easing::ExpoOut,
        }
    }
}

impl PhysicsConfig {
    /// Jump length as a `Duration`. Values a `Duration` cannot hold (infinite,
    /// NaN or huge) fall back to the default; negatives mean no animation.
    pub fn jump_duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.jump_duration_secs.max(0.0)).unwrap_or_else(|_| {
            let fallback = Self::default().jump_duration_secs;
            log::warn!(
                "jump_duration_secs = {} is out of range, using {}",
                self.jump_duration_secs,
                fallback
            );
            Duration::from_secs_f32(fallback)
        })
    }
}

/// Bottom navigation indicator. Sizes are logical pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub height_policy: HeightPolicy,
    pub falloff_k: f32,
    pub base_height: f32,
    pub peak_height: f32,
    pub neighbor_height: f32,
    pub base_opacity: f32,
    pub neighbor_opacity: f32,
    pub scroll_lerp: f32,
    pub hover_lerp: f32,
    pub line_width: f32,
    pub line_spacing: f32,
    pub bottom_margin: f32,
    pub label_fade_ms: u64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            height_policy: HeightPolicy::Proximity,
            falloff_k: 3.0,
            base_height: 20.0,
            peak_height: 32.0,
            neighbor_height: 24.0,
            base_opacity: 0.1,
            neighbor_opacity: 0.3,
            scroll_lerp: 0.1,
            hover_lerp: 0.2,
            line_width: 2.0,
            line_spacing: 14.0,
            bottom_margin: 36.0,
            label_fade_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HintConfig {
    pub text: String,
    pub threshold_px: f32,
    pub fade_ms: u64,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            text: "Scroll or drag to explore".to_string(),
            threshold_px: 50.0,
            fade_ms: 500,
        }
    }
}

/// Track layout, expressed as fractions of the viewport width.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    pub gap: f32,
    pub padding: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self { gap: 0.04, padding: 0.2 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub background: String,
    pub foreground: String,
    pub nav_line: String,
    pub label: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            background: "#0b0b0c".to_string(),
            foreground: "#f2f0ea".to_string(),
            nav_line: "#f2f0ea".to_string(),
            label: "#f2f0ea".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    pub name: String,
    /// Width as a fraction of the viewport width (0.6 = 60vw).
    pub width: f32,
    #[serde(default = "default_section_color")]
    pub color: String,
}

fn default_section_color() -> String { "#1c1b1f".to_string() }

fn default_sections() -> Vec<SectionConfig> {
    ["Definition", "Origin", "Practice", "Work", "Contact"]
        .iter()
        .map(|name| SectionConfig {
            name: name.to_string(),
            width: 0.6,
            color: default_section_color(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub nav: NavConfig,
    #[serde(default)]
    pub hint: HintConfig,
    #[serde(default)]
    pub track: TrackConfig,
    #[serde(default)]
    pub colors: ColorsConfig,
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            animation: AnimationConfig::default(),
            physics: PhysicsConfig::default(),
            nav: NavConfig::default(),
            hint: HintConfig::default(),
            track: TrackConfig::default(),
            colors: ColorsConfig::default(),
            sections: default_sections(),
        }
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("~/.config"));
        base.join("smooth_track").join("config.toml")
    }

    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&contents)
    }

    /// Write the embedded default config if nothing exists at `path` yet.
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(path, DEFAULT_CONFIG)
            .with_context(|| format!("writing {}", path.display()))
    }

    pub fn load_or_default() -> Self {
        let path = Self::config_path();
        if path.exists() {
            match Self::load(&path) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("Failed to load config at {:?}: {:#}", path, e),
            }
        } else if let Err(e) = Self::write_default(&path) {
            log::warn!("Could not write default config: {:#}", e);
        }
        Self::parse(DEFAULT_CONFIG).unwrap_or_default()
    }
}

/// Whether light text reads better than dark text on `rgba`.
pub fn is_dark(rgba: [f32; 4]) -> bool {
    let lum = 0.299 * rgba[0] + 0.587 * rgba[1] + 0.114 * rgba[2];
    lum < 0.5
}

pub fn parse_hex_color(hex: &str) -> Option<[f32; 4]> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
    } else if hex.len() == 8 {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
        Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0])
    } else {
        None
    }
}
