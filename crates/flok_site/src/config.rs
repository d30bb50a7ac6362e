//! Flok configuration file handling

use anyhow::{Context, Result};
use flok_motion::MotionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up inside a directory
pub const CONFIG_FILE: &str = "flok.toml";

/// Top-level Flok configuration (flok.toml)
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Window the page is laid out in
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    1440.0
}

fn default_height() -> f32 {
    900.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Headless run settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RunConfig {
    /// Frames to simulate
    #[serde(default = "default_frames")]
    pub frames: usize,
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Window scroll speed in pixels per second
    #[serde(default = "default_scroll_speed")]
    pub scroll_speed: f32,
    /// Scroll offset before the first frame
    #[serde(default)]
    pub start_scroll: f32,
}

fn default_frames() -> usize {
    600
}

fn default_fps() -> u32 {
    60
}

fn default_scroll_speed() -> f32 {
    900.0
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            fps: default_fps(),
            scroll_speed: default_scroll_speed(),
            start_scroll: 0.0,
        }
    }
}

impl RunConfig {
    /// Seconds per simulated frame
    pub fn frame_interval(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

impl SiteConfig {
    /// Load configuration from a file, or from `flok.toml` inside a directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found in {}. Run `flok init` to create one.",
                CONFIG_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the page cannot be laid out or run with
    pub fn validate(&self) -> Result<()> {
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            anyhow::bail!(
                "viewport must have a positive size, got {}x{}",
                self.viewport.width,
                self.viewport.height
            );
        }
        if !(self.viewport.width.is_finite() && self.viewport.height.is_finite()) {
            anyhow::bail!("viewport size must be finite");
        }
        if self.run.fps == 0 {
            anyhow::bail!("run.fps must be at least 1");
        }
        if !(self.run.scroll_speed.is_finite() && self.run.start_scroll.is_finite()) {
            anyhow::bail!("run.scroll_speed and run.start_scroll must be finite");
        }

        let motion = &self.motion;
        for (name, value) in [
            ("counter_duration", motion.counter_duration),
            ("marquee_duration", motion.marquee_duration),
        ] {
            if !(value.is_finite() && value > 0.0) {
                anyhow::bail!("motion.{name} must be a positive number of seconds, got {value}");
            }
        }
        for (name, value) in [
            ("scrub_smoothing", motion.scrub_smoothing),
            ("word_stagger", motion.word_stagger),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                anyhow::bail!("motion.{name} must not be negative, got {value}");
            }
        }
        for (name, value) in [
            ("counter_threshold", motion.counter_threshold),
            ("arrow_threshold", motion.arrow_threshold),
            ("reveal_start", motion.reveal_start),
        ] {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("motion.{name} must be between 0 and 1, got {value}");
            }
        }
        if !motion.counter_margin_bottom.is_finite() {
            anyhow::bail!("motion.counter_margin_bottom must be finite");
        }
        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flok_animation::Easing;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = SiteConfig::from_toml("").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.viewport.width, 1440.0);
        assert_eq!(config.run.fps, 60);
    }

    #[test]
    fn test_partial_sections() {
        let config = SiteConfig::from_toml(
            r#"
            [viewport]
            height = 700

            [motion]
            reduced_motion = true
            counter_easing = "power2.inOut"

            [run]
            frames = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.viewport.width, 1440.0);
        assert_eq!(config.viewport.height, 700.0);
        assert!(config.motion.reduced_motion);
        assert_eq!(config.motion.counter_easing, Easing::EaseInOutCubic);
        assert_eq!(config.motion.word_stagger, 0.015);
        assert_eq!(config.run.frames, 30);
        assert_eq!(config.run.scroll_speed, 900.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(SiteConfig::from_toml("[viewport]\nwidth = 0").is_err());
        assert!(SiteConfig::from_toml("[run]\nfps = 0").is_err());
        assert!(SiteConfig::from_toml("[motion]\nscrub_smoothing = -1.0").is_err());
        assert!(SiteConfig::from_toml("[run]\nscroll_speed = inf").is_err());
    }

    #[test]
    fn test_rejects_bad_motion_values() {
        for bad in [
            "counter_duration = -1.0",
            "counter_duration = 0.0",
            "counter_duration = nan",
            "marquee_duration = 0.0",
            "word_stagger = -0.1",
            "word_stagger = nan",
            "counter_threshold = nan",
            "counter_threshold = 1.5",
            "arrow_threshold = -0.2",
            "reveal_start = 2.0",
            "counter_margin_bottom = -inf",
        ] {
            let text = format!("[motion]\n{bad}");
            assert!(SiteConfig::from_toml(&text).is_err(), "{bad}");
        }
        assert!(SiteConfig::from_toml("[motion]\nword_stagger = 0.0\nreveal_start = 1.0").is_ok());
    }

    #[test]
    fn test_run_rejects_bad_motion_values() {
        let mut config = SiteConfig::default();
        config.motion.counter_duration = -1.0;
        assert!(crate::run(&config).is_err());
    }

    #[test]
    fn test_round_trip() {
        let mut config = SiteConfig::default();
        config.run.frames = 42;
        let text = config.to_toml().unwrap();
        assert_eq!(SiteConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = SiteConfig::load_from_dir(Path::new("/definitely/not/here")).unwrap_err();
        assert!(err.to_string().contains("flok init"));
    }
}
