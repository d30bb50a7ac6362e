//! Motion knobs
//!
//! Every tunable of the controllers lives here so a site configuration can
//! override it. Missing fields fall back to the defaults below.

use flok_animation::Easing;
use serde::{Deserialize, Serialize};

/// Motion configuration shared by every controller in a context
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Skip all motion and show final states immediately
    pub reduced_motion: bool,
    /// Seconds the hero playhead takes to catch up with scrolling
    pub scrub_smoothing: f32,
    /// Seconds between word fragments
    pub word_stagger: f32,
    /// Visible fraction for counters to start
    pub counter_threshold: f32,
    /// Bottom root margin for counters, in percent of the viewport
    pub counter_margin_bottom: f32,
    pub counter_duration: f32,
    pub counter_easing: Easing,
    /// Visible fraction for arrow rows to start
    pub arrow_threshold: f32,
    /// Viewport fraction an element's top must pass to reveal (0.85 = `top 85%`)
    pub reveal_start: f32,
    /// Seconds per marquee loop
    pub marquee_duration: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            scrub_smoothing: 1.0,
            word_stagger: 0.015,
            counter_threshold: 0.35,
            counter_margin_bottom: -10.0,
            counter_duration: 1.1,
            counter_easing: Easing::EaseOutQuart,
            arrow_threshold: 0.15,
            reveal_start: 0.85,
            marquee_duration: 12.0,
        }
    }
}

impl MotionConfig {
    /// Defaults with reduced motion turned on
    pub fn reduced() -> Self {
        Self {
            reduced_motion: true,
            ..Self::default()
        }
    }

    /// Defaults with scrubbing that follows scroll exactly
    pub fn immediate_scrub() -> Self {
        Self {
            scrub_smoothing: 0.0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: MotionConfig = toml::from_str(
            r#"
            reduced_motion = true
            counter_easing = "power2.out"
            "#,
        )
        .unwrap();
        assert!(config.reduced_motion);
        assert_eq!(config.counter_easing, Easing::EaseOutCubic);
        assert_eq!(config.marquee_duration, 12.0);
        assert_eq!(config.counter_threshold, 0.35);
    }

    #[test]
    fn test_bad_easing_is_rejected() {
        let result: Result<MotionConfig, _> = toml::from_str(r#"counter_easing = "wobble""#);
        assert!(result.is_err());
    }
}
