//! Animation presets for common entry animations
//!
//! Each preset is a from/to pair plus timing that can be dropped into a
//! [`TimelineBuilder`](crate::timeline::TimelineBuilder) step.

use crate::easing::Easing;
use crate::timeline::{Props, Timing};

/// A reusable from/to animation
#[derive(Clone, Debug, PartialEq)]
pub struct Preset {
    pub from: Props,
    pub to: Props,
    pub timing: Timing,
}

impl Preset {
    /// Builder: override per-target stagger
    pub fn stagger(mut self, stagger: f32) -> Self {
        self.timing.stagger = stagger;
        self
    }

    /// Builder: override duration
    pub fn duration(mut self, duration: f32) -> Self {
        self.timing.duration = duration;
        self
    }
}

/// Pre-built animation presets for common patterns
pub struct AnimationPreset;

impl AnimationPreset {
    // ========================================================================
    // Fades
    // ========================================================================

    /// Fade in from transparent to opaque
    pub fn fade_in(duration: f32) -> Preset {
        Preset {
            from: Props::new().opacity(0.0),
            to: Props::new().opacity(1.0),
            timing: Timing::new(duration).ease(Easing::EaseOutCubic),
        }
    }

    /// Fade in while rising from `distance` px below
    pub fn fade_up(duration: f32, distance: f32) -> Preset {
        Preset {
            from: Props::new().opacity(0.0).y(distance),
            to: Props::new().opacity(1.0).y(0.0),
            timing: Timing::new(duration).ease(Easing::EaseOutCubic),
        }
    }

    /// Fade in from a blur while rising slightly
    pub fn blur_in(duration: f32) -> Preset {
        Preset {
            from: Props::new().opacity(0.0).blur(12.0).y(10.0),
            to: Props::new().opacity(1.0).blur(0.0).y(0.0),
            timing: Timing::new(duration).ease(Easing::EaseOutCubic),
        }
    }

    // ========================================================================
    // Masks
    // ========================================================================

    /// Grow a circular mask from nothing to full coverage
    pub fn mask_reveal(duration: f32) -> Preset {
        Preset {
            from: Props::new().mask(0.0),
            to: Props::new().mask(100.0),
            timing: Timing::new(duration).ease(Easing::Linear),
        }
    }

    // ========================================================================
    // Emphasis
    // ========================================================================

    /// Small scale bump, meant to be played with yoyo
    pub fn bump(duration: f32, scale: f32) -> Preset {
        Preset {
            from: Props::new().scale(1.0),
            to: Props::new().scale(scale),
            timing: Timing::new(duration).ease(Easing::EaseOutCubic),
        }
    }
}
