//! Flok Animation System
//!
//! Easing, label-based timelines, and scroll scrubbing.
//!
//! # Features
//!
//! - **Timelines**: Steps placed by absolute time, relative offsets, or labels
//! - **Stagger**: Per-target offsets within a single step
//! - **Scrub**: Playhead driven by scroll position with optional smoothing
//! - **Scheduler**: Frame loop with weak handles for controllers

pub mod easing;
pub mod presets;
pub mod scheduler;
pub mod scroll;
pub mod timeline;
pub mod value;

pub use easing::{Easing, EasingError};
pub use presets::{AnimationPreset, Preset};
pub use scheduler::{spawn, AnimationScheduler, SharedScheduler, TimelineHandle, TimelineId};
pub use scroll::{ScrollEnd, ScrollTrigger, ScrollTriggerState};
pub use timeline::{
    Endpoint, PlaybackState, Position, Props, ResolvedTween, Timeline, TimelineBuilder,
    TimelineError, Timing, Track,
};
pub use value::ValueCell;
