//! Scroll triggers
//!
//! Maps the window scroll offset onto a normalized progress value between a
//! start and an end position measured from a trigger element. Timelines
//! bound to a trigger are "scrubbed": their playhead follows this progress
//! instead of wall-clock time.

use flok_core::{ElementId, Scene};

/// Where the scroll range ends
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollEnd {
    /// A distance past the start, as a multiple of the viewport height
    /// (`+=200%` is `Distance(2.0)`)
    Distance(f32),
    /// When the trigger's bottom edge reaches this fraction of the viewport
    BottomAt(f32),
}

/// Snapshot of a trigger's last evaluation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollTriggerState {
    /// Scroll offset where progress is 0
    pub start: f32,
    /// Scroll offset where progress is 1
    pub end: f32,
    /// Raw (unsmoothed) progress, 0.0 to 1.0
    pub progress: f32,
    /// Whether the scroll offset is inside the range
    pub active: bool,
    /// Whether the trigger is pinned in place right now
    pub pinned: bool,
}

/// Scroll-linked range attached to a timeline
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollTrigger {
    trigger: ElementId,
    /// Viewport fraction the trigger's top must reach for progress 0
    /// (`top top` is 0.0, `top 85%` is 0.85)
    start_at: f32,
    end: ScrollEnd,
    /// Seconds the playhead takes to catch up with the scroll position
    smoothing: f32,
    pin: bool,
    state: ScrollTriggerState,
}

impl ScrollTrigger {
    /// Range that starts when the trigger's top reaches the viewport top
    pub fn new(trigger: ElementId) -> Self {
        Self {
            trigger,
            start_at: 0.0,
            end: ScrollEnd::Distance(1.0),
            smoothing: 0.0,
            pin: false,
            state: ScrollTriggerState::default(),
        }
    }

    /// Builder: start when the trigger's top reaches this viewport fraction
    pub fn start_at(mut self, fraction: f32) -> Self {
        self.start_at = fraction;
        self
    }

    /// Builder: set the end of the range
    pub fn end(mut self, end: ScrollEnd) -> Self {
        self.end = end;
        self
    }

    /// Builder: catch-up time in seconds (0 = follow scroll exactly)
    pub fn scrub(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.max(0.0);
        self
    }

    /// Builder: hold the trigger in place while the range is active
    pub fn pin(mut self, pin: bool) -> Self {
        self.pin = pin;
        self
    }

    pub fn trigger(&self) -> ElementId {
        self.trigger
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    pub fn state(&self) -> ScrollTriggerState {
        self.state
    }

    /// Compute the scroll range in window scroll coordinates
    pub fn measure(&self, scene: &Scene) -> Option<(f32, f32)> {
        let bounds = scene.bounds(self.trigger)?;
        let vh = scene.viewport().height;

        let start = bounds.top() - self.start_at * vh;
        let end = match self.end {
            ScrollEnd::Distance(multiple) => start + multiple * vh,
            ScrollEnd::BottomAt(fraction) => bounds.bottom() - fraction * vh,
        };

        // A collapsed range behaves like a step at `start`
        Some((start, end.max(start + 1.0)))
    }

    /// Re-evaluate against the scene and return the raw progress
    pub fn update(&mut self, scene: &Scene) -> Option<f32> {
        let Some((start, end)) = self.measure(scene) else {
            tracing::trace!(trigger = ?self.trigger, "scroll trigger element missing");
            return None;
        };
        let scroll = scene.viewport().scroll_y;
        let progress = ((scroll - start) / (end - start)).clamp(0.0, 1.0);
        let active = scroll >= start && scroll <= end;

        self.state = ScrollTriggerState {
            start,
            end,
            progress,
            active,
            pinned: self.pin && active,
        };
        Some(progress)
    }
}
