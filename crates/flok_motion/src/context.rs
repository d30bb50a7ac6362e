//! Motion context and frame loop
//!
//! A [`MotionContext`] bundles the shared scene, the animation scheduler and
//! the observer registry. It is cheap to clone; every clone refers to the
//! same state.

use crate::config::MotionConfig;
use flok_animation::{spawn, AnimationScheduler, SharedScheduler, Timeline, TimelineHandle};
use flok_core::{ObserverRegistry, Scene};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Shared state driven by the frame loop
#[derive(Clone)]
pub struct MotionContext {
    scene: Rc<RefCell<Scene>>,
    scheduler: SharedScheduler,
    observers: ObserverRegistry,
    config: Rc<MotionConfig>,
}

impl MotionContext {
    pub fn new(scene: Scene, config: MotionConfig) -> Self {
        Self {
            scene: Rc::new(RefCell::new(scene)),
            scheduler: Rc::new(RefCell::new(AnimationScheduler::new())),
            observers: ObserverRegistry::new(),
            config: Rc::new(config),
        }
    }

    pub fn scene(&self) -> Ref<'_, Scene> {
        self.scene.borrow()
    }

    pub fn scene_mut(&self) -> RefMut<'_, Scene> {
        self.scene.borrow_mut()
    }

    pub fn scheduler(&self) -> &SharedScheduler {
        &self.scheduler
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn reduced_motion(&self) -> bool {
        self.config.reduced_motion
    }

    /// Register a timeline with the scheduler, rendering its initial state
    pub fn spawn(&self, timeline: Timeline) -> TimelineHandle {
        let mut scene = self.scene.borrow_mut();
        spawn(&self.scheduler, timeline, &mut scene)
    }

    /// Run one frame: deliver observer entries, then advance timelines.
    ///
    /// Must not be called from inside a callback.
    pub fn frame(&self, dt: f32) {
        let delivered = self.observers.deliver(&self.scene);
        if delivered > 0 {
            tracing::trace!(delivered, "observer entries delivered");
        }
        let mut scene = self.scene.borrow_mut();
        self.scheduler.borrow_mut().tick(dt, &mut scene);
    }

    /// Run `count` frames at the scheduler's target rate
    pub fn run_frames(&self, count: usize) {
        let dt = self.scheduler.borrow().frame_interval();
        for _ in 0..count {
            self.frame(dt);
        }
    }

    /// Scroll the window
    pub fn scroll_to(&self, y: f32) {
        self.scene.borrow_mut().scroll_window_to(y);
    }

    /// Resize the window, reflow, and notify resize listeners
    pub fn resize(&self, width: f32, height: f32) {
        let viewport = {
            let mut scene = self.scene.borrow_mut();
            scene.set_viewport_size(width, height);
            scene.compute_layout();
            scene.viewport()
        };
        tracing::debug!(width, height, "viewport resized");
        self.observers.notify_resize(viewport);
    }

    /// Whether any timeline still needs frames
    pub fn has_active_animations(&self) -> bool {
        self.scheduler.borrow().has_active_animations()
    }

    pub fn timeline_count(&self) -> usize {
        self.scheduler.borrow().timeline_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flok_animation::{Position, Props, Timing};
    use flok_core::{ElementSpec, ObserveOptions, Property, Viewport};

    #[test]
    fn test_frame_delivers_before_ticking() {
        let ctx = MotionContext::new(Scene::new(Viewport::default()), MotionConfig::default());
        let el = {
            let mut scene = ctx.scene_mut();
            let root = scene.root();
            scene.create(root, ElementSpec::new("div")).unwrap()
        };

        let started = ctx.clone();
        let _sub = ctx.observers().observe(el, ObserveOptions::new(0.0), move |_| {
            let timeline = Timeline::builder()
                .to(&[el], Props::new().opacity(0.5), Timing::new(0.1), Position::End)
                .build()
                .unwrap();
            started.spawn(timeline).play();
        });

        assert_eq!(ctx.timeline_count(), 0);
        ctx.frame(0.2);
        // Spawned and advanced within the same frame
        assert_eq!(ctx.scene().style_value(el, Property::Opacity), Some(0.5));
        assert_eq!(ctx.timeline_count(), 0);
    }
}
