//! Animation scheduler
//!
//! Owns every live timeline and advances them each frame.

use crate::scroll::ScrollTriggerState;
use crate::timeline::{PlaybackState, Timeline};
use flok_core::Scene;
use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    pub struct TimelineId;
}

/// The animation scheduler that ticks all active timelines
pub struct AnimationScheduler {
    timelines: SlotMap<TimelineId, Timeline>,
    target_fps: u32,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            timelines: SlotMap::with_key(),
            target_fps: 60,
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.max(1);
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Seconds per frame at the target rate
    pub fn frame_interval(&self) -> f32 {
        1.0 / self.target_fps as f32
    }

    /// Register a timeline and render its initial state
    pub fn add(&mut self, mut timeline: Timeline, scene: &mut Scene) -> TimelineId {
        if timeline.is_scrubbed() {
            timeline.update_scrub(0.0, scene);
        } else {
            timeline.render(scene);
        }
        self.timelines.insert(timeline)
    }

    /// Register a timeline without rendering it
    pub fn insert(&mut self, timeline: Timeline) -> TimelineId {
        self.timelines.insert(timeline)
    }

    pub fn get(&self, id: TimelineId) -> Option<&Timeline> {
        self.timelines.get(id)
    }

    pub fn get_mut(&mut self, id: TimelineId) -> Option<&mut Timeline> {
        self.timelines.get_mut(id)
    }

    pub fn remove(&mut self, id: TimelineId) -> Option<Timeline> {
        self.timelines.remove(id)
    }

    /// Advance all timelines by `dt` seconds
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) {
        for (_, timeline) in self.timelines.iter_mut() {
            if timeline.is_scrubbed() {
                timeline.update_scrub(dt, scene);
            } else {
                timeline.advance(dt, scene);
            }
        }

        self.timelines.retain(|id, timeline| match timeline.state() {
            PlaybackState::Killed => {
                tracing::trace!(?id, "dropping killed timeline");
                false
            }
            PlaybackState::Completed => timeline.keeps_alive(),
            _ => true,
        });
    }

    /// Check if any timelines are still moving
    pub fn has_active_animations(&self) -> bool {
        self.timelines
            .iter()
            .any(|(_, t)| t.is_playing() && !t.is_scrubbed())
    }

    /// Get the number of timelines in the scheduler
    pub fn timeline_count(&self) -> usize {
        self.timelines.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TimelineId, &Timeline)> {
        self.timelines.iter()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Scheduler shared between the frame loop and controllers
pub type SharedScheduler = Rc<RefCell<AnimationScheduler>>;

/// Register a timeline with a shared scheduler and get a handle to it
pub fn spawn(scheduler: &SharedScheduler, timeline: Timeline, scene: &mut Scene) -> TimelineHandle {
    let id = scheduler.borrow_mut().add(timeline, scene);
    TimelineHandle {
        id,
        scheduler: Rc::downgrade(scheduler),
    }
}

/// Weak handle to a scheduled timeline.
///
/// Every operation is a no-op once the timeline is gone or the scheduler is
/// dropped.
#[derive(Clone, Debug)]
pub struct TimelineHandle {
    id: TimelineId,
    scheduler: Weak<RefCell<AnimationScheduler>>,
}

impl TimelineHandle {
    pub fn id(&self) -> TimelineId {
        self.id
    }

    fn with<R>(&self, f: impl FnOnce(&mut Timeline) -> R) -> Option<R> {
        let scheduler = self.scheduler.upgrade()?;
        let Ok(mut scheduler) = scheduler.try_borrow_mut() else {
            tracing::warn!(id = ?self.id, "timeline handle used while scheduler is busy");
            return None;
        };
        scheduler.get_mut(self.id).map(f)
    }

    pub fn play(&self) {
        self.with(Timeline::play);
    }

    pub fn pause(&self) {
        self.with(Timeline::pause);
    }

    pub fn resume(&self) {
        self.with(Timeline::resume);
    }

    pub fn reverse(&self) {
        self.with(Timeline::reverse);
    }

    pub fn restart(&self) {
        self.with(Timeline::restart);
    }

    /// Kill and unregister the timeline. Returns true only the first time.
    pub fn kill(&self) -> bool {
        let Some(scheduler) = self.scheduler.upgrade() else {
            return false;
        };
        let Ok(mut scheduler) = scheduler.try_borrow_mut() else {
            return false;
        };
        match scheduler.remove(self.id) {
            Some(mut timeline) => {
                timeline.kill();
                true
            }
            None => false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.scheduler
            .upgrade()
            .map_or(false, |scheduler| {
                let scheduler = scheduler.borrow();
                scheduler.get(self.id).is_some()
            })
    }

    pub fn state(&self) -> Option<PlaybackState> {
        self.with(|t| t.state())
    }

    pub fn progress(&self) -> Option<f32> {
        self.with(|t| t.progress())
    }

    pub fn scroll_trigger(&self) -> Option<ScrollTriggerState> {
        self.with(|t| t.scroll_trigger()).flatten()
    }

    /// Jump to a normalized progress and render
    pub fn set_progress(&self, progress: f32, scene: &mut Scene) {
        self.with(|t| t.set_progress(progress, scene));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::timeline::{Position, Props, Timing};
    use flok_core::{ElementId, ElementSpec, Property, Viewport};

    fn fade(el: ElementId) -> Timeline {
        Timeline::builder()
            .from(&[el], Props::new().opacity(0.0), Timing::new(1.0).ease(Easing::Linear), Position::End)
            .build()
            .unwrap()
    }

    fn setup() -> (Scene, ElementId, SharedScheduler) {
        let mut scene = Scene::new(Viewport::default());
        let root = scene.root();
        let el = scene.create(root, ElementSpec::new("div")).unwrap();
        (scene, el, Rc::new(RefCell::new(AnimationScheduler::new())))
    }

    #[test]
    fn test_add_renders_initial_state() {
        let (mut scene, el, scheduler) = setup();
        let handle = spawn(&scheduler, fade(el), &mut scene);
        assert_eq!(scene.style_value(el, Property::Opacity), Some(0.0));
        assert_eq!(handle.state(), Some(PlaybackState::Idle));
        assert!(!scheduler.borrow().has_active_animations());
    }

    #[test]
    fn test_completed_timelines_are_dropped() {
        let (mut scene, el, scheduler) = setup();
        let handle = spawn(&scheduler, fade(el), &mut scene);
        handle.play();
        assert!(scheduler.borrow().has_active_animations());

        scheduler.borrow_mut().tick(0.5, &mut scene);
        assert_eq!(scene.style_value(el, Property::Opacity), Some(0.5));
        scheduler.borrow_mut().tick(0.6, &mut scene);
        assert_eq!(scene.style_value(el, Property::Opacity), Some(1.0));
        assert_eq!(scheduler.borrow().timeline_count(), 0);
        assert!(!handle.is_alive());
    }

    #[test]
    fn test_kill_is_idempotent() {
        let (mut scene, el, scheduler) = setup();
        let handle = spawn(&scheduler, fade(el), &mut scene);
        handle.play();
        assert!(handle.kill());
        assert!(!handle.kill());
        handle.play();

        let before = scene.mutation_count();
        scheduler.borrow_mut().tick(0.5, &mut scene);
        assert_eq!(scene.mutation_count(), before);
    }

    #[test]
    fn test_handle_outlives_scheduler() {
        let (mut scene, el, scheduler) = setup();
        let handle = spawn(&scheduler, fade(el), &mut scene);
        drop(scheduler);
        handle.play();
        assert!(!handle.kill());
        assert!(!handle.is_alive());
        assert_eq!(handle.progress(), None);
    }
}
