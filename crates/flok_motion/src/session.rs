//! Scoped motion sessions
//!
//! A [`MotionSession`] records everything a controller does to the scene:
//! timelines it spawns, observers it registers, text it splits, and the
//! original style and text of every element it touches. `revert` undoes all
//! of it in a fixed order:
//!
//! 1. kill timelines
//! 2. drop subscriptions
//! 3. revert text splits
//! 4. restore element snapshots
//!
//! Revert runs at most once. Dropping the session reverts it.

use crate::context::MotionContext;
use crate::split::SplitText;
use flok_animation::{Timeline, TimelineHandle};
use flok_core::{
    ElementId, ElementSnapshot, IntersectionEntry, ObserveOptions, Property, Subscription,
    Viewport,
};
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct SessionInner {
    ctx: MotionContext,
    timelines: Vec<TimelineHandle>,
    subscriptions: Vec<Subscription>,
    splits: Vec<SplitText>,
    /// Restored in reverse capture order
    snapshots: Vec<(ElementId, ElementSnapshot)>,
    captured: FxHashSet<ElementId>,
    reverted: bool,
}

/// Shared access to a session. Cloning does not extend the session's
/// lifetime past its owning [`MotionSession`]'s revert.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Rc<RefCell<SessionInner>>,
}

/// Weak reference for use inside callbacks the session itself stores
#[derive(Clone)]
pub struct SessionScope {
    inner: Weak<RefCell<SessionInner>>,
}

impl SessionScope {
    /// The session, unless it has been dropped or reverted
    pub fn upgrade(&self) -> Option<SessionHandle> {
        let inner = self.inner.upgrade()?;
        if inner.borrow().reverted {
            return None;
        }
        Some(SessionHandle { inner })
    }
}

impl SessionHandle {
    pub fn context(&self) -> MotionContext {
        self.inner.borrow().ctx.clone()
    }

    pub fn scope(&self) -> SessionScope {
        SessionScope {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn is_reverted(&self) -> bool {
        self.inner.borrow().reverted
    }

    /// Remember an element's current style and text, once per element
    pub fn capture(&self, id: ElementId) {
        let ctx = self.context();
        let mut inner = self.inner.borrow_mut();
        if inner.reverted || inner.captured.contains(&id) {
            return;
        }
        let snapshot = ctx.scene().snapshot(id);
        if let Some(snapshot) = snapshot {
            inner.captured.insert(id);
            inner.snapshots.push((id, snapshot));
        }
    }

    /// Write a style override, capturing the element first
    pub fn set(&self, id: ElementId, property: Property, value: f32) {
        if self.is_reverted() {
            return;
        }
        self.capture(id);
        self.context().scene_mut().set_style(id, property, value);
    }

    /// Write text, capturing the element first
    pub fn set_text(&self, id: ElementId, text: impl Into<String>) {
        if self.is_reverted() {
            return;
        }
        self.capture(id);
        self.context().scene_mut().set_text(id, text);
    }

    /// Spawn a timeline owned by this session.
    ///
    /// Returns `None` once the session has been reverted.
    pub fn add_timeline(&self, timeline: Timeline) -> Option<TimelineHandle> {
        if self.is_reverted() {
            return None;
        }
        for target in timeline.targets() {
            self.capture(target);
        }
        let handle = self.context().spawn(timeline);
        self.inner.borrow_mut().timelines.push(handle.clone());
        Some(handle)
    }

    /// Observe an element. The subscription lives until revert.
    pub fn observe<F>(&self, target: ElementId, options: ObserveOptions, callback: F) -> bool
    where
        F: FnMut(&IntersectionEntry) + 'static,
    {
        if self.is_reverted() {
            return false;
        }
        let subscription = self.context().observers().observe(target, options, callback);
        self.inner.borrow_mut().subscriptions.push(subscription);
        true
    }

    /// Listen for viewport resizes until revert
    pub fn on_resize<F>(&self, callback: F) -> bool
    where
        F: FnMut(Viewport) + 'static,
    {
        if self.is_reverted() {
            return false;
        }
        let subscription = self.context().observers().on_resize(callback);
        self.inner.borrow_mut().subscriptions.push(subscription);
        true
    }

    /// Split an element's text into word spans owned by this session
    pub fn split_words(&self, target: ElementId) -> Vec<ElementId> {
        if self.is_reverted() {
            return Vec::new();
        }
        self.capture(target);
        let ctx = self.context();
        let Some(split) = SplitText::apply(&mut ctx.scene_mut(), target) else {
            return Vec::new();
        };
        let words = split.words().to_vec();
        self.inner.borrow_mut().splits.push(split);
        words
    }

    /// Number of live subscriptions
    pub fn subscription_count(&self) -> usize {
        self.inner
            .borrow()
            .subscriptions
            .iter()
            .filter(|s| s.is_active())
            .count()
    }

    /// Undo everything. Returns false if already reverted.
    pub fn revert(&self) -> bool {
        let (ctx, timelines, subscriptions, splits, snapshots) = {
            let Ok(mut inner) = self.inner.try_borrow_mut() else {
                tracing::warn!("session revert re-entered");
                return false;
            };
            if inner.reverted {
                return false;
            }
            inner.reverted = true;
            (
                inner.ctx.clone(),
                std::mem::take(&mut inner.timelines),
                std::mem::take(&mut inner.subscriptions),
                std::mem::take(&mut inner.splits),
                std::mem::take(&mut inner.snapshots),
            )
        };

        let killed = timelines.iter().filter(|handle| handle.kill()).count();
        let unsubscribed = subscriptions
            .into_iter()
            .filter_map(|mut subscription| subscription.unsubscribe().then_some(()))
            .count();

        let mut scene = ctx.scene_mut();
        for split in splits.into_iter().rev() {
            split.revert(&mut scene);
        }
        for (id, snapshot) in snapshots.iter().rev() {
            scene.restore(*id, snapshot);
        }

        tracing::debug!(
            killed,
            unsubscribed,
            restored = snapshots.len(),
            "motion session reverted"
        );
        true
    }
}

/// Owning session; reverts on drop
pub struct MotionSession {
    handle: SessionHandle,
}

impl MotionSession {
    pub fn new(ctx: &MotionContext) -> Self {
        Self {
            handle: SessionHandle {
                inner: Rc::new(RefCell::new(SessionInner {
                    ctx: ctx.clone(),
                    timelines: Vec::new(),
                    subscriptions: Vec::new(),
                    splits: Vec::new(),
                    snapshots: Vec::new(),
                    captured: FxHashSet::default(),
                    reverted: false,
                })),
            },
        }
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }
}

impl std::ops::Deref for MotionSession {
    type Target = SessionHandle;

    fn deref(&self) -> &SessionHandle {
        &self.handle
    }
}

impl Drop for MotionSession {
    fn drop(&mut self) {
        self.handle.revert();
    }
}
