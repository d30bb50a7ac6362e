//! Viewport observers
//!
//! Intersection and resize observation as explicit subscriptions.
//!
//! - **Asynchronous delivery**: `observe` never invokes the callback. Every new
//!   observer receives one initial entry on the next [`ObserverRegistry::deliver`],
//!   even when its target is already visible.
//! - **Change-only updates**: after the initial entry, callbacks fire only when
//!   the intersecting state flips or the target jumps to the other side of the
//!   root without intersecting in between.
//! - **Fire once**: observers created with `once` disconnect themselves after
//!   their first intersecting entry.
//! - **Subscriptions**: dropping or unsubscribing a [`Subscription`] removes the
//!   observer. Unsubscribing is idempotent. A removal requested while the
//!   registry is busy is queued and applied before the registry is next read.

use crate::geometry::{Bounds, RootMargin};
use crate::scene::{ElementId, Scene, Viewport};
use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    /// Identifier of a registered intersection observer
    pub struct ObserverId;
    /// Identifier of a registered resize listener
    pub struct ResizeListenerId;
}

/// Configuration for an intersection observer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserveOptions {
    /// Scroll container to intersect against (`None` = window)
    pub root: Option<ElementId>,
    /// Fraction of the target that must be visible (0.0 to 1.0)
    pub threshold: f32,
    /// Adjustment applied to the root rectangle
    pub root_margin: RootMargin,
    /// Disconnect after the first intersecting entry
    pub once: bool,
}

impl ObserveOptions {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Builder: observe against a scroll container
    pub fn root(mut self, root: Option<ElementId>) -> Self {
        self.root = root;
        self
    }

    /// Builder: set the root margin
    pub fn margin(mut self, margin: RootMargin) -> Self {
        self.root_margin = margin;
        self
    }

    /// Builder: disconnect after first intersection
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            root: None,
            threshold: 0.0,
            root_margin: RootMargin::zero(),
            once: false,
        }
    }
}

/// Where the target sits relative to the root when not intersecting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelativePosition {
    Above,
    Inside,
    Below,
}

/// A single intersection observation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    /// Visible fraction of the target (0.0 to 1.0)
    pub ratio: f32,
    /// Target bounds in client coordinates
    pub bounds: Bounds,
    /// Root bounds after margin adjustment
    pub root_bounds: Bounds,
}

impl IntersectionEntry {
    pub fn position(&self) -> RelativePosition {
        if self.bounds.top() >= self.root_bounds.bottom() {
            RelativePosition::Below
        } else if self.bounds.bottom() <= self.root_bounds.top() {
            RelativePosition::Above
        } else {
            RelativePosition::Inside
        }
    }
}

type IntersectionCallback = Box<dyn FnMut(&IntersectionEntry)>;
type ResizeCallback = Box<dyn FnMut(Viewport)>;

struct ObserverEntry {
    target: ElementId,
    options: ObserveOptions,
    callback: Option<IntersectionCallback>,
    last: Option<(bool, RelativePosition)>,
}

struct ResizeEntry {
    callback: Option<ResizeCallback>,
}

#[derive(Default)]
struct RegistryInner {
    observers: SlotMap<ObserverId, ObserverEntry>,
    resize: SlotMap<ResizeListenerId, ResizeEntry>,
}

impl RegistryInner {
    fn remove(&mut self, key: SubscriptionKey) -> bool {
        match key {
            SubscriptionKey::Observer(id) => self.observers.remove(id).is_some(),
            SubscriptionKey::Resize(id) => self.resize.remove(id).is_some(),
        }
    }
}

#[derive(Default)]
struct Shared {
    state: RefCell<RegistryInner>,
    /// Removals requested while `state` was borrowed
    released: RefCell<Vec<SubscriptionKey>>,
}

impl Shared {
    /// Apply queued removals. Dropping a removed callback may queue more.
    fn flush(&self) {
        loop {
            let keys = std::mem::take(&mut *self.released.borrow_mut());
            if keys.is_empty() {
                return;
            }
            let Ok(mut state) = self.state.try_borrow_mut() else {
                self.released.borrow_mut().extend(keys);
                return;
            };
            for key in keys {
                state.remove(key);
            }
        }
    }
}

/// Registry of intersection observers and resize listeners
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    inner: Rc<Shared>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a target. The callback runs on later `deliver` calls only.
    pub fn observe<F>(&self, target: ElementId, options: ObserveOptions, callback: F) -> Subscription
    where
        F: FnMut(&IntersectionEntry) + 'static,
    {
        let id = self.inner.state.borrow_mut().observers.insert(ObserverEntry {
            target,
            options,
            callback: Some(Box::new(callback)),
            last: None,
        });
        tracing::trace!(?id, ?target, threshold = options.threshold, "observer registered");
        Subscription::new(SubscriptionKey::Observer(id), Rc::downgrade(&self.inner))
    }

    /// Listen for viewport resizes
    pub fn on_resize<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(Viewport) + 'static,
    {
        let id = self.inner.state.borrow_mut().resize.insert(ResizeEntry {
            callback: Some(Box::new(callback)),
        });
        Subscription::new(SubscriptionKey::Resize(id), Rc::downgrade(&self.inner))
    }

    /// Number of live intersection observers
    pub fn observer_count(&self) -> usize {
        self.inner.flush();
        self.inner.state.borrow().observers.len()
    }

    /// Number of live resize listeners
    pub fn resize_listener_count(&self) -> usize {
        self.inner.flush();
        self.inner.state.borrow().resize.len()
    }

    /// Compute intersections and invoke callbacks whose state changed.
    ///
    /// The scene is only borrowed while entries are computed; callbacks run
    /// afterwards and may freely mutate the scene or the registry.
    /// Returns the number of callbacks invoked.
    pub fn deliver(&self, scene: &RefCell<Scene>) -> usize {
        self.inner.flush();
        let pending: Vec<(ObserverId, IntersectionEntry)> = {
            let scene = scene.borrow();
            let mut inner = self.inner.state.borrow_mut();
            let mut stale = Vec::new();
            let mut pending = Vec::new();

            for (id, observer) in inner.observers.iter() {
                let Some(entry) = compute_entry(&scene, observer.target, &observer.options) else {
                    stale.push(id);
                    continue;
                };
                if observer.last != Some((entry.is_intersecting, entry.position())) {
                    pending.push((id, entry));
                }
            }

            for id in stale {
                tracing::trace!(?id, "observer target left the scene");
                inner.observers.remove(id);
            }
            pending
        };

        let mut invoked = 0;
        for (id, entry) in pending {
            // Take the callback out so it can run without holding the borrow.
            let callback = {
                let mut inner = self.inner.state.borrow_mut();
                let Some(observer) = inner.observers.get_mut(id) else {
                    continue;
                };
                observer.last = Some((entry.is_intersecting, entry.position()));
                observer.callback.take()
            };
            let Some(mut callback) = callback else {
                continue;
            };

            callback(&entry);
            invoked += 1;

            let mut inner = self.inner.state.borrow_mut();
            let once = match inner.observers.get_mut(id) {
                Some(observer) => {
                    observer.callback = Some(callback);
                    observer.options.once
                }
                None => false,
            };
            if once && entry.is_intersecting {
                tracing::trace!(?id, "observer fired once, disconnecting");
                inner.observers.remove(id);
            }
        }
        self.inner.flush();
        invoked
    }

    /// Notify resize listeners
    pub fn notify_resize(&self, viewport: Viewport) -> usize {
        self.inner.flush();
        let ids: Vec<ResizeListenerId> = self.inner.state.borrow().resize.keys().collect();
        let mut invoked = 0;

        for id in ids {
            let callback = self
                .inner
                .state
                .borrow_mut()
                .resize
                .get_mut(id)
                .and_then(|entry| entry.callback.take());
            let Some(mut callback) = callback else {
                continue;
            };

            callback(viewport);
            invoked += 1;

            if let Some(entry) = self.inner.state.borrow_mut().resize.get_mut(id) {
                entry.callback = Some(callback);
            }
        }
        self.inner.flush();
        invoked
    }
}

fn compute_entry(
    scene: &Scene,
    target: ElementId,
    options: &ObserveOptions,
) -> Option<IntersectionEntry> {
    let bounds = scene.client_bounds(target)?;
    let root_bounds = scene.root_bounds(options.root).expand(&options.root_margin);

    let (is_intersecting, ratio) = match bounds.intersect(&root_bounds) {
        Some(hit) => {
            let area = bounds.area();
            let ratio = if area > 0.0 { hit.area() / area } else { 1.0 };
            let visible = if options.threshold > 0.0 {
                ratio >= options.threshold
            } else {
                true
            };
            (visible, ratio)
        }
        None => (false, 0.0),
    };

    Some(IntersectionEntry {
        target,
        is_intersecting,
        ratio,
        bounds,
        root_bounds,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SubscriptionKey {
    Observer(ObserverId),
    Resize(ResizeListenerId),
}

/// Handle to a registered observer or listener.
///
/// Unsubscribing takes effect once; later calls are no-ops. Dropping the
/// handle unsubscribes.
pub struct Subscription {
    key: SubscriptionKey,
    registry: Weak<Shared>,
    released: bool,
}

impl Subscription {
    fn new(key: SubscriptionKey, registry: Weak<Shared>) -> Self {
        Self {
            key,
            registry,
            released: false,
        }
    }

    /// Remove the observer. Returns true only for the call that removed it.
    pub fn unsubscribe(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;

        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let removed = match registry.state.try_borrow_mut() {
            Ok(mut state) => state.remove(self.key),
            Err(_) => {
                tracing::trace!(key = ?self.key, "registry busy, removal queued");
                registry.released.borrow_mut().push(self.key);
                true
            }
        };
        registry.flush();
        removed
    }

    /// Whether the underlying observer is still registered
    pub fn is_active(&self) -> bool {
        if self.released {
            return false;
        }
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        registry.flush();
        let inner = registry.state.borrow();
        match self.key {
            SubscriptionKey::Observer(id) => inner.observers.contains_key(id),
            SubscriptionKey::Resize(id) => inner.resize.contains_key(id),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ElementSpec, Viewport};
    use std::cell::Cell;

    fn scene_with_target(top: f32) -> (RefCell<Scene>, ElementId) {
        let mut scene = Scene::new(Viewport::new(1000.0, 800.0));
        let root = scene.root();
        let target = scene.create(root, ElementSpec::new("div")).unwrap();
        scene.set_bounds(root, Bounds::new(0.0, 0.0, 1000.0, 4000.0));
        scene.set_bounds(target, Bounds::new(0.0, top, 1000.0, 200.0));
        (RefCell::new(scene), target)
    }

    #[test]
    fn test_no_synchronous_delivery() {
        let (scene, target) = scene_with_target(100.0);
        let registry = ObserverRegistry::new();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();

        let _sub = registry.observe(target, ObserveOptions::new(0.35), move |_| {
            c.set(c.get() + 1);
        });
        assert_eq!(calls.get(), 0);

        assert_eq!(registry.deliver(&scene), 1);
        assert_eq!(calls.get(), 1);

        // Nothing changed, nothing delivered
        assert_eq!(registry.deliver(&scene), 0);
    }

    #[test]
    fn test_initial_entry_for_hidden_target() {
        let (scene, target) = scene_with_target(2000.0);
        let registry = ObserverRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();

        let _sub = registry.observe(target, ObserveOptions::default(), move |entry| {
            s.borrow_mut().push(entry.is_intersecting);
        });
        registry.deliver(&scene);
        assert_eq!(*seen.borrow(), vec![false]);

        scene.borrow_mut().scroll_window_to(1500.0);
        registry.deliver(&scene);
        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn test_threshold_and_margin() {
        // Target 200px tall, top at 700: 100px (0.5) visible in an 800px viewport
        let (scene, target) = scene_with_target(700.0);
        let registry = ObserverRegistry::new();
        let hit = Rc::new(Cell::new(None));
        let h = hit.clone();

        let options = ObserveOptions::new(0.35).margin(RootMargin::bottom_percent(-10.0));
        let _sub = registry.observe(target, options, move |entry| h.set(Some(entry.is_intersecting)));

        // Margin trims the root to 720px: only 20px (0.1) visible
        registry.deliver(&scene);
        assert_eq!(hit.get(), Some(false));

        scene.borrow_mut().scroll_window_to(100.0);
        registry.deliver(&scene);
        assert_eq!(hit.get(), Some(true));
    }

    #[test]
    fn test_once_disconnects_after_first_intersection() {
        let (scene, target) = scene_with_target(100.0);
        let registry = ObserverRegistry::new();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();

        let sub = registry.observe(target, ObserveOptions::new(0.1).once(), move |_| {
            c.set(c.get() + 1);
        });
        registry.deliver(&scene);
        assert_eq!(calls.get(), 1);
        assert_eq!(registry.observer_count(), 0);
        assert!(!sub.is_active());

        scene.borrow_mut().scroll_window_to(2000.0);
        registry.deliver(&scene);
        scene.borrow_mut().scroll_window_to(0.0);
        registry.deliver(&scene);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let (scene, target) = scene_with_target(100.0);
        let registry = ObserverRegistry::new();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();

        let mut sub = registry.observe(target, ObserveOptions::default(), move |_| {
            c.set(c.get() + 1);
        });
        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());
        assert_eq!(registry.observer_count(), 0);

        registry.deliver(&scene);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (_scene, target) = scene_with_target(100.0);
        let registry = ObserverRegistry::new();
        {
            let _sub = registry.observe(target, ObserveOptions::default(), |_| {});
            let _resize = registry.on_resize(|_| {});
            assert_eq!(registry.observer_count(), 1);
            assert_eq!(registry.resize_listener_count(), 1);
        }
        assert_eq!(registry.observer_count(), 0);
        assert_eq!(registry.resize_listener_count(), 0);
    }

    #[test]
    fn test_removed_target_drops_observer() {
        let (scene, target) = scene_with_target(100.0);
        let registry = ObserverRegistry::new();
        let _sub = registry.observe(target, ObserveOptions::default(), |_| {});

        scene.borrow_mut().remove(target);
        assert_eq!(registry.deliver(&scene), 0);
        assert_eq!(registry.observer_count(), 0);
    }

    #[test]
    fn test_subscription_dropped_inside_removal_is_released() {
        let (scene, target) = scene_with_target(100.0);
        let other = {
            let mut scene = scene.borrow_mut();
            let root = scene.root();
            let other = scene.create(root, ElementSpec::new("div")).unwrap();
            scene.set_bounds(other, Bounds::new(0.0, 400.0, 1000.0, 200.0));
            other
        };
        let registry = ObserverRegistry::new();

        // The outer callback owns the inner subscription
        let inner = registry.observe(other, ObserveOptions::default(), |_| {});
        let _outer = registry.observe(target, ObserveOptions::default(), move |_| {
            let _owned = &inner;
        });
        assert_eq!(registry.observer_count(), 2);

        // Removing the outer target drops its callback while the registry is busy
        scene.borrow_mut().remove(target);
        registry.deliver(&scene);
        assert_eq!(registry.observer_count(), 0);
    }

    #[test]
    fn test_jump_past_root_is_delivered() {
        let (scene, target) = scene_with_target(2000.0);
        let registry = ObserverRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let _sub = registry.observe(target, ObserveOptions::default(), move |entry| {
            s.borrow_mut().push((entry.is_intersecting, entry.position()));
        });
        registry.deliver(&scene);

        // Straight from below the viewport to above it
        scene.borrow_mut().scroll_window_to(3000.0);
        registry.deliver(&scene);
        assert_eq!(
            *seen.borrow(),
            vec![
                (false, RelativePosition::Below),
                (false, RelativePosition::Above)
            ]
        );

        registry.deliver(&scene);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_resize_listeners() {
        let registry = ObserverRegistry::new();
        let widths = Rc::new(RefCell::new(Vec::new()));
        let w = widths.clone();
        let _sub = registry.on_resize(move |viewport| w.borrow_mut().push(viewport.width));

        assert_eq!(registry.notify_resize(Viewport::new(640.0, 480.0)), 1);
        assert_eq!(*widths.borrow(), vec![640.0]);
    }

    #[test]
    fn test_entry_position() {
        let (scene, target) = scene_with_target(2000.0);
        let registry = ObserverRegistry::new();
        let position = Rc::new(Cell::new(None));
        let p = position.clone();
        let _sub = registry.observe(target, ObserveOptions::default(), move |entry| {
            p.set(Some(entry.position()));
        });
        registry.deliver(&scene);
        assert_eq!(position.get(), Some(RelativePosition::Below));
    }
}
