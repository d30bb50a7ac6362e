//! Thumbnail marquee
//!
//! The track holds its items twice in a row. Translating the track left by
//! exactly one unit (first item to first duplicate) and jumping back is
//! seamless, so the loop is a linear infinite tween of that distance.

use crate::reveal::RevealState;
use crate::session::{SessionHandle, SessionScope};
use flok_animation::{Easing, Position, Props, Timeline, TimelineHandle, Timing};
use flok_core::{ElementId, Property, Scene};
use std::cell::RefCell;
use std::rc::Rc;

/// Fewest items that still form two copies of a pair
pub const MIN_ITEMS: usize = 4;
/// Units narrower than this are treated as unmeasured
pub const MIN_UNIT_WIDTH: f32 = 10.0;

/// Width of one repeating unit of the track, if it can loop
pub fn measure_unit(scene: &Scene, track: ElementId) -> Option<f32> {
    let items = scene.children(track);
    if items.len() < MIN_ITEMS {
        tracing::debug!(?track, items = items.len(), "marquee needs duplicated items");
        return None;
    }
    let first = scene.bounds(items[0])?;
    let duplicate = scene.bounds(items[items.len() / 2])?;
    let unit = duplicate.left() - first.left();
    if !unit.is_finite() || unit < MIN_UNIT_WIDTH {
        tracing::debug!(?track, unit, "marquee unit too narrow");
        return None;
    }
    Some(unit)
}

struct MarqueeInner {
    track: ElementId,
    duration: f32,
    handle: Option<TimelineHandle>,
    unit: Option<f32>,
    builds: u32,
}

/// Continuous horizontal loop, rebuilt on every resize
pub struct Marquee {
    inner: Rc<RefCell<MarqueeInner>>,
    scope: SessionScope,
    bypassed: bool,
}

impl Marquee {
    pub fn mount(session: &SessionHandle, track: ElementId) -> Self {
        let ctx = session.context();
        let inner = Rc::new(RefCell::new(MarqueeInner {
            track,
            duration: ctx.config().marquee_duration,
            handle: None,
            unit: None,
            builds: 0,
        }));
        let scope = session.scope();

        if ctx.reduced_motion() {
            tracing::debug!(?track, "marquee disabled by reduced motion");
            return Self {
                inner,
                scope,
                bypassed: true,
            };
        }

        build(session, &inner);

        let resize_scope = session.scope();
        let resize_inner = inner.clone();
        session.on_resize(move |_| {
            if let Some(session) = resize_scope.upgrade() {
                build(&session, &resize_inner);
            }
        });

        Self {
            inner,
            scope,
            bypassed: false,
        }
    }

    pub fn state(&self) -> RevealState {
        if self.bypassed {
            return RevealState::Bypassed;
        }
        if self.scope.upgrade().is_none() {
            return RevealState::Idle;
        }
        if self.is_running() {
            RevealState::Playing
        } else {
            RevealState::Armed
        }
    }

    /// Current unit width, if a loop is running
    pub fn unit_width(&self) -> Option<f32> {
        self.inner.borrow().unit
    }

    pub fn handle(&self) -> Option<TimelineHandle> {
        self.inner.borrow().handle.clone()
    }

    pub fn is_running(&self) -> bool {
        self.inner
            .borrow()
            .handle
            .as_ref()
            .map_or(false, TimelineHandle::is_alive)
    }

    /// How many loops have been started
    pub fn build_count(&self) -> u32 {
        self.inner.borrow().builds
    }
}

fn build(session: &SessionHandle, inner: &Rc<RefCell<MarqueeInner>>) {
    let (track, duration, previous) = {
        let mut inner = inner.borrow_mut();
        inner.unit = None;
        (inner.track, inner.duration, inner.handle.take())
    };
    if let Some(previous) = previous {
        previous.kill();
    }

    session.set(track, Property::TranslateX, 0.0);
    let Some(unit) = measure_unit(&session.context().scene(), track) else {
        return;
    };

    let timeline = Timeline::builder()
        .to(
            &[track],
            Props::new().x(-unit),
            Timing::new(duration).ease(Easing::Linear),
            Position::End,
        )
        .repeat(-1)
        .build();
    let timeline = match timeline {
        Ok(timeline) => timeline,
        Err(err) => {
            tracing::warn!(%err, "marquee timeline rejected");
            return;
        }
    };

    let Some(handle) = session.add_timeline(timeline) else {
        return;
    };
    handle.play();

    let mut inner = inner.borrow_mut();
    inner.handle = Some(handle);
    inner.unit = Some(unit);
    inner.builds += 1;
    tracing::debug!(?track, unit, build = inner.builds, "marquee started");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotionConfig;
    use crate::context::MotionContext;
    use crate::session::MotionSession;
    use flok_core::{Bounds, ElementSpec, Viewport};

    fn setup(items: usize) -> (MotionContext, ElementId) {
        let ctx = MotionContext::new(Scene::new(Viewport::default()), MotionConfig::default());
        let track = {
            let mut scene = ctx.scene_mut();
            let root = scene.root();
            let track = scene.create(root, ElementSpec::new("div")).unwrap();
            for i in 0..items {
                let item = scene.create(track, ElementSpec::new("img")).unwrap();
                scene.set_bounds(item, Bounds::new(i as f32 * 150.0, 0.0, 140.0, 90.0));
            }
            track
        };
        (ctx, track)
    }

    #[test]
    fn test_measures_first_duplicate() {
        let (ctx, track) = setup(6);
        assert_eq!(measure_unit(&ctx.scene(), track), Some(450.0));
    }

    #[test]
    fn test_too_few_items_is_a_no_op() {
        let (ctx, track) = setup(3);
        let session = MotionSession::new(&ctx);
        let marquee = Marquee::mount(&session, track);
        assert!(!marquee.is_running());
        assert_eq!(marquee.state(), RevealState::Armed);
        assert_eq!(ctx.timeline_count(), 0);
    }

    #[test]
    fn test_runs_linear_loop() {
        let (ctx, track) = setup(4);
        let session = MotionSession::new(&ctx);
        let marquee = Marquee::mount(&session, track);
        assert_eq!(marquee.unit_width(), Some(300.0));

        ctx.frame(6.0);
        assert_eq!(ctx.scene().style_value(track, Property::TranslateX), Some(-150.0));
    }
}
