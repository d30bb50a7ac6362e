//! Number counters
//!
//! A counter shows its start value until it scrolls into view, then counts
//! to its end value once, writing the rounded number as text every frame.

use crate::reveal::RevealState;
use crate::session::{SessionHandle, SessionScope};
use flok_animation::{Position, Timeline, TimelineHandle, Timing, ValueCell};
use flok_core::{ElementId, ObserveOptions, RootMargin};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Start and end of a count
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterRange {
    pub start: f64,
    pub end: f64,
}

impl CounterRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Read `data-start` and `data-end`. Missing or malformed values count as 0.
    pub fn from_data(session: &SessionHandle, element: ElementId) -> Self {
        let ctx = session.context();
        let scene = ctx.scene();
        let read = |key: &str| {
            scene
                .data(element, key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(0.0)
        };
        Self::new(read("data-start"), read("data-end"))
    }

    /// Value at eased progress `t`, in full precision
    pub fn at(&self, t: f32) -> f64 {
        if t >= 1.0 {
            return self.end;
        }
        self.start + (self.end - self.start) * f64::from(t.max(0.0))
    }
}

/// Text written for a counter value
pub fn format_count(value: f64) -> String {
    format!("{}", value.round() as i64)
}

/// Counter bound to one element
pub struct Counter {
    element: ElementId,
    range: CounterRange,
    state: Rc<Cell<RevealState>>,
    handle: Rc<RefCell<Option<TimelineHandle>>>,
    scope: SessionScope,
}

impl Counter {
    /// Mount a counter using the element's `data-start`/`data-end`
    pub fn mount(session: &SessionHandle, element: ElementId) -> Self {
        let range = CounterRange::from_data(session, element);
        Self::mount_with(session, element, range)
    }

    pub fn mount_with(session: &SessionHandle, element: ElementId, range: CounterRange) -> Self {
        let ctx = session.context();
        let counter = Self {
            element,
            range,
            state: Rc::new(Cell::new(RevealState::Idle)),
            handle: Rc::new(RefCell::new(None)),
            scope: session.scope(),
        };

        if !ctx.scene().contains(element) {
            tracing::debug!(?element, "counter element missing");
            return counter;
        }

        if ctx.reduced_motion() {
            session.set_text(element, format_count(range.end));
            counter.state.set(RevealState::Bypassed);
            return counter;
        }

        session.set_text(element, format_count(range.start));
        counter.state.set(RevealState::Armed);

        let config = ctx.config();
        let options = ObserveOptions::new(config.counter_threshold)
            .root(ctx.scene().scroll_parent(element))
            .margin(RootMargin::bottom_percent(config.counter_margin_bottom))
            .once();
        let timing = Timing::new(config.counter_duration).ease(config.counter_easing);

        let scope = session.scope();
        let state = counter.state.clone();
        let slot = counter.handle.clone();
        session.observe(element, options, move |entry| {
            // Played guard: the count runs at most once per mount
            if !entry.is_intersecting || state.get() != RevealState::Armed {
                return;
            }
            let Some(session) = scope.upgrade() else {
                return;
            };
            let Some(timeline) = count_timeline(element, range, timing) else {
                return;
            };
            if let Some(handle) = session.add_timeline(timeline) {
                handle.play();
                *slot.borrow_mut() = Some(handle);
                state.set(RevealState::Playing);
                tracing::debug!(?element, end = range.end, "counter started");
            }
        });

        counter
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn range(&self) -> CounterRange {
        self.range
    }

    pub fn state(&self) -> RevealState {
        let state = self.state.get();
        if state == RevealState::Bypassed {
            return state;
        }
        if self.scope.upgrade().is_none() {
            return RevealState::Idle;
        }
        if state == RevealState::Playing {
            let alive = self
                .handle
                .borrow()
                .as_ref()
                .map_or(false, TimelineHandle::is_alive);
            if !alive {
                return RevealState::Settled;
            }
        }
        state
    }
}

/// The cell carries eased progress; values are computed in f64 so the last
/// frame writes `end` exactly.
fn count_timeline(element: ElementId, range: CounterRange, timing: Timing) -> Option<Timeline> {
    let progress = ValueCell::new(0.0);
    let reader = progress.clone();
    let timeline = Timeline::builder()
        .tween_value(&progress, 0.0, 1.0, timing, Position::End)
        .on_update(move |scene| {
            scene.set_text(element, format_count(range.at(reader.get())));
        })
        .build();
    match timeline {
        Ok(timeline) => Some(timeline),
        Err(err) => {
            tracing::warn!(%err, "counter timeline rejected");
            None
        }
    }
}
