//! Arrow conveyor
//!
//! A row of arrows pulses toward the call to action forever once the row
//! scrolls into view: each arrow pushes forward and brightens, then falls
//! back, staggered along the row.

use crate::reveal::RevealState;
use crate::session::{SessionHandle, SessionScope};
use flok_animation::{Easing, Position, Props, Timeline, TimelineHandle, Timing};
use flok_core::{ElementId, ObserveOptions, Property};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const PUSH_DISTANCE: f32 = 34.0;
const REST_OPACITY: f32 = 0.18;
const LIT_OPACITY: f32 = 0.55;
const STEP_DURATION: f32 = 0.6;
const STEP_STAGGER: f32 = 0.12;
/// Start of the return step
const RETURN_AT: f32 = 0.2;

/// Which way the arrows push
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConveyorDirection {
    /// Row sits left of the target and pushes right
    Right,
    /// Row sits right of the target and pushes left
    Left,
}

impl ConveyorDirection {
    fn offset(self) -> f32 {
        match self {
            ConveyorDirection::Right => PUSH_DISTANCE,
            ConveyorDirection::Left => -PUSH_DISTANCE,
        }
    }
}

/// Build the endless push-and-return timeline for a set of arrows
pub fn conveyor_timeline(arrows: &[ElementId], direction: ConveyorDirection) -> Option<Timeline> {
    let timing = Timing::new(STEP_DURATION).stagger(STEP_STAGGER);
    let timeline = Timeline::builder()
        .default_easing(Easing::EaseInOutCubic)
        .repeat(-1)
        .to(
            arrows,
            Props::new().x(direction.offset()).opacity(LIT_OPACITY),
            timing,
            Position::End,
        )
        .to(
            arrows,
            Props::new().x(0.0).opacity(REST_OPACITY),
            timing,
            Position::At(RETURN_AT),
        )
        .build();
    match timeline {
        Ok(timeline) => Some(timeline),
        Err(err) => {
            tracing::warn!(%err, "conveyor timeline rejected");
            None
        }
    }
}

/// A row of arrows animated once it enters view
pub struct ArrowConveyor {
    arrows: Vec<ElementId>,
    state: Rc<Cell<RevealState>>,
    handle: Rc<RefCell<Option<TimelineHandle>>>,
    scope: SessionScope,
}

impl ArrowConveyor {
    pub fn mount(session: &SessionHandle, row: ElementId, direction: ConveyorDirection) -> Self {
        let ctx = session.context();
        let arrows = ctx.scene().children(row).to_vec();
        let conveyor = Self {
            arrows: arrows.clone(),
            state: Rc::new(Cell::new(RevealState::Idle)),
            handle: Rc::new(RefCell::new(None)),
            scope: session.scope(),
        };

        if ctx.reduced_motion() {
            conveyor.state.set(RevealState::Bypassed);
            return conveyor;
        }
        if arrows.is_empty() {
            tracing::debug!(?row, "conveyor row has no arrows");
            return conveyor;
        }

        conveyor.state.set(RevealState::Armed);
        let options = ObserveOptions::new(ctx.config().arrow_threshold)
            .root(ctx.scene().scroll_parent(row))
            .once();

        let scope = session.scope();
        let state = conveyor.state.clone();
        let slot = conveyor.handle.clone();
        session.observe(row, options, move |entry| {
            if !entry.is_intersecting || state.get() != RevealState::Armed {
                return;
            }
            let Some(session) = scope.upgrade() else {
                return;
            };
            for &arrow in &arrows {
                session.set(arrow, Property::TranslateX, 0.0);
                session.set(arrow, Property::Opacity, REST_OPACITY);
            }
            let Some(timeline) = conveyor_timeline(&arrows, direction) else {
                return;
            };
            if let Some(handle) = session.add_timeline(timeline) {
                handle.play();
                *slot.borrow_mut() = Some(handle);
                state.set(RevealState::Playing);
            }
        });

        conveyor
    }

    pub fn arrows(&self) -> &[ElementId] {
        &self.arrows
    }

    pub fn state(&self) -> RevealState {
        let state = self.state.get();
        if state != RevealState::Bypassed && self.scope.upgrade().is_none() {
            return RevealState::Idle;
        }
        state
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .borrow()
            .as_ref()
            .map_or(false, TimelineHandle::is_alive)
    }
}
