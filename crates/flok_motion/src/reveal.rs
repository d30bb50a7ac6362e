//! Reveal controllers
//!
//! Bind a viewport signal to a prepared timeline. The timeline's initial
//! state is rendered at mount, so hidden content stays hidden until the
//! trigger fires.

use crate::session::{SessionHandle, SessionScope};
use flok_animation::{PlaybackState, Timeline, TimelineHandle};
use flok_core::{ElementId, ObserveOptions, RelativePosition};
use serde::Serialize;
use std::cell::Cell;
use std::rc::Rc;

/// Lifecycle of a reveal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealState {
    /// Not set up, or torn down
    Idle,
    /// Initial state rendered, waiting for the trigger
    Armed,
    Playing,
    /// Final state reached
    Settled,
    /// Motion skipped; final state applied directly
    Bypassed,
}

/// What starts the reveal
#[derive(Clone, Copy, Debug)]
pub enum RevealTrigger {
    /// Play immediately
    Mount,
    /// Play when the trigger element intersects, or once it has been
    /// scrolled past
    InView(ObserveOptions),
}

/// Whether a reveal can run backwards
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealMode {
    /// Play once, then stop observing
    Once,
    /// Play on enter, reverse when the element drops back below the root
    Toggle,
}

/// Write a timeline's final values directly, without animating
pub(crate) fn apply_end_state(session: &SessionHandle, timeline: &Timeline) {
    for (id, property, value) in timeline.end_values() {
        session.set(id, property, value);
    }
}

/// A single reveal bound to one trigger element
pub struct RevealController {
    state: Rc<Cell<RevealState>>,
    handle: Option<TimelineHandle>,
    scope: SessionScope,
}

impl RevealController {
    /// Set up a reveal on a session.
    ///
    /// With reduced motion, or when the trigger element or every target is
    /// missing, the final state is applied immediately and nothing is
    /// observed.
    pub fn mount(
        session: &SessionHandle,
        trigger_element: ElementId,
        mut timeline: Timeline,
        trigger: RevealTrigger,
        mode: RevealMode,
    ) -> Self {
        let ctx = session.context();
        let scope = session.scope();
        let missing = {
            let scene = ctx.scene();
            !scene.contains(trigger_element)
                || !timeline.targets().iter().any(|&t| scene.contains(t))
        };

        if ctx.reduced_motion() || missing {
            tracing::debug!(
                ?trigger_element,
                reduced_motion = ctx.reduced_motion(),
                missing,
                "reveal bypassed"
            );
            apply_end_state(session, &timeline);
            return Self {
                state: Rc::new(Cell::new(RevealState::Bypassed)),
                handle: None,
                scope,
            };
        }

        if mode == RevealMode::Toggle {
            timeline.set_keep_alive(true);
        }
        let Some(handle) = session.add_timeline(timeline) else {
            return Self {
                state: Rc::new(Cell::new(RevealState::Idle)),
                handle: None,
                scope,
            };
        };

        let state = Rc::new(Cell::new(RevealState::Armed));
        match trigger {
            RevealTrigger::Mount => {
                handle.play();
                state.set(RevealState::Playing);
            }
            RevealTrigger::InView(options) => {
                let options = match mode {
                    RevealMode::Once => options.once(),
                    RevealMode::Toggle => options,
                };
                let cb_state = state.clone();
                let cb_handle = handle.clone();
                session.observe(trigger_element, options, move |entry| {
                    let current = cb_state.get();
                    // Scrolling straight past the start still counts as entering
                    let entered =
                        entry.is_intersecting || entry.position() == RelativePosition::Above;
                    if entered {
                        if current == RevealState::Armed {
                            cb_handle.play();
                            cb_state.set(RevealState::Playing);
                        }
                    } else if mode == RevealMode::Toggle
                        && entry.position() == RelativePosition::Below
                        && matches!(current, RevealState::Playing | RevealState::Settled)
                    {
                        cb_handle.reverse();
                        cb_state.set(RevealState::Armed);
                    }
                });
            }
        }

        Self {
            state,
            handle: Some(handle),
            scope,
        }
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
            let finished = self
                .handle
                .as_ref()
                .and_then(TimelineHandle::state)
                .map_or(true, |s| s == PlaybackState::Completed);
            if finished {
                return RevealState::Settled;
            }
        }
        state
    }

    pub fn handle(&self) -> Option<&TimelineHandle> {
        self.handle.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotionConfig;
    use crate::context::MotionContext;
    use crate::session::MotionSession;
    use flok_animation::{AnimationPreset, Position};
    use flok_core::{Bounds, ElementSpec, Property, RootMargin, Scene, Viewport};

    fn setup(config: MotionConfig) -> (MotionContext, ElementId) {
        let ctx = MotionContext::new(Scene::new(Viewport::new(1000.0, 800.0)), config);
        let card = {
            let mut scene = ctx.scene_mut();
            let root = scene.root();
            scene.set_bounds(root, Bounds::new(0.0, 0.0, 1000.0, 3000.0));
            let card = scene.create(root, ElementSpec::new("div")).unwrap();
            scene.set_bounds(card, Bounds::new(0.0, 1200.0, 400.0, 300.0));
            card
        };
        (ctx, card)
    }

    fn fade_up(card: ElementId) -> Timeline {
        let preset = AnimationPreset::fade_up(0.8, 40.0);
        Timeline::builder()
            .from_to(&[card], preset.from, preset.to, preset.timing, Position::End)
            .build()
            .unwrap()
    }

    fn in_view() -> RevealTrigger {
        RevealTrigger::InView(ObserveOptions::new(0.0).margin(RootMargin::bottom_percent(-15.0)))
    }

    #[test]
    fn test_once_reveal_plays_on_enter() {
        let (ctx, card) = setup(MotionConfig::default());
        let session = MotionSession::new(&ctx);
        let reveal = RevealController::mount(&session, card, fade_up(card), in_view(), RevealMode::Once);

        assert_eq!(reveal.state(), RevealState::Armed);
        assert_eq!(ctx.scene().style_value(card, Property::Opacity), Some(0.0));

        ctx.frame(0.016);
        assert_eq!(reveal.state(), RevealState::Armed);

        ctx.scroll_to(800.0);
        ctx.frame(0.016);
        assert_eq!(reveal.state(), RevealState::Playing);
        assert_eq!(ctx.observers().observer_count(), 0);

        for _ in 0..60 {
            ctx.frame(0.016);
        }
        assert_eq!(reveal.state(), RevealState::Settled);
        assert_eq!(ctx.scene().style_value(card, Property::Opacity), Some(1.0));
        assert_eq!(ctx.scene().style_value(card, Property::TranslateY), Some(0.0));
    }

    #[test]
    fn test_toggle_reverses_when_scrolled_back() {
        let (ctx, card) = setup(MotionConfig::default());
        let session = MotionSession::new(&ctx);
        let reveal = RevealController::mount(&session, card, fade_up(card), in_view(), RevealMode::Toggle);

        ctx.scroll_to(800.0);
        for _ in 0..60 {
            ctx.frame(0.016);
        }
        assert_eq!(reveal.state(), RevealState::Settled);

        ctx.scroll_to(0.0);
        for _ in 0..60 {
            ctx.frame(0.016);
        }
        assert_eq!(reveal.state(), RevealState::Armed);
        assert_eq!(ctx.scene().style_value(card, Property::Opacity), Some(0.0));
        assert_eq!(ctx.observers().observer_count(), 1);

        ctx.scroll_to(800.0);
        ctx.frame(0.016);
        assert_eq!(reveal.state(), RevealState::Playing);
    }

    #[test]
    fn test_scrolling_past_still_reveals() {
        let (ctx, card) = setup(MotionConfig::default());
        let session = MotionSession::new(&ctx);
        let once = RevealController::mount(&session, card, fade_up(card), in_view(), RevealMode::Once);

        // Jump from the top of the page to the bottom in one step
        ctx.frame(0.016);
        ctx.scroll_to(2200.0);
        for _ in 0..60 {
            ctx.frame(0.016);
        }
        assert_eq!(once.state(), RevealState::Settled);
        assert_eq!(ctx.scene().style_value(card, Property::Opacity), Some(1.0));
    }

    #[test]
    fn test_toggle_mounted_below_plays_and_reverses() {
        let (ctx, card) = setup(MotionConfig::default());
        ctx.scroll_to(2200.0);
        let session = MotionSession::new(&ctx);
        let reveal = RevealController::mount(&session, card, fade_up(card), in_view(), RevealMode::Toggle);

        for _ in 0..60 {
            ctx.frame(0.016);
        }
        assert_eq!(reveal.state(), RevealState::Settled);
        assert_eq!(ctx.scene().style_value(card, Property::TranslateY), Some(0.0));

        // Back to the top in one step: the card is below the root again
        ctx.scroll_to(0.0);
        for _ in 0..60 {
            ctx.frame(0.016);
        }
        assert_eq!(reveal.state(), RevealState::Armed);
        assert_eq!(ctx.scene().style_value(card, Property::Opacity), Some(0.0));
    }

    #[test]
    fn test_reduced_motion_bypasses() {
        let (ctx, card) = setup(MotionConfig::reduced());
        let session = MotionSession::new(&ctx);
        let reveal = RevealController::mount(&session, card, fade_up(card), in_view(), RevealMode::Once);

        assert_eq!(reveal.state(), RevealState::Bypassed);
        assert_eq!(ctx.observers().observer_count(), 0);
        assert_eq!(ctx.timeline_count(), 0);
        assert_eq!(ctx.scene().style_value(card, Property::Opacity), Some(1.0));
        assert_eq!(ctx.scene().style_value(card, Property::TranslateY), Some(0.0));
    }

    #[test]
    fn test_missing_trigger_bypasses() {
        let (ctx, card) = setup(MotionConfig::default());
        let timeline = fade_up(card);
        ctx.scene_mut().remove(card);
        let session = MotionSession::new(&ctx);
        let reveal = RevealController::mount(&session, card, timeline, in_view(), RevealMode::Once);
        assert_eq!(reveal.state(), RevealState::Bypassed);
        assert_eq!(ctx.observers().observer_count(), 0);
    }

    #[test]
    fn test_revert_before_trigger() {
        let (ctx, card) = setup(MotionConfig::default());
        let session = MotionSession::new(&ctx);
        let reveal = RevealController::mount(&session, card, fade_up(card), in_view(), RevealMode::Once);
        session.revert();

        assert_eq!(reveal.state(), RevealState::Idle);
        assert_eq!(ctx.observers().observer_count(), 0);
        assert_eq!(ctx.scene().style_value(card, Property::Opacity), None);

        let before = ctx.scene().mutation_count();
        ctx.scroll_to(800.0);
        ctx.frame(0.016);
        assert_eq!(ctx.scene().mutation_count(), before);
    }
}
