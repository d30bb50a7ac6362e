//! Scroll-scrubbed hero reveal
//!
//! The hero wrapper is pinned for two viewport heights of scrolling. Over
//! that range a mask grows from nothing to full coverage, and the title,
//! copy and call to action fade up one after another once the mask is more
//! than half open.

use crate::reveal::{apply_end_state, RevealState};
use crate::session::{SessionHandle, SessionScope};
use flok_animation::{
    AnimationPreset, Easing, Position, Props, ScrollEnd, ScrollTrigger, ScrollTriggerState,
    Timeline, TimelineError, TimelineHandle, Timing,
};
use flok_core::ElementId;

/// Mask growth spans the whole scroll range
const MASK_DURATION: f32 = 1.0;
/// Text steps start here (as progress) and each lasts `TEXT_DURATION`
const TEXT_STARTS: [f32; 3] = [0.6, 0.7, 0.8];
const TEXT_DURATION: f32 = 0.2;
/// Offset the text rises from
const TEXT_RISE: f32 = 24.0;
/// Pinned scroll distance, in viewport heights
const PIN_DISTANCE: f32 = 2.0;

/// Elements of the pinned hero
#[derive(Clone, Copy, Debug)]
pub struct HeroTargets {
    /// Pinned wrapper; its top edge starts the scroll range
    pub wrapper: ElementId,
    /// Element carrying the mask
    pub mask: ElementId,
    pub title: Option<ElementId>,
    pub copy: Option<ElementId>,
    pub cta: Option<ElementId>,
}

impl HeroTargets {
    fn text(&self) -> impl Iterator<Item = (f32, ElementId)> + '_ {
        TEXT_STARTS
            .iter()
            .zip([self.title, self.copy, self.cta])
            .filter_map(|(&at, id)| id.map(|id| (at, id)))
    }
}

/// Build the hero timeline bound to scroll
pub fn hero_timeline(targets: &HeroTargets, smoothing: f32) -> Result<Timeline, TimelineError> {
    let mask = AnimationPreset::mask_reveal(MASK_DURATION);
    let mut builder = Timeline::builder()
        .from_to(&[targets.mask], mask.from, mask.to, mask.timing, Position::At(0.0))
        .scrub(
            ScrollTrigger::new(targets.wrapper)
                .end(ScrollEnd::Distance(PIN_DISTANCE))
                .scrub(smoothing)
                .pin(true),
        );

    for (at, id) in targets.text() {
        builder = builder.from_to(
            &[id],
            Props::new().opacity(0.0).y(TEXT_RISE),
            Props::new().opacity(1.0).y(0.0),
            Timing::new(TEXT_DURATION).ease(Easing::EaseOutQuad),
            Position::At(at),
        );
    }
    builder.build()
}

/// Scroll-linked reveal of the main hero
pub struct ScrubReveal {
    state: RevealState,
    handle: Option<TimelineHandle>,
    scope: SessionScope,
}

impl ScrubReveal {
    pub fn mount(session: &SessionHandle, targets: HeroTargets) -> Self {
        let ctx = session.context();
        let scope = session.scope();

        let timeline = match hero_timeline(&targets, ctx.config().scrub_smoothing) {
            Ok(timeline) => timeline,
            Err(err) => {
                tracing::warn!(%err, "hero timeline rejected");
                return Self {
                    state: RevealState::Idle,
                    handle: None,
                    scope,
                };
            }
        };

        let missing = {
            let scene = ctx.scene();
            !scene.contains(targets.wrapper) || !scene.contains(targets.mask)
        };
        if ctx.reduced_motion() || missing {
            tracing::debug!(reduced_motion = ctx.reduced_motion(), missing, "hero scrub bypassed");
            apply_end_state(session, &timeline);
            return Self {
                state: RevealState::Bypassed,
                handle: None,
                scope,
            };
        }

        let handle = session.add_timeline(timeline);
        Self {
            state: RevealState::Playing,
            handle,
            scope,
        }
    }

    pub fn state(&self) -> RevealState {
        if self.state != RevealState::Bypassed && self.scope.upgrade().is_none() {
            return RevealState::Idle;
        }
        self.state
    }

    /// Smoothed playhead progress
    pub fn progress(&self) -> Option<f32> {
        self.handle.as_ref()?.progress()
    }

    /// Raw scroll state of the pinned range
    pub fn scroll_state(&self) -> Option<ScrollTriggerState> {
        self.handle.as_ref()?.scroll_trigger()
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
    use flok_core::{Bounds, ElementSpec, Property, Scene, Viewport};

    fn setup(config: MotionConfig) -> (MotionContext, HeroTargets) {
        let ctx = MotionContext::new(Scene::new(Viewport::new(1000.0, 800.0)), config);
        let targets = {
            let mut scene = ctx.scene_mut();
            let root = scene.root();
            scene.set_bounds(root, Bounds::new(0.0, 0.0, 1000.0, 4000.0));
            let wrapper = scene.create(root, ElementSpec::new("div").class("hero-wrap")).unwrap();
            scene.set_bounds(wrapper, Bounds::new(0.0, 0.0, 1000.0, 800.0));
            let mask = scene.create(wrapper, ElementSpec::new("div").class("main-hero")).unwrap();
            let title = scene.create(mask, ElementSpec::new("h1").class("mh-title")).unwrap();
            HeroTargets {
                wrapper,
                mask,
                title: Some(title),
                copy: None,
                cta: None,
            }
        };
        (ctx, targets)
    }

    #[test]
    fn test_initial_state_is_hidden() {
        let (ctx, targets) = setup(MotionConfig::immediate_scrub());
        let session = MotionSession::new(&ctx);
        let hero = ScrubReveal::mount(&session, targets);

        let title = targets.title.unwrap();
        let scene = ctx.scene();
        assert_eq!(hero.state(), RevealState::Playing);
        assert_eq!(scene.style_value(targets.mask, Property::MaskSize), Some(0.0));
        assert_eq!(scene.style_value(title, Property::Opacity), Some(0.0));
        assert_eq!(scene.style_value(title, Property::TranslateY), Some(24.0));
    }

    #[test]
    fn test_smoothing_lags_behind_scroll() {
        let (ctx, targets) = setup(MotionConfig::default());
        let session = MotionSession::new(&ctx);
        let hero = ScrubReveal::mount(&session, targets);

        ctx.scroll_to(1600.0);
        ctx.frame(0.1);
        let lagging = hero.progress().unwrap();
        assert!(lagging > 0.0 && lagging < 1.0);
        assert_eq!(hero.scroll_state().unwrap().progress, 1.0);

        for _ in 0..120 {
            ctx.frame(0.1);
        }
        assert_eq!(hero.progress(), Some(1.0));
    }

    #[test]
    fn test_reduced_motion_shows_everything() {
        let (ctx, targets) = setup(MotionConfig::reduced());
        let session = MotionSession::new(&ctx);
        let hero = ScrubReveal::mount(&session, targets);

        assert_eq!(hero.state(), RevealState::Bypassed);
        assert_eq!(ctx.timeline_count(), 0);
        let scene = ctx.scene();
        assert_eq!(scene.style_value(targets.mask, Property::MaskSize), Some(100.0));
        assert_eq!(scene.style_value(targets.title.unwrap(), Property::Opacity), Some(1.0));
    }
}
