//! Intro hero: heading, paragraph words, button and collage play in on mount

use super::Section;
use crate::page::IntroElements;
use crate::report::{ControllerReport, SectionReport};
use flok_animation::{AnimationPreset, Easing, Position, Props, Timeline, TimelineError, Timing};
use flok_core::{ElementId, Scene};
use flok_motion::{MotionContext, MotionSession, RevealController, RevealMode, RevealTrigger};

/// Label placed where the paragraph words start
const PARAGRAPH_START: &str = "pStart";

/// Build the intro timeline. `words` are the paragraph's word spans, or the
/// paragraph itself when it was not split.
pub fn intro_timeline(
    elements: &IntroElements,
    words: &[ElementId],
    word_stagger: f32,
) -> Result<Timeline, TimelineError> {
    let word_reveal = AnimationPreset::blur_in(0.6).stagger(word_stagger);
    Timeline::builder()
        .default_easing(Easing::EaseOutCubic)
        .from(
            &elements.heading_spans,
            Props::new().opacity(0.0).blur(12.0),
            Timing::new(0.8).stagger(0.06),
            Position::End,
        )
        .from(words, word_reveal.from, word_reveal.timing, Position::FromEnd(-0.4))
        .label(PARAGRAPH_START, Position::PreviousStart(0.0))
        .from_to(
            &[elements.button],
            Props::new().opacity(0.0),
            Props::new().opacity(1.0),
            Timing::new(0.6),
            Position::label(PARAGRAPH_START, 0.15),
        )
        .from(
            &elements.images,
            Props::new().opacity(0.0).y(30.0),
            Timing::new(0.7).stagger(0.08),
            Position::label(PARAGRAPH_START, 0.15),
        )
        .build()
}

pub struct IntroSection {
    session: MotionSession,
    reveal: Option<RevealController>,
    words: Vec<ElementId>,
}

impl IntroSection {
    pub fn mount(ctx: &MotionContext, elements: &IntroElements) -> Self {
        let session = MotionSession::new(ctx);

        // Splitting is skipped without motion; the paragraph is revealed whole
        let split = if ctx.reduced_motion() {
            Vec::new()
        } else {
            session.split_words(elements.paragraph)
        };
        let words = if split.is_empty() {
            vec![elements.paragraph]
        } else {
            split
        };

        let reveal = match intro_timeline(elements, &words, ctx.config().word_stagger) {
            Ok(timeline) => Some(RevealController::mount(
                &session,
                elements.section,
                timeline,
                RevealTrigger::Mount,
                RevealMode::Once,
            )),
            Err(err) => {
                tracing::warn!(%err, "intro timeline rejected");
                None
            }
        };

        Self {
            session,
            reveal,
            words,
        }
    }

    /// Word spans the paragraph was split into
    pub fn words(&self) -> &[ElementId] {
        &self.words
    }

    pub fn reveal(&self) -> Option<&RevealController> {
        self.reveal.as_ref()
    }

    pub fn session(&self) -> &MotionSession {
        &self.session
    }
}

impl Section for IntroSection {
    fn name(&self) -> &'static str {
        "intro"
    }

    fn report(&self, _scene: &Scene) -> SectionReport {
        let report = SectionReport::new(self.name());
        match &self.reveal {
            Some(reveal) => report.controller(
                ControllerReport::new("entrance", reveal.state())
                    .progress(reveal.handle().and_then(|h| h.progress()))
                    .value(format!("{} words", self.words.len())),
            ),
            None => report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::build_scene;
    use flok_core::{Property, Viewport};
    use flok_motion::{MotionConfig, RevealState};

    fn context(config: MotionConfig) -> (MotionContext, IntroElements) {
        let ctx = MotionContext::new(Scene::new(Viewport::new(1440.0, 900.0)), config);
        let intro = build_scene(&mut ctx.scene_mut(), ctx.reduced_motion()).unwrap().intro;
        (ctx, intro)
    }

    #[test]
    fn test_labels_anchor_button_and_images() {
        let (_ctx, intro) = context(MotionConfig::default());
        let timeline = intro_timeline(&intro, &[intro.paragraph], 0.015).unwrap();

        // Spans end at 0.06 + 0.8; the paragraph starts 0.4 before that
        let p_start = timeline.label_time(PARAGRAPH_START).unwrap();
        assert!((p_start - 0.46).abs() < 1e-5);
        assert!((timeline.start_time_of(intro.button).unwrap() - 0.61).abs() < 1e-5);
        assert!((timeline.start_time_of(intro.images[1]).unwrap() - 0.69).abs() < 1e-5);
    }

    #[test]
    fn test_plays_on_mount_and_settles() {
        let (ctx, intro) = context(MotionConfig::default());
        let section = IntroSection::mount(&ctx, &intro);

        assert!(section.words().len() > 10);
        assert_eq!(ctx.scene().text(intro.paragraph), Some(""));
        assert_eq!(
            section.reveal().map(RevealController::state),
            Some(RevealState::Playing)
        );
        // Hidden before the first frame
        assert_eq!(ctx.scene().resolved(intro.button, Property::Opacity), Some(0.0));

        ctx.run_frames(180);
        assert_eq!(
            section.reveal().map(RevealController::state),
            Some(RevealState::Settled)
        );
        let scene = ctx.scene();
        for &id in section.words().iter().chain(&intro.heading_spans) {
            assert_eq!(scene.resolved(id, Property::Opacity), Some(1.0));
            assert_eq!(scene.resolved(id, Property::Blur), Some(0.0));
        }
        assert_eq!(scene.resolved(intro.images[0], Property::TranslateY), Some(0.0));
    }

    #[test]
    fn test_unmount_restores_paragraph() {
        let (ctx, intro) = context(MotionConfig::default());
        let words_before = ctx.scene().len();
        {
            let _section = IntroSection::mount(&ctx, &intro);
            ctx.run_frames(3);
        }
        let scene = ctx.scene();
        assert_eq!(scene.len(), words_before);
        assert!(scene.text(intro.paragraph).unwrap().starts_with("Where imagination"));
        assert_eq!(scene.style_value(intro.button, Property::Opacity), None);
        assert_eq!(ctx.timeline_count(), 0);
    }

    #[test]
    fn test_reduced_motion_keeps_paragraph_whole() {
        let (ctx, intro) = context(MotionConfig::reduced());
        let section = IntroSection::mount(&ctx, &intro);
        assert_eq!(section.words(), &[intro.paragraph]);
        assert_eq!(
            section.reveal().map(RevealController::state),
            Some(RevealState::Bypassed)
        );
        assert_eq!(ctx.scene().resolved(intro.button, Property::Opacity), Some(1.0));
        assert_eq!(ctx.timeline_count(), 0);
    }
}
