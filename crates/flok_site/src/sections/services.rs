//! Services: split heading, toggling card fade-ups and the thumbnail marquee

use super::{top_crossing, Section};
use crate::page::ServiceElements;
use crate::report::{ControllerReport, SectionReport};
use flok_animation::{AnimationPreset, Position, Timeline, TimelineError};
use flok_core::{ElementId, Property, Scene};
use flok_motion::{Marquee, MotionContext, MotionSession, RevealController, RevealMode, RevealTrigger};

/// Word-by-word blur in of the heading
pub fn heading_timeline(words: &[ElementId], word_stagger: f32) -> Result<Timeline, TimelineError> {
    let reveal = AnimationPreset::blur_in(0.6).stagger(word_stagger);
    Timeline::builder()
        .from_to(words, reveal.from, reveal.to, reveal.timing, Position::End)
        .build()
}

/// Fade a card up 40px
pub fn card_timeline(card: ElementId) -> Result<Timeline, TimelineError> {
    let fade = AnimationPreset::fade_up(0.8, 40.0);
    Timeline::builder()
        .from_to(&[card], fade.from, fade.to, fade.timing, Position::End)
        .build()
}

pub struct ServicesSection {
    session: MotionSession,
    heading: Option<RevealController>,
    words: Vec<ElementId>,
    cards: Vec<RevealController>,
    marquee: Marquee,
    track: ElementId,
}

impl ServicesSection {
    pub fn mount(ctx: &MotionContext, elements: &ServiceElements) -> Self {
        let session = MotionSession::new(ctx);

        let split = if ctx.reduced_motion() {
            Vec::new()
        } else {
            session.split_words(elements.heading)
        };
        let words = if split.is_empty() {
            vec![elements.heading]
        } else {
            split
        };
        let heading = match heading_timeline(&words, ctx.config().word_stagger) {
            Ok(timeline) => Some(RevealController::mount(
                &session,
                elements.heading,
                timeline,
                RevealTrigger::InView(top_crossing(ctx, elements.heading)),
                RevealMode::Once,
            )),
            Err(err) => {
                tracing::warn!(%err, "services heading timeline rejected");
                None
            }
        };

        let mut cards = Vec::with_capacity(elements.cards.len());
        for &card in &elements.cards {
            match card_timeline(card) {
                Ok(timeline) => cards.push(RevealController::mount(
                    &session,
                    card,
                    timeline,
                    RevealTrigger::InView(top_crossing(ctx, card)),
                    RevealMode::Toggle,
                )),
                Err(err) => tracing::warn!(%err, ?card, "card timeline rejected"),
            }
        }

        let marquee = Marquee::mount(&session, elements.track);

        Self {
            session,
            heading,
            words,
            cards,
            marquee,
            track: elements.track,
        }
    }

    pub fn words(&self) -> &[ElementId] {
        &self.words
    }

    pub fn heading(&self) -> Option<&RevealController> {
        self.heading.as_ref()
    }

    pub fn cards(&self) -> &[RevealController] {
        &self.cards
    }

    pub fn marquee(&self) -> &Marquee {
        &self.marquee
    }

    pub fn session(&self) -> &MotionSession {
        &self.session
    }
}

impl Section for ServicesSection {
    fn name(&self) -> &'static str {
        "services"
    }

    fn report(&self, scene: &Scene) -> SectionReport {
        let mut report = SectionReport::new(self.name());
        if let Some(heading) = &self.heading {
            report = report.controller(
                ControllerReport::new("heading", heading.state())
                    .value(format!("{} words", self.words.len())),
            );
        }
        for (i, card) in self.cards.iter().enumerate() {
            report = report.controller(
                ControllerReport::new(format!("card-{}", i + 1), card.state())
                    .progress(card.handle().and_then(|h| h.progress())),
            );
        }
        let offset = scene.resolved(self.track, Property::TranslateX).unwrap_or(0.0);
        let unit = self
            .marquee
            .unit_width()
            .map_or_else(|| "unmeasured".to_string(), |w| format!("{w:.0}px"));
        report.controller(
            ControllerReport::new("marquee", self.marquee.state())
                .value(format!("x {offset:.1}px, loop {unit}")),
        )
    }
}
