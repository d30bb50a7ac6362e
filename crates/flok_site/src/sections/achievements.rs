//! Achievements: three counters, two arrow conveyors and a CTA bump

use super::Section;
use crate::page::AchievementElements;
use crate::report::{ControllerReport, SectionReport};
use flok_animation::{AnimationPreset, Position, Timeline, TimelineError};
use flok_core::{ElementId, Scene};
use flok_motion::{
    ArrowConveyor, ConveyorDirection, Counter, MotionContext, MotionSession, RevealController,
    RevealMode, RevealTrigger,
};

/// Scale the CTA up a touch and back
pub fn cta_bump_timeline(cta: ElementId) -> Result<Timeline, TimelineError> {
    let bump = AnimationPreset::bump(0.18, 1.02);
    Timeline::builder()
        .yoyo(true)
        .repeat(1)
        .from_to(&[cta], bump.from, bump.to, bump.timing, Position::End)
        .build()
}

pub struct AchievementsSection {
    session: MotionSession,
    counters: Vec<Counter>,
    conveyors: Vec<ArrowConveyor>,
    bump: Option<RevealController>,
}

impl AchievementsSection {
    pub fn mount(ctx: &MotionContext, elements: &AchievementElements) -> Self {
        let session = MotionSession::new(ctx);

        let counters = elements
            .counters
            .iter()
            .map(|&el| Counter::mount(&session, el))
            .collect();

        // Rows sit either side of the CTA and push toward it
        let conveyors = vec![
            ArrowConveyor::mount(&session, elements.arrows_left, ConveyorDirection::Right),
            ArrowConveyor::mount(&session, elements.arrows_right, ConveyorDirection::Left),
        ];

        let bump = match cta_bump_timeline(elements.cta) {
            Ok(timeline) => Some(RevealController::mount(
                &session,
                elements.cta,
                timeline,
                RevealTrigger::Mount,
                RevealMode::Once,
            )),
            Err(err) => {
                tracing::warn!(%err, "cta bump rejected");
                None
            }
        };

        Self {
            session,
            counters,
            conveyors,
            bump,
        }
    }

    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    pub fn conveyors(&self) -> &[ArrowConveyor] {
        &self.conveyors
    }

    pub fn session(&self) -> &MotionSession {
        &self.session
    }
}

impl Section for AchievementsSection {
    fn name(&self) -> &'static str {
        "achievements"
    }

    fn report(&self, scene: &Scene) -> SectionReport {
        let mut report = SectionReport::new(self.name());
        for (i, counter) in self.counters.iter().enumerate() {
            let text = scene.text(counter.element()).unwrap_or_default();
            report = report.controller(
                ControllerReport::new(format!("counter-{}", i + 1), counter.state())
                    .value(format!("{text} / {}", counter.range().end)),
            );
        }
        for (conveyor, side) in self.conveyors.iter().zip(["left", "right"]) {
            report = report.controller(
                ControllerReport::new(format!("arrows-{side}"), conveyor.state())
                    .value(format!("{} arrows", conveyor.arrows().len())),
            );
        }
        if let Some(bump) = &self.bump {
            report = report.controller(ControllerReport::new("cta-bump", bump.state()));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::build_scene;
    use flok_core::{Property, Viewport};
    use flok_motion::{MotionConfig, RevealState};

    fn context(config: MotionConfig) -> (MotionContext, AchievementElements) {
        let ctx = MotionContext::new(Scene::new(Viewport::new(1440.0, 900.0)), config);
        let elements = build_scene(&mut ctx.scene_mut(), ctx.reduced_motion())
            .unwrap()
            .achievements;
        (ctx, elements)
    }

    #[test]
    fn test_bump_returns_to_rest() {
        let (ctx, elements) = context(MotionConfig::default());
        let _section = AchievementsSection::mount(&ctx, &elements);

        ctx.frame(0.18);
        let peak = ctx.scene().resolved(elements.cta, Property::Scale).unwrap();
        assert!((peak - 1.02).abs() < 1e-4);

        ctx.run_frames(30);
        assert_eq!(ctx.scene().resolved(elements.cta, Property::Scale), Some(1.0));
    }

    #[test]
    fn test_nothing_counts_off_screen() {
        let (ctx, elements) = context(MotionConfig::default());
        let section = AchievementsSection::mount(&ctx, &elements);
        ctx.run_frames(10);

        for counter in section.counters() {
            assert_eq!(counter.state(), RevealState::Armed);
            assert_eq!(ctx.scene().text(counter.element()), Some("0"));
        }
        for conveyor in section.conveyors() {
            assert_eq!(conveyor.state(), RevealState::Armed);
        }
    }

    #[test]
    fn test_counters_and_arrows_start_in_view() {
        let (ctx, elements) = context(MotionConfig::default());
        let section = AchievementsSection::mount(&ctx, &elements);

        let top = ctx.scene().bounds(elements.section).unwrap().top();
        ctx.scroll_to(top);
        ctx.run_frames(120);

        let texts: Vec<String> = section
            .counters()
            .iter()
            .map(|c| ctx.scene().text(c.element()).unwrap_or_default().to_string())
            .collect();
        assert_eq!(texts, ["500", "50", "12"]);
        assert!(section.conveyors().iter().all(ArrowConveyor::is_running));
    }

    #[test]
    fn test_report_lists_every_controller() {
        let (ctx, elements) = context(MotionConfig::reduced());
        let section = AchievementsSection::mount(&ctx, &elements);
        let report = section.report(&ctx.scene());

        assert_eq!(report.name, "achievements");
        assert_eq!(report.controllers.len(), 6);
        assert_eq!(report.controllers[0].value.as_deref(), Some("500 / 500"));
        assert!(report
            .controllers
            .iter()
            .all(|c| c.state == RevealState::Bypassed));
    }
}
