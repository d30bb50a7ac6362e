//! Pinned hero: the main hero is unmasked over the cover as the page scrolls

use super::Section;
use crate::page::HeroElements;
use crate::report::{ControllerReport, SectionReport};
use flok_core::{ElementId, Property, Scene};
use flok_motion::{HeroTargets, MotionContext, MotionSession, ScrubReveal};

pub struct HeroSection {
    session: MotionSession,
    scrub: ScrubReveal,
    mask: ElementId,
}

impl HeroSection {
    pub fn mount(ctx: &MotionContext, elements: &HeroElements) -> Self {
        let session = MotionSession::new(ctx);
        let scrub = ScrubReveal::mount(
            &session,
            HeroTargets {
                wrapper: elements.wrapper,
                mask: elements.mask,
                title: Some(elements.title),
                copy: Some(elements.copy),
                cta: Some(elements.cta),
            },
        );
        tracing::debug!(state = ?scrub.state(), "hero mounted");
        Self {
            session,
            scrub,
            mask: elements.mask,
        }
    }

    pub fn scrub(&self) -> &ScrubReveal {
        &self.scrub
    }

    pub fn session(&self) -> &MotionSession {
        &self.session
    }
}

impl Section for HeroSection {
    fn name(&self) -> &'static str {
        "hero"
    }

    fn report(&self, scene: &Scene) -> SectionReport {
        let mask = scene.resolved(self.mask, Property::MaskSize).unwrap_or(0.0);
        let pinned = self.scrub.scroll_state().map_or(false, |s| s.pinned);
        SectionReport::new(self.name()).controller(
            ControllerReport::new("mask-scrub", self.scrub.state())
                .progress(self.scrub.progress())
                .value(format!("mask {mask:.0}%{}", if pinned { ", pinned" } else { "" })),
        )
    }
}
