//! Page sections
//!
//! Each section owns one [`MotionSession`](flok_motion::MotionSession) and
//! the controllers mounted on it. Dropping a section unmounts it.

mod achievements;
mod hero;
mod intro;
mod services;

pub use achievements::{cta_bump_timeline, AchievementsSection};
pub use hero::HeroSection;
pub use intro::{intro_timeline, IntroSection};
pub use services::{card_timeline, heading_timeline, ServicesSection};

use crate::report::SectionReport;
use flok_core::{ElementId, ObserveOptions, RootMargin, Scene};
use flok_motion::MotionContext;

/// A mounted page section
pub trait Section {
    fn name(&self) -> &'static str;

    /// Current state of every controller in the section
    fn report(&self, scene: &Scene) -> SectionReport;
}

/// Options for "reveal once the element's top passes `reveal_start` of the viewport"
pub(crate) fn top_crossing(ctx: &MotionContext, element: ElementId) -> ObserveOptions {
    let inset = (1.0 - ctx.config().reveal_start.clamp(0.0, 1.0)) * 100.0;
    ObserveOptions::new(0.0)
        .root(ctx.scene().scroll_parent(element))
        .margin(RootMargin::bottom_percent(-inset))
}
