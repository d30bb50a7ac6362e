//! Headless runs
//!
//! Build the page from a configuration, mount it, scroll through it at a
//! fixed speed, and report what every controller ended up doing.

use crate::config::SiteConfig;
use crate::page::Page;
use crate::report::RunReport;
use anyhow::Result;
use flok_core::{Scene, Viewport};
use flok_motion::MotionContext;

/// Context with an empty scene sized from the configuration
pub fn context(config: &SiteConfig) -> MotionContext {
    let viewport = Viewport::new(config.viewport.width, config.viewport.height);
    let ctx = MotionContext::new(Scene::new(viewport), config.motion.clone());
    ctx.scheduler().borrow_mut().set_target_fps(config.run.fps);
    ctx
}

/// Build and mount the page, then simulate `run.frames` frames
pub fn run(config: &SiteConfig) -> Result<RunReport> {
    config.validate()?;
    let ctx = context(config);
    let mut page = Page::build(&ctx)?;
    page.mount();

    let dt = config.run.frame_interval();
    ctx.scroll_to(config.run.start_scroll);
    tracing::info!(
        frames = config.run.frames,
        fps = config.run.fps,
        scroll_speed = config.run.scroll_speed,
        "running"
    );

    for frame in 0..config.run.frames {
        let y = ctx.scene().viewport().scroll_y + config.run.scroll_speed * dt;
        ctx.scroll_to(y);
        ctx.frame(dt);
        if frame % 60 == 0 {
            tracing::trace!(frame, scroll_y = y, timelines = ctx.timeline_count(), "frame");
        }
    }

    Ok(snapshot(&page, config.run.frames, dt))
}

/// Report on a mounted page
pub fn snapshot(page: &Page, frames: usize, dt: f32) -> RunReport {
    let ctx = page.context();
    let (viewport, document_height) = {
        let scene = ctx.scene();
        (scene.viewport(), scene.document_height())
    };
    RunReport {
        frames,
        elapsed: frames as f32 * dt,
        viewport: [viewport.width, viewport.height],
        scroll_y: viewport.scroll_y,
        document_height,
        reduced_motion: ctx.reduced_motion(),
        active_timelines: ctx.timeline_count(),
        sections: page.report(),
    }
}
