//! Page composition
//!
//! Builds the landing page scene in visual order (pinned hero, intro,
//! achievements, services), lays it out with flexbox, and mounts one
//! controller set per section.

use crate::content::{self, achievements, cover, intro, main_hero, services};
use crate::report::SectionReport;
use crate::sections::{AchievementsSection, HeroSection, IntroSection, Section, ServicesSection};
use anyhow::{Context, Result};
use flok_core::{ElementId, ElementSpec, Overflow, Scene};
use flok_motion::MotionContext;
use taffy::prelude::{
    AlignItems, Dimension, FlexDirection, JustifyContent, LengthPercentage, LengthPercentageAuto,
    Position, Rect, Size, Style,
};

/// Below this width the page stacks rows into columns
pub const COMPACT_WIDTH: f32 = 1024.0;

/// Viewport heights the hero stays pinned for
const PIN_SCREENS: f32 = 2.0;

#[derive(Clone, Debug)]
pub struct HeroElements {
    pub wrapper: ElementId,
    /// Scroll room reserved for the pinned range
    pub spacer: Option<ElementId>,
    pub cover: ElementId,
    pub mask: ElementId,
    pub title: ElementId,
    pub copy: ElementId,
    pub cta: ElementId,
}

#[derive(Clone, Debug)]
pub struct IntroElements {
    pub section: ElementId,
    pub heading_spans: Vec<ElementId>,
    pub paragraph: ElementId,
    pub button: ElementId,
    pub images: Vec<ElementId>,
}

#[derive(Clone, Debug)]
pub struct AchievementElements {
    pub section: ElementId,
    pub heading: ElementId,
    /// `[data-count]` spans, one per stat
    pub counters: Vec<ElementId>,
    pub cta: ElementId,
    pub arrows_left: ElementId,
    pub arrows_right: ElementId,
}

#[derive(Clone, Debug)]
pub struct ServiceElements {
    pub section: ElementId,
    pub heading: ElementId,
    pub cards: Vec<ElementId>,
    /// Marquee track inside the thumbnails card
    pub track: ElementId,
}

/// Handles to every element a controller touches
#[derive(Clone, Debug)]
pub struct PageElements {
    pub hero: HeroElements,
    pub intro: IntroElements,
    pub achievements: AchievementElements,
    pub services: ServiceElements,
}

// ============================================================================
// Styles
// ============================================================================

fn px(value: f32) -> LengthPercentage {
    LengthPercentage::Length(value)
}

fn padding(vertical: f32, horizontal: f32) -> Rect<LengthPercentage> {
    Rect {
        left: px(horizontal),
        right: px(horizontal),
        top: px(vertical),
        bottom: px(vertical),
    }
}

fn stack(direction: FlexDirection, gap: f32) -> Style {
    Style {
        flex_direction: direction,
        gap: Size {
            width: px(gap),
            height: px(gap),
        },
        flex_shrink: 0.0,
        ..Default::default()
    }
}

fn column(gap: f32) -> Style {
    stack(FlexDirection::Column, gap)
}

fn row(gap: f32) -> Style {
    Style {
        align_items: Some(AlignItems::Center),
        ..stack(FlexDirection::Row, gap)
    }
}

fn section(vertical: f32, horizontal: f32, gap: f32) -> Style {
    Style {
        padding: padding(vertical, horizontal),
        ..column(gap)
    }
}

/// Fixed height, stretched or fixed width
fn block(width: Option<f32>, height: f32) -> Style {
    Style {
        size: Size {
            width: width.map_or(Dimension::Auto, Dimension::Length),
            height: Dimension::Length(height),
        },
        flex_shrink: 0.0,
        ..Default::default()
    }
}

fn grow(style: Style) -> Style {
    Style {
        flex_grow: 1.0,
        flex_basis: Dimension::Length(0.0),
        ..style
    }
}

/// Absolutely positioned layer covering its parent
fn layer() -> Style {
    let zero = LengthPercentageAuto::Length(0.0);
    Style {
        position: Position::Absolute,
        inset: Rect {
            left: zero,
            right: zero,
            top: zero,
            bottom: zero,
        },
        size: Size {
            width: Dimension::Percent(1.0),
            height: Dimension::Percent(1.0),
        },
        flex_direction: FlexDirection::Column,
        justify_content: Some(JustifyContent::SpaceBetween),
        padding: padding(48.0, 48.0),
        ..Default::default()
    }
}

// ============================================================================
// Scene
// ============================================================================

fn add(scene: &mut Scene, parent: ElementId, spec: ElementSpec) -> Result<ElementId> {
    scene
        .create(parent, spec)
        .context("page element parent disappeared while building")
}

fn text(tag: &str, copy: &str, style: Style) -> ElementSpec {
    ElementSpec::new(tag).text(copy).layout(style)
}

/// Build the whole page into `scene` and lay it out.
///
/// The pin spacer is left out when motion is reduced, since nothing pins.
pub fn build_scene(scene: &mut Scene, reduced_motion: bool) -> Result<PageElements> {
    let root = scene.root();
    let viewport = scene.viewport();
    let compact = viewport.width < COMPACT_WIDTH;

    let hero = build_hero(scene, root, viewport.height, reduced_motion)?;
    let intro = build_intro(scene, root, compact)?;
    let achievements = build_achievements(scene, root, compact)?;
    let services = build_services(scene, root)?;

    scene.compute_layout();
    tracing::debug!(
        elements = scene.len(),
        height = scene.document_height(),
        compact,
        "page built"
    );

    Ok(PageElements {
        hero,
        intro,
        achievements,
        services,
    })
}

fn build_hero(
    scene: &mut Scene,
    root: ElementId,
    screen: f32,
    reduced_motion: bool,
) -> Result<HeroElements> {
    let wrapper = add(
        scene,
        root,
        ElementSpec::new("div")
            .class("hero-wrap")
            .overflow(Overflow::Hidden)
            .layout(block(None, screen)),
    )?;

    let cover_layer = add(scene, wrapper, ElementSpec::new("section").class("cover").layout(layer()))?;
    add(scene, cover_layer, text("div", cover::LABEL, block(None, 20.0)))?;
    let cover_title = add(scene, cover_layer, ElementSpec::new("h1").layout(column(0.0)))?;
    for line in cover::TITLE {
        add(scene, cover_title, text("span", line, block(None, 200.0)))?;
    }
    add(scene, cover_layer, text("a", cover::EMAIL, block(None, 20.0)))?;

    let mask = add(scene, wrapper, ElementSpec::new("div").class("main-hero").layout(layer()))?;
    add(scene, mask, text("div", main_hero::BRAND, block(None, 24.0)))?;
    let content = add(scene, mask, ElementSpec::new("div").layout(column(24.0)))?;
    let title = add(
        scene,
        content,
        ElementSpec::new("h1")
            .class("mh-title")
            .text(main_hero::TITLE)
            .layout(block(None, 180.0)),
    )?;
    let copy = add(
        scene,
        content,
        ElementSpec::new("p")
            .class("mh-copy")
            .text(main_hero::COPY)
            .layout(block(Some(420.0), 72.0)),
    )?;
    let cta = add(
        scene,
        content,
        ElementSpec::new("button")
            .class("mh-cta")
            .text(main_hero::CTA)
            .layout(block(Some(200.0), 52.0)),
    )?;

    let spacer = if reduced_motion {
        None
    } else {
        Some(add(
            scene,
            root,
            ElementSpec::new("div")
                .class("pin-spacer")
                .layout(block(None, PIN_SCREENS * screen)),
        )?)
    };

    Ok(HeroElements {
        wrapper,
        spacer,
        cover: cover_layer,
        mask,
        title,
        copy,
        cta,
    })
}

fn build_intro(scene: &mut Scene, root: ElementId, compact: bool) -> Result<IntroElements> {
    let section_el = add(
        scene,
        root,
        ElementSpec::new("section").class("intro").layout(section(96.0, 48.0, 32.0)),
    )?;

    let heading = add(scene, section_el, ElementSpec::new("h1").layout(column(0.0)))?;
    let heading_spans = intro::HEADING
        .iter()
        .map(|line| add(scene, heading, text("span", line, block(None, 110.0))))
        .collect::<Result<Vec<_>>>()?;

    let paragraph = add(
        scene,
        section_el,
        text("p", intro::PARAGRAPH, block(Some(560.0), 84.0)),
    )?;
    let button = add(
        scene,
        section_el,
        text("button", intro::BUTTON, block(Some(180.0), 52.0)),
    )?;

    let collage = add(
        scene,
        section_el,
        ElementSpec::new("div").layout(if compact { column(16.0) } else { row(24.0) }),
    )?;
    let images = intro::IMAGES
        .iter()
        .map(|src| {
            add(
                scene,
                collage,
                ElementSpec::new("img")
                    .data("src", *src)
                    .layout(block(Some(320.0), 420.0)),
            )
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(IntroElements {
        section: section_el,
        heading_spans,
        paragraph,
        button,
        images,
    })
}

fn build_achievements(
    scene: &mut Scene,
    root: ElementId,
    compact: bool,
) -> Result<AchievementElements> {
    let section_el = add(
        scene,
        root,
        ElementSpec::new("section")
            .class("achievements")
            .layout(section(160.0, 48.0, 64.0)),
    )?;
    let heading = add(
        scene,
        section_el,
        text("h2", achievements::HEADING, block(None, 120.0)),
    )?;

    let stats = add(
        scene,
        section_el,
        ElementSpec::new("div").layout(if compact { column(48.0) } else { row(32.0) }),
    )?;
    let mut counters = Vec::with_capacity(achievements::STATS.len());
    for stat in &achievements::STATS {
        counters.push(build_stat(scene, stats, stat, compact)?);
    }

    let cta_row = add(scene, section_el, ElementSpec::new("div").layout(row(24.0)))?;
    let arrows_left = build_arrow_row(scene, cta_row, "left", achievements::ARROW_LEFT)?;
    let cta = add(
        scene,
        cta_row,
        text("button", achievements::CTA, block(Some(220.0), 56.0)),
    )?;
    let arrows_right = build_arrow_row(scene, cta_row, "right", achievements::ARROW_RIGHT)?;

    Ok(AchievementElements {
        section: section_el,
        heading,
        counters,
        cta,
        arrows_left,
        arrows_right,
    })
}

/// One stat card. Returns its counter span.
fn build_stat(
    scene: &mut Scene,
    parent: ElementId,
    stat: &content::Stat,
    compact: bool,
) -> Result<ElementId> {
    let card_style = Style {
        size: Size {
            width: Dimension::Auto,
            height: Dimension::Length(240.0),
        },
        ..column(12.0)
    };
    let card = add(
        scene,
        parent,
        ElementSpec::new("div")
            .data("data-stat-card", "")
            .layout(if compact { card_style } else { grow(card_style) }),
    )?;

    let value = add(scene, card, ElementSpec::new("div").layout(row(0.0)))?;
    add(scene, value, text("span", stat.prefix, block(Some(40.0), 64.0)))?;
    let counter = add(
        scene,
        value,
        ElementSpec::new("span")
            .data("data-count", "")
            .data("data-start", "0")
            .data("data-end", stat.end.to_string())
            .layout(block(Some(140.0), 64.0)),
    )?;
    add(scene, value, text("span", stat.suffix, block(Some(40.0), 64.0)))?;

    add(scene, card, text("p", stat.title, block(None, 28.0)))?;
    add(scene, card, text("p", stat.body, block(None, 48.0)))?;
    Ok(counter)
}

fn build_arrow_row(scene: &mut Scene, parent: ElementId, side: &str, glyph: &str) -> Result<ElementId> {
    let arrows = add(
        scene,
        parent,
        ElementSpec::new("div")
            .data("data-arrows", side)
            .layout(row(8.0)),
    )?;
    for _ in 0..achievements::ARROW_COUNT {
        add(
            scene,
            arrows,
            ElementSpec::new("span")
                .data("data-arrow", "")
                .text(glyph)
                .layout(block(Some(24.0), 24.0)),
        )?;
    }
    Ok(arrows)
}

fn build_services(scene: &mut Scene, root: ElementId) -> Result<ServiceElements> {
    let section_el = add(
        scene,
        root,
        ElementSpec::new("section")
            .class("services")
            .layout(section(160.0, 48.0, 40.0)),
    )?;
    add(scene, section_el, text("p", services::LABEL, block(None, 20.0)))?;
    let heading = add(
        scene,
        section_el,
        text("h2", services::HEADING, block(None, 150.0)),
    )?;

    let grid = add(scene, section_el, ElementSpec::new("div").layout(column(16.0)))?;
    let mut cards = Vec::with_capacity(services::CARDS.len());
    let mut track = None;
    for card in &services::CARDS {
        let card_el = add(
            scene,
            grid,
            ElementSpec::new("div")
                .class("service-card")
                .overflow(Overflow::Hidden)
                .layout(Style {
                    padding: padding(24.0, 24.0),
                    size: Size {
                        width: Dimension::Auto,
                        height: Dimension::Length(card.height),
                    },
                    ..column(12.0)
                }),
        )?;
        if let Some(label) = card.label {
            add(scene, card_el, text("p", label, block(None, 16.0)))?;
        }
        add(scene, card_el, text("h3", card.title, block(None, 44.0)))?;
        if let Some(body) = card.body {
            add(scene, card_el, text("p", body, block(None, 48.0)))?;
        }
        if card.marquee {
            track = Some(build_track(scene, card_el)?);
        }
        cards.push(card_el);
    }

    Ok(ServiceElements {
        section: section_el,
        heading,
        cards,
        track: track.context("no service card hosts the thumbnail marquee")?,
    })
}

fn build_track(scene: &mut Scene, card: ElementId) -> Result<ElementId> {
    let window = add(
        scene,
        card,
        ElementSpec::new("div")
            .overflow(Overflow::Hidden)
            .layout(block(None, 155.0)),
    )?;
    let track = add(
        scene,
        window,
        ElementSpec::new("div").class("thumb-track").layout(Style {
            size: Size {
                width: Dimension::Auto,
                height: Dimension::Percent(1.0),
            },
            ..row(28.0)
        }),
    )?;
    for src in services::THUMBNAILS {
        add(
            scene,
            track,
            ElementSpec::new("img")
                .data("src", src)
                .layout(block(Some(360.0), 155.0)),
        )?;
    }
    Ok(track)
}

// ============================================================================
// Page
// ============================================================================

/// The landing page: a built scene plus its mounted sections
pub struct Page {
    ctx: MotionContext,
    elements: PageElements,
    sections: Vec<Box<dyn Section>>,
}

impl Page {
    /// Build the page into the context's scene. Nothing is mounted yet.
    pub fn build(ctx: &MotionContext) -> Result<Self> {
        let elements = {
            let mut scene = ctx.scene_mut();
            build_scene(&mut scene, ctx.reduced_motion())?
        };
        Ok(Self {
            ctx: ctx.clone(),
            elements,
            sections: Vec::new(),
        })
    }

    /// Mount every section in visual order. Mounting twice is a no-op.
    pub fn mount(&mut self) {
        if self.is_mounted() {
            return;
        }
        let ctx = &self.ctx;
        let elements = &self.elements;
        let sections: Vec<Box<dyn Section>> = vec![
            Box::new(HeroSection::mount(ctx, &elements.hero)),
            Box::new(IntroSection::mount(ctx, &elements.intro)),
            Box::new(AchievementsSection::mount(ctx, &elements.achievements)),
            Box::new(ServicesSection::mount(ctx, &elements.services)),
        ];
        self.sections = sections;
        tracing::info!(sections = self.sections.len(), "page mounted");
    }

    /// Tear down every section, last mounted first
    pub fn unmount(&mut self) {
        while let Some(section) = self.sections.pop() {
            tracing::debug!(section = section.name(), "unmounting");
            drop(section);
        }
    }

    pub fn is_mounted(&self) -> bool {
        !self.sections.is_empty()
    }

    pub fn context(&self) -> &MotionContext {
        &self.ctx
    }

    pub fn elements(&self) -> &PageElements {
        &self.elements
    }

    pub fn sections(&self) -> &[Box<dyn Section>] {
        &self.sections
    }

    /// Per-section controller states
    pub fn report(&self) -> Vec<SectionReport> {
        let scene = self.ctx.scene();
        self.sections.iter().map(|s| s.report(&scene)).collect()
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        self.unmount();
    }
}
