//! Integration tests for the motion controllers
//!
//! These tests drive controllers through the public API only:
//! - Reduced motion reaches every end state without observers
//! - Counters count monotonically to their end, once
//! - The scrubbed hero follows scroll progress
//! - The marquee loops seamlessly and survives resizes
//! - Unmounting before a trigger leaves nothing behind

use flok_animation::{AnimationPreset, Position, Timeline};
use flok_core::{Bounds, ElementId, ElementSpec, ObserveOptions, Property, Scene, Viewport};
use flok_motion::{
    ArrowConveyor, ConveyorDirection, Counter, HeroTargets, Marquee, MotionConfig, MotionContext,
    MotionSession, RevealController, RevealMode, RevealState, RevealTrigger, ScrubReveal,
};

struct Page {
    ctx: MotionContext,
    hero: HeroTargets,
    card: ElementId,
    counter: ElementId,
    arrows: ElementId,
    track: ElementId,
}

/// A tall page: pinned hero at the top, then a card, a counter, an arrow
/// row, and a marquee track further down.
fn page(config: MotionConfig) -> Page {
    let ctx = MotionContext::new(Scene::new(Viewport::new(1000.0, 800.0)), config);
    let (hero, card, counter, arrows, track) = {
        let mut scene = ctx.scene_mut();
        let root = scene.root();
        scene.set_bounds(root, Bounds::new(0.0, 0.0, 1000.0, 6000.0));

        let wrapper = scene.create(root, ElementSpec::new("div")).unwrap();
        scene.set_bounds(wrapper, Bounds::new(0.0, 0.0, 1000.0, 800.0));
        let mask = scene.create(wrapper, ElementSpec::new("div")).unwrap();
        let title = scene.create(mask, ElementSpec::new("h1").text("Studio")).unwrap();
        let copy = scene.create(mask, ElementSpec::new("p").text("We make things move")).unwrap();
        let cta = scene.create(mask, ElementSpec::new("button").text("Start")).unwrap();

        let card = scene.create(root, ElementSpec::new("div")).unwrap();
        scene.set_bounds(card, Bounds::new(0.0, 2400.0, 500.0, 300.0));

        let counter = scene
            .create(
                root,
                ElementSpec::new("span")
                    .data("data-count", "")
                    .data("data-start", "0")
                    .data("data-end", "500"),
            )
            .unwrap();
        scene.set_bounds(counter, Bounds::new(0.0, 3200.0, 300.0, 100.0));

        let arrows = scene.create(root, ElementSpec::new("div")).unwrap();
        scene.set_bounds(arrows, Bounds::new(0.0, 3500.0, 400.0, 60.0));
        for _ in 0..6 {
            scene.create(arrows, ElementSpec::new("span").text("›")).unwrap();
        }

        let track = scene.create(root, ElementSpec::new("div")).unwrap();
        for i in 0..8 {
            let item = scene.create(track, ElementSpec::new("img")).unwrap();
            scene.set_bounds(item, Bounds::new(i as f32 * 120.0, 4000.0, 100.0, 80.0));
        }

        let hero = HeroTargets {
            wrapper,
            mask,
            title: Some(title),
            copy: Some(copy),
            cta: Some(cta),
        };
        (hero, card, counter, arrows, track)
    };
    Page {
        ctx,
        hero,
        card,
        counter,
        arrows,
        track,
    }
}

fn card_timeline(card: ElementId) -> Timeline {
    let preset = AnimationPreset::fade_up(0.8, 40.0);
    Timeline::builder()
        .from_to(&[card], preset.from, preset.to, preset.timing, Position::End)
        .build()
        .unwrap()
}

fn frames(ctx: &MotionContext, count: usize) {
    for _ in 0..count {
        ctx.frame(1.0 / 60.0);
    }
}

#[test]
fn test_reduced_motion_reaches_end_states_without_observers() {
    let p = page(MotionConfig::reduced());
    let session = MotionSession::new(&p.ctx);

    let hero = ScrubReveal::mount(&session, p.hero);
    let reveal = RevealController::mount(
        &session,
        p.card,
        card_timeline(p.card),
        RevealTrigger::InView(ObserveOptions::new(0.2)),
        RevealMode::Once,
    );
    let counter = Counter::mount(&session, p.counter);
    let conveyor = ArrowConveyor::mount(&session, p.arrows, ConveyorDirection::Right);
    let marquee = Marquee::mount(&session, p.track);

    // Synchronously, before any frame
    assert_eq!(p.ctx.observers().observer_count(), 0);
    assert_eq!(p.ctx.observers().resize_listener_count(), 0);
    assert_eq!(p.ctx.timeline_count(), 0);

    for state in [
        hero.state(),
        reveal.state(),
        counter.state(),
        conveyor.state(),
        marquee.state(),
    ] {
        assert_eq!(state, RevealState::Bypassed);
    }

    let scene = p.ctx.scene();
    assert_eq!(scene.style_value(p.hero.mask, Property::MaskSize), Some(100.0));
    for text in [p.hero.title, p.hero.copy, p.hero.cta].into_iter().flatten() {
        assert_eq!(scene.resolved(text, Property::Opacity), Some(1.0));
        assert_eq!(scene.resolved(text, Property::TranslateY), Some(0.0));
    }
    assert_eq!(scene.resolved(p.card, Property::Opacity), Some(1.0));
    assert_eq!(scene.resolved(p.card, Property::TranslateY), Some(0.0));
    assert_eq!(scene.text(p.counter), Some("500"));
    assert_eq!(scene.resolved(p.track, Property::TranslateX), Some(0.0));
}

#[test]
fn test_counter_counts_up_once() {
    let p = page(MotionConfig::default());
    let session = MotionSession::new(&p.ctx);
    let counter = Counter::mount(&session, p.counter);

    assert_eq!(p.ctx.scene().text(p.counter), Some("0"));
    p.ctx.scroll_to(2800.0);

    let mut seen = Vec::new();
    for _ in 0..120 {
        p.ctx.frame(1.0 / 60.0);
        let text = p.ctx.scene().text(p.counter).unwrap().to_string();
        seen.push(text.parse::<i64>().unwrap());
    }

    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
    assert_eq!(seen.last(), Some(&500));
    assert_eq!(counter.state(), RevealState::Settled);

    // Leave and come back: nothing changes
    let before = p.ctx.scene().mutation_count();
    p.ctx.scroll_to(0.0);
    frames(&p.ctx, 5);
    p.ctx.scroll_to(2800.0);
    frames(&p.ctx, 5);
    assert_eq!(p.ctx.scene().mutation_count(), before);
    assert_eq!(p.ctx.scene().text(p.counter), Some("500"));
}

#[test]
fn test_scrub_hero_follows_scroll() {
    let p = page(MotionConfig::immediate_scrub());
    let session = MotionSession::new(&p.ctx);
    let hero = ScrubReveal::mount(&session, p.hero);
    let (title, copy, cta) = (p.hero.title.unwrap(), p.hero.copy.unwrap(), p.hero.cta.unwrap());

    // Pinned range: two viewport heights from the top of the wrapper
    let at = |progress: f32| {
        p.ctx.scroll_to(progress * 1600.0);
        p.ctx.frame(1.0 / 60.0);
        let scene = p.ctx.scene();
        (
            scene.resolved(p.hero.mask, Property::MaskSize).unwrap(),
            scene.resolved(title, Property::Opacity).unwrap(),
            scene.resolved(copy, Property::Opacity).unwrap(),
            scene.resolved(cta, Property::Opacity).unwrap(),
        )
    };

    let (mask, t, c, a) = at(0.0);
    assert_eq!((mask, t, c, a), (0.0, 0.0, 0.0, 0.0));

    let (mask, t, _, _) = at(0.3);
    assert!(mask > 0.0 && mask < 100.0);
    assert_eq!(t, 0.0);

    let (mask, t, _, _) = at(0.6);
    assert!(mask > 30.0 && mask < 100.0);
    assert!(t < 0.01);

    let (mask, t, c, a) = at(0.8);
    assert!(mask < 100.0);
    assert!(t > 0.99);
    assert!(c > 0.0 && c < 1.0);
    assert!(a < 0.01);
    assert!(hero.scroll_state().unwrap().pinned);

    let (mask, t, c, a) = at(1.0);
    assert_eq!((mask, t, c, a), (100.0, 1.0, 1.0, 1.0));
    assert_eq!(p.ctx.scene().resolved(cta, Property::TranslateY), Some(0.0));

    // And back again
    let (mask, t, _, _) = at(0.3);
    assert!(mask > 0.0 && mask < 100.0);
    assert_eq!(t, 0.0);
}

#[test]
fn test_marquee_loops_and_rebuilds_on_resize() {
    let p = page(MotionConfig::default());
    let session = MotionSession::new(&p.ctx);
    let marquee = Marquee::mount(&session, p.track);

    let unit = marquee.unit_width().unwrap();
    assert_eq!(unit, 480.0);

    let x = |ctx: &MotionContext| ctx.scene().resolved(p.track, Property::TranslateX).unwrap();
    p.ctx.frame(3.0);
    assert!((x(&p.ctx) + unit / 4.0).abs() < 1e-3);

    p.ctx.frame(9.0);
    let wrapped = x(&p.ctx).rem_euclid(unit);
    assert!(wrapped < 1e-3 || (unit - wrapped) < 1e-3);

    let old = marquee.handle().unwrap();
    p.ctx.resize(1280.0, 720.0);
    let new = marquee.handle().unwrap();

    assert!(!old.is_alive());
    assert!(new.is_alive());
    assert_eq!(p.ctx.timeline_count(), 1);
    assert_eq!(marquee.build_count(), 2);
    assert_eq!(x(&p.ctx), 0.0);

    p.ctx.resize(1000.0, 800.0);
    assert_eq!(p.ctx.timeline_count(), 1);
}

#[test]
fn test_unmount_before_trigger_leaves_nothing() {
    let p = page(MotionConfig::default());
    {
        let session = MotionSession::new(&p.ctx);
        Counter::mount(&session, p.counter);
        ArrowConveyor::mount(&session, p.arrows, ConveyorDirection::Left);
        RevealController::mount(
            &session,
            p.card,
            card_timeline(p.card),
            RevealTrigger::InView(ObserveOptions::new(0.2)),
            RevealMode::Toggle,
        );
        frames(&p.ctx, 2);
        assert_eq!(p.ctx.observers().observer_count(), 3);
    }

    assert_eq!(p.ctx.observers().observer_count(), 0);
    assert_eq!(p.ctx.timeline_count(), 0);
    {
        let scene = p.ctx.scene();
        assert_eq!(scene.text(p.counter), Some(""));
        assert_eq!(scene.style_value(p.card, Property::Opacity), None);
    }

    let before = p.ctx.scene().mutation_count();
    for y in [2400.0, 3000.0, 3400.0, 0.0] {
        p.ctx.scroll_to(y);
        frames(&p.ctx, 10);
    }
    assert_eq!(p.ctx.scene().mutation_count(), before);
}
