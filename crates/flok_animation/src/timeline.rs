//! Timeline orchestration for multiple animations
//!
//! A [`TimelineBuilder`] collects steps (`to`, `from`, `from_to`,
//! `tween_value`) and labels. Each step has a [`Position`]: absolute, relative
//! to the end, relative to the previous step's start, or relative to a
//! label. `build` resolves every position once into absolute start times, so
//! playback never looks labels up again.
//!
//! Rendering is a pure function of the playhead. For each target property the
//! latest step that has started wins. Before any step on it has started, a
//! property shows the first step's from-value.

use crate::easing::Easing;
use crate::scroll::{ScrollTrigger, ScrollTriggerState};
use crate::value::ValueCell;
use flok_core::{ElementId, Property, Scene};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building a timeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    #[error("label `{0}` is not defined earlier in the timeline")]
    UnknownLabel(String),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(f32),

    #[error("invalid stagger: {0}")]
    InvalidStagger(f32),
}

// ============================================================================
// Step description
// ============================================================================

/// A set of property values
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    values: SmallVec<[(Property, f32); 4]>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set any property
    pub fn with(mut self, property: Property, value: f32) -> Self {
        match self.values.iter_mut().find(|(p, _)| *p == property) {
            Some((_, v)) => *v = value,
            None => self.values.push((property, value)),
        }
        self
    }

    pub fn opacity(self, value: f32) -> Self {
        self.with(Property::Opacity, value)
    }

    pub fn x(self, value: f32) -> Self {
        self.with(Property::TranslateX, value)
    }

    pub fn y(self, value: f32) -> Self {
        self.with(Property::TranslateY, value)
    }

    pub fn scale(self, value: f32) -> Self {
        self.with(Property::Scale, value)
    }

    pub fn blur(self, value: f32) -> Self {
        self.with(Property::Blur, value)
    }

    pub fn mask(self, value: f32) -> Self {
        self.with(Property::MaskSize, value)
    }

    pub fn get(&self, property: Property) -> Option<f32> {
        self.values
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, f32)> + '_ {
        self.values.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Duration, easing and stagger of a step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    /// Seconds
    pub duration: f32,
    /// Falls back to the timeline's default easing when `None`
    pub easing: Option<Easing>,
    /// Seconds between successive targets
    pub stagger: f32,
}

impl Timing {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            easing: None,
            stagger: 0.0,
        }
    }

    /// Builder: set easing
    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Builder: set per-target stagger
    pub fn stagger(mut self, stagger: f32) -> Self {
        self.stagger = stagger;
        self
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(0.5)
    }
}

/// Where a step (or label) is placed on the timeline
#[derive(Clone, Debug, PartialEq)]
pub enum Position {
    /// At the current end of the timeline
    End,
    /// At an absolute time in seconds
    At(f32),
    /// Relative to the current end (`+=0.2`, `-=0.4`)
    FromEnd(f32),
    /// Relative to the start of the previous step (`<`, `<+=0.1`)
    PreviousStart(f32),
    /// Relative to a label (`intro`, `intro+=0.15`)
    Label(String, f32),
}

impl Position {
    /// Shorthand for `Position::Label(name, delta)`
    pub fn label(name: impl Into<String>, delta: f32) -> Self {
        Position::Label(name.into(), delta)
    }
}

impl From<f32> for Position {
    fn from(time: f32) -> Self {
        Position::At(time)
    }
}

fn parse_delta(input: &str, full: &str) -> Result<f32, TimelineError> {
    let invalid = || TimelineError::InvalidPosition(full.to_string());
    if input.is_empty() {
        return Ok(0.0);
    }
    if let Some(rest) = input.strip_prefix("+=") {
        return rest.trim().parse::<f32>().map_err(|_| invalid());
    }
    if let Some(rest) = input.strip_prefix("-=") {
        return rest.trim().parse::<f32>().map(|v| -v).map_err(|_| invalid());
    }
    Err(invalid())
}

impl FromStr for Position {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Ok(Position::End);
        }
        if let Some(rest) = input.strip_prefix('<') {
            return parse_delta(rest.trim(), input).map(Position::PreviousStart);
        }
        if input.starts_with("+=") || input.starts_with("-=") {
            return parse_delta(input, input).map(Position::FromEnd);
        }
        if let Ok(time) = input.parse::<f32>() {
            return Ok(Position::At(time));
        }

        let split = input.find("+=").or_else(|| input.find("-="));
        let (name, delta) = match split {
            Some(index) => (input[..index].trim(), parse_delta(&input[index..], input)?),
            None => (input, 0.0),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Err(TimelineError::InvalidPosition(input.to_string()));
        }
        Ok(Position::Label(name.to_string(), delta))
    }
}

// ============================================================================
// Tracks
// ============================================================================

/// Something a tween writes to
#[derive(Clone, Debug)]
pub enum Track {
    Style(ElementId, Property),
    Value(ValueCell),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum TrackKey {
    Style(ElementId, Property),
    Value(usize),
}

impl Track {
    fn key(&self) -> TrackKey {
        match self {
            Track::Style(id, property) => TrackKey::Style(*id, *property),
            Track::Value(cell) => TrackKey::Value(cell.key()),
        }
    }

    /// Current value in the scene (or cell)
    fn read(&self, scene: &Scene) -> f32 {
        match self {
            Track::Style(id, property) => scene
                .resolved(*id, *property)
                .unwrap_or_else(|| property.identity()),
            Track::Value(cell) => cell.get(),
        }
    }

    fn write(&self, scene: &mut Scene, value: f32) {
        match self {
            Track::Style(id, property) => {
                scene.set_style(*id, *property, value);
            }
            Track::Value(cell) => cell.set(value),
        }
    }

    pub fn element(&self) -> Option<ElementId> {
        match self {
            Track::Style(id, _) => Some(*id),
            Track::Value(_) => None,
        }
    }
}

/// A tween endpoint
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Endpoint {
    Value(f32),
    /// Whatever the track holds when the timeline first renders
    Current,
}

struct TweenDecl {
    track: Track,
    from: Endpoint,
    to: Endpoint,
}

enum Declaration {
    Step {
        targets: Vec<SmallVec<[TweenDecl; 4]>>,
        timing: Timing,
        position: Position,
    },
    Label {
        name: String,
        position: Position,
    },
}

/// A tween with its absolute placement resolved
#[derive(Clone, Debug)]
pub struct ResolvedTween {
    pub track: Track,
    pub from: Endpoint,
    pub to: Endpoint,
    pub start: f32,
    pub duration: f32,
    pub easing: Easing,
    /// Declaration order, used to break ties between equal start times
    pub order: usize,
    from_value: f32,
    to_value: f32,
}

impl ResolvedTween {
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    fn local_progress(&self, time: f32) -> f32 {
        if self.duration <= 0.0 || time >= self.end() {
            return 1.0;
        }
        ((time - self.start) / self.duration).clamp(0.0, 1.0)
    }

    fn value_at(&self, time: f32) -> f32 {
        let eased = self.easing.apply(self.local_progress(time));
        self.from_value + (self.to_value - self.from_value) * eased
    }
}

type UpdateCallback = Box<dyn FnMut(&mut Scene)>;

// ============================================================================
// Builder
// ============================================================================

/// Declarative builder for [`Timeline`]
pub struct TimelineBuilder {
    declarations: Vec<Declaration>,
    default_easing: Easing,
    repeat: i32,
    yoyo: bool,
    keep_alive: bool,
    scrub: Option<ScrollTrigger>,
    on_update: Option<UpdateCallback>,
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self {
            declarations: Vec::new(),
            default_easing: Easing::EaseOutQuad,
            repeat: 0,
            yoyo: false,
            keep_alive: false,
            scrub: None,
            on_update: None,
        }
    }

    /// Easing used by steps that don't set their own
    pub fn default_easing(mut self, easing: Easing) -> Self {
        self.default_easing = easing;
        self
    }

    /// Additional iterations after the first (-1 for infinite)
    pub fn repeat(mut self, count: i32) -> Self {
        self.repeat = count;
        self
    }

    /// Alternate direction on every other iteration
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Stay registered after completing so the timeline can be reversed
    pub fn keep_alive(mut self) -> Self {
        self.keep_alive = true;
        self
    }

    /// Drive the playhead from scroll position instead of time
    pub fn scrub(mut self, trigger: ScrollTrigger) -> Self {
        self.scrub = Some(trigger);
        self
    }

    /// Callback invoked after every render
    pub fn on_update<F: FnMut(&mut Scene) + 'static>(mut self, callback: F) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }

    /// Animate targets from their current values to `to`
    pub fn to(
        self,
        targets: &[ElementId],
        to: Props,
        timing: Timing,
        position: impl Into<Position>,
    ) -> Self {
        self.step(targets, None, Some(to), timing, position.into())
    }

    /// Animate targets from `from` to their current values
    pub fn from(
        self,
        targets: &[ElementId],
        from: Props,
        timing: Timing,
        position: impl Into<Position>,
    ) -> Self {
        self.step(targets, Some(from), None, timing, position.into())
    }

    /// Animate targets between explicit values
    pub fn from_to(
        self,
        targets: &[ElementId],
        from: Props,
        to: Props,
        timing: Timing,
        position: impl Into<Position>,
    ) -> Self {
        self.step(targets, Some(from), Some(to), timing, position.into())
    }

    /// Animate a shared number
    pub fn tween_value(
        mut self,
        cell: &ValueCell,
        from: f32,
        to: f32,
        timing: Timing,
        position: impl Into<Position>,
    ) -> Self {
        let mut tweens = SmallVec::new();
        tweens.push(TweenDecl {
            track: Track::Value(cell.clone()),
            from: Endpoint::Value(from),
            to: Endpoint::Value(to),
        });
        self.declarations.push(Declaration::Step {
            targets: vec![tweens],
            timing,
            position: position.into(),
        });
        self
    }

    /// Record a named point in time
    pub fn label(mut self, name: impl Into<String>, position: impl Into<Position>) -> Self {
        self.declarations.push(Declaration::Label {
            name: name.into(),
            position: position.into(),
        });
        self
    }

    fn step(
        mut self,
        targets: &[ElementId],
        from: Option<Props>,
        to: Option<Props>,
        timing: Timing,
        position: Position,
    ) -> Self {
        // Property order: `to` first, then anything only present in `from`
        let mut properties: SmallVec<[Property; 4]> = SmallVec::new();
        for (property, _) in to.iter().flat_map(|p| p.iter()).chain(from.iter().flat_map(|p| p.iter())) {
            if !properties.contains(&property) {
                properties.push(property);
            }
        }

        let endpoint = |props: &Option<Props>, property: Property| {
            props
                .as_ref()
                .and_then(|p| p.get(property))
                .map_or(Endpoint::Current, Endpoint::Value)
        };

        let per_target = targets
            .iter()
            .map(|&target| {
                properties
                    .iter()
                    .map(|&property| TweenDecl {
                        track: Track::Style(target, property),
                        from: endpoint(&from, property),
                        to: endpoint(&to, property),
                    })
                    .collect()
            })
            .collect();

        self.declarations.push(Declaration::Step {
            targets: per_target,
            timing,
            position,
        });
        self
    }

    /// Resolve every position into absolute start times
    pub fn build(self) -> Result<Timeline, TimelineError> {
        let mut labels: FxHashMap<String, f32> = FxHashMap::default();
        let mut tweens = Vec::new();
        let mut end = 0.0_f32;
        let mut previous_start = 0.0_f32;
        let mut order = 0;

        for declaration in self.declarations {
            match declaration {
                Declaration::Label { name, position } => {
                    let at = resolve(&position, end, previous_start, &labels)?;
                    end = end.max(at);
                    labels.insert(name, at);
                }
                Declaration::Step {
                    targets,
                    timing,
                    position,
                } => {
                    if !timing.duration.is_finite() || timing.duration < 0.0 {
                        return Err(TimelineError::InvalidDuration(timing.duration));
                    }
                    if !timing.stagger.is_finite() || timing.stagger < 0.0 {
                        return Err(TimelineError::InvalidStagger(timing.stagger));
                    }

                    let start = resolve(&position, end, previous_start, &labels)?;
                    let easing = timing.easing.unwrap_or(self.default_easing);
                    if targets.is_empty() {
                        tracing::trace!("timeline step without targets at {start}");
                    }

                    let count = targets.len();
                    for (index, decls) in targets.into_iter().enumerate() {
                        let target_start = start + index as f32 * timing.stagger;
                        for decl in decls {
                            tweens.push(ResolvedTween {
                                track: decl.track,
                                from: decl.from,
                                to: decl.to,
                                start: target_start,
                                duration: timing.duration,
                                easing,
                                order,
                                from_value: 0.0,
                                to_value: 0.0,
                            });
                            order += 1;
                        }
                    }

                    let step_end =
                        start + count.saturating_sub(1) as f32 * timing.stagger + timing.duration;
                    end = end.max(step_end);
                    previous_start = start;
                }
            }
        }

        // Stable: equal start times keep declaration order
        tweens.sort_by(|a, b| a.start.total_cmp(&b.start));

        Ok(Timeline {
            tweens,
            labels,
            duration: end,
            repeat: self.repeat,
            yoyo: self.yoyo,
            keep_alive: self.keep_alive,
            scrub: self.scrub,
            on_update: self.on_update,
            total_time: 0.0,
            state: PlaybackState::Idle,
            reversed: false,
            resolved: false,
        })
    }
}

fn resolve(
    position: &Position,
    end: f32,
    previous_start: f32,
    labels: &FxHashMap<String, f32>,
) -> Result<f32, TimelineError> {
    let at = match position {
        Position::End => end,
        Position::At(time) => *time,
        Position::FromEnd(delta) => end + delta,
        Position::PreviousStart(delta) => previous_start + delta,
        Position::Label(name, delta) => {
            let base = labels
                .get(name)
                .ok_or_else(|| TimelineError::UnknownLabel(name.clone()))?;
            base + delta
        }
    };
    if !at.is_finite() {
        return Err(TimelineError::InvalidPosition(format!("{position:?}")));
    }
    Ok(at.max(0.0))
}

// ============================================================================
// Playback
// ============================================================================

/// Playback state of a timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Built but never started
    Idle,
    Playing,
    Paused,
    /// Reached its end (or its start, when reversed)
    Completed,
    /// Cancelled; never renders again
    Killed,
}

/// A composed, playable timeline
pub struct Timeline {
    tweens: Vec<ResolvedTween>,
    labels: FxHashMap<String, f32>,
    duration: f32,
    repeat: i32,
    yoyo: bool,
    keep_alive: bool,
    scrub: Option<ScrollTrigger>,
    on_update: Option<UpdateCallback>,
    /// Playhead across all iterations
    total_time: f32,
    state: PlaybackState,
    reversed: bool,
    resolved: bool,
}

impl Timeline {
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::new()
    }

    /// Duration of a single iteration in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Duration including repeats, `None` when repeating forever
    pub fn total_duration(&self) -> Option<f32> {
        if self.repeat < 0 {
            None
        } else {
            Some(self.duration * (self.repeat + 1) as f32)
        }
    }

    pub fn label_time(&self, name: &str) -> Option<f32> {
        self.labels.get(name).copied()
    }

    pub fn tweens(&self) -> &[ResolvedTween] {
        &self.tweens
    }

    /// Earliest start time of any tween touching `target`
    pub fn start_time_of(&self, target: ElementId) -> Option<f32> {
        self.tweens
            .iter()
            .filter(|t| t.track.element() == Some(target))
            .map(|t| t.start)
            .reduce(f32::min)
    }

    /// Every element the timeline writes to, deduplicated, in first-touch order
    pub fn targets(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        for tween in &self.tweens {
            if let Some(id) = tween.track.element() {
                if !out.contains(&id) {
                    out.push(id);
                }
            }
        }
        out
    }

    /// Explicit value of every element property once the timeline finishes.
    ///
    /// Properties that finish on `Current` are left out: their end state is
    /// the element's natural state. A yoyo that ends on a backwards pass
    /// finishes on its initial values.
    pub fn end_values(&self) -> Vec<(ElementId, Property, f32)> {
        let backwards = self.yoyo && self.repeat >= 0 && (self.repeat + 1) % 2 == 0;

        let mut chosen: FxHashMap<TrackKey, &ResolvedTween> = FxHashMap::default();
        let mut order: Vec<TrackKey> = Vec::new();
        for tween in &self.tweens {
            let key = tween.track.key();
            if !chosen.contains_key(&key) {
                order.push(key);
                chosen.insert(key, tween);
            } else if !backwards {
                // Tweens are in start order, so the last one wins
                chosen.insert(key, tween);
            }
        }

        order
            .into_iter()
            .filter_map(|key| {
                let tween = chosen.get(&key)?;
                let endpoint = if backwards { tween.from } else { tween.to };
                match (&tween.track, endpoint) {
                    (Track::Style(id, property), Endpoint::Value(v)) => Some((*id, *property, v)),
                    _ => None,
                }
            })
            .collect()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn is_scrubbed(&self) -> bool {
        self.scrub.is_some()
    }

    pub fn keeps_alive(&self) -> bool {
        self.keep_alive
    }

    /// Stay registered after completing (needed to reverse later)
    pub fn set_keep_alive(&mut self, keep_alive: bool) {
        self.keep_alive = keep_alive;
    }

    /// State of the linked scroll trigger, if any
    pub fn scroll_trigger(&self) -> Option<ScrollTriggerState> {
        self.scrub.as_ref().map(ScrollTrigger::state)
    }

    /// Playhead within the current iteration
    pub fn time(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        if let Some(total) = self.total_duration() {
            if self.total_time >= total {
                let finished_backwards = self.yoyo && (self.repeat + 1) % 2 == 0;
                return if finished_backwards { 0.0 } else { self.duration };
            }
        }
        let iteration = (self.total_time / self.duration).floor();
        let local = self.total_time - iteration * self.duration;
        if self.yoyo && (iteration as i64) % 2 == 1 {
            self.duration - local
        } else {
            local
        }
    }

    /// Progress through the current iteration (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return if self.state == PlaybackState::Completed { 1.0 } else { 0.0 };
        }
        (self.time() / self.duration).clamp(0.0, 1.0)
    }

    pub fn play(&mut self) {
        if self.state == PlaybackState::Killed {
            return;
        }
        self.reversed = false;
        if self.state == PlaybackState::Completed && self.at_end() {
            return;
        }
        self.state = PlaybackState::Playing;
    }

    pub fn reverse(&mut self) {
        if self.state == PlaybackState::Killed {
            return;
        }
        self.reversed = true;
        if self.total_time <= 0.0 {
            self.state = PlaybackState::Completed;
            return;
        }
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
        }
    }

    pub fn restart(&mut self) {
        if self.state == PlaybackState::Killed {
            return;
        }
        self.total_time = 0.0;
        self.reversed = false;
        self.state = PlaybackState::Playing;
    }

    /// Cancel the timeline. Killed timelines never render again.
    pub fn kill(&mut self) {
        self.state = PlaybackState::Killed;
        self.on_update = None;
    }

    fn at_end(&self) -> bool {
        self.total_duration()
            .map_or(false, |total| self.total_time >= total)
    }

    /// Jump to a time within the first iteration and render
    pub fn seek(&mut self, time: f32, scene: &mut Scene) {
        if self.state == PlaybackState::Killed {
            return;
        }
        self.total_time = time.clamp(0.0, self.duration);
        self.render(scene);
    }

    /// Jump to a normalized progress and render
    pub fn set_progress(&mut self, progress: f32, scene: &mut Scene) {
        self.seek(progress.clamp(0.0, 1.0) * self.duration, scene);
    }

    /// Advance by `dt` seconds of wall-clock time (ignored when scrubbed)
    pub fn advance(&mut self, dt: f32, scene: &mut Scene) {
        if self.state != PlaybackState::Playing || self.scrub.is_some() {
            return;
        }

        if self.reversed {
            self.total_time -= dt;
            if self.total_time <= 0.0 {
                self.total_time = 0.0;
                self.state = PlaybackState::Completed;
            }
        } else {
            self.total_time += dt;
            if let Some(total) = self.total_duration() {
                if self.total_time >= total {
                    self.total_time = total;
                    self.state = PlaybackState::Completed;
                }
            }
        }
        self.render(scene);
    }

    /// Follow the linked scroll trigger, smoothing over `dt` seconds
    pub fn update_scrub(&mut self, dt: f32, scene: &mut Scene) {
        if matches!(self.state, PlaybackState::Killed | PlaybackState::Paused) {
            return;
        }
        let Some(trigger) = self.scrub.as_mut() else {
            return;
        };
        let Some(target) = trigger.update(scene) else {
            return;
        };
        let smoothing = trigger.smoothing();

        let current = self.progress();
        let next = if smoothing <= 0.0 || dt <= 0.0 {
            target
        } else {
            let alpha = (dt / smoothing).min(1.0);
            let eased = current + (target - current) * alpha;
            if (target - eased).abs() < 1e-4 {
                target
            } else {
                eased
            }
        };

        self.state = PlaybackState::Playing;
        self.total_time = next * self.duration;
        self.render(scene);
    }

    /// Write the values for the current playhead into the scene
    pub fn render(&mut self, scene: &mut Scene) {
        if self.state == PlaybackState::Killed {
            return;
        }
        if !self.resolved {
            self.resolve_endpoints(scene);
        }

        let time = self.time();
        let mut values: FxHashMap<TrackKey, (usize, f32)> = FxHashMap::default();
        for (index, tween) in self.tweens.iter().enumerate() {
            let key = tween.track.key();
            if tween.start <= time {
                values.insert(key, (index, tween.value_at(time)));
            } else {
                values.entry(key).or_insert((index, tween.from_value));
            }
        }

        let mut writes: Vec<(usize, f32)> = values.into_values().collect();
        writes.sort_by_key(|(index, _)| *index);
        for (index, value) in writes {
            self.tweens[index].track.write(scene, value);
        }

        if let Some(callback) = self.on_update.as_mut() {
            callback(scene);
        }
    }

    /// Replace `Current` endpoints with concrete values, chaining per track
    fn resolve_endpoints(&mut self, scene: &Scene) {
        let mut previous: FxHashMap<TrackKey, usize> = FxHashMap::default();

        for index in 0..self.tweens.len() {
            let key = self.tweens[index].track.key();
            let start = self.tweens[index].start;
            let running = match previous.get(&key) {
                Some(&prev) => self.tweens[prev].value_at(start),
                None => self.tweens[index].track.read(scene),
            };

            let tween = &mut self.tweens[index];
            tween.from_value = match tween.from {
                Endpoint::Value(v) => v,
                Endpoint::Current => running,
            };
            tween.to_value = match tween.to {
                Endpoint::Value(v) => v,
                Endpoint::Current => running,
            };
            previous.insert(key, index);
        }
        self.resolved = true;
    }
}
