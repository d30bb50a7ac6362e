//! Flok Motion
//!
//! Controllers that bind viewport signals to timelines:
//!
//! - **Reveal**: play a timeline on mount or when an element enters view
//! - **Scrub**: pinned hero whose timeline follows scroll progress
//! - **Marquee**: endless loop measured from live geometry
//! - **Counter**: count up to a number once visible
//! - **Conveyor**: repeating staggered arrow pulses
//!
//! Every controller works through a [`MotionSession`], which undoes all of
//! its effects on revert or drop.

pub mod config;
pub mod context;
pub mod conveyor;
pub mod counter;
pub mod marquee;
pub mod reveal;
pub mod scrub;
pub mod session;
pub mod split;

pub use config::MotionConfig;
pub use context::MotionContext;
pub use conveyor::{conveyor_timeline, ArrowConveyor, ConveyorDirection};
pub use counter::{format_count, Counter, CounterRange};
pub use marquee::{measure_unit, Marquee};
pub use reveal::{RevealController, RevealMode, RevealState, RevealTrigger};
pub use scrub::{hero_timeline, HeroTargets, ScrubReveal};
pub use session::{MotionSession, SessionHandle, SessionScope};
pub use split::{split_words, Fragment, SplitText};
