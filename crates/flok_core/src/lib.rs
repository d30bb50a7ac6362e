//! Flok Core
//!
//! The foundation the motion layer runs on:
//!
//! - **Scene**: retained element tree with inline style overrides and text
//! - **Layout**: flexbox geometry via Taffy
//! - **Observers**: intersection and resize observation as explicit subscriptions
//!
//! # Example
//!
//! ```rust
//! use flok_core::{ElementSpec, ObserveOptions, ObserverRegistry, Scene, Viewport};
//! use std::cell::RefCell;
//!
//! let mut scene = Scene::new(Viewport::new(1280.0, 800.0));
//! let root = scene.root();
//! let card = scene.create(root, ElementSpec::new("div")).unwrap();
//! let scene = RefCell::new(scene);
//!
//! let observers = ObserverRegistry::new();
//! let _sub = observers.observe(card, ObserveOptions::new(0.25).once(), |entry| {
//!     println!("card visible: {}", entry.is_intersecting);
//! });
//!
//! // Entries are only delivered from the frame loop, never synchronously.
//! observers.deliver(&scene);
//! ```

pub mod geometry;
pub mod layout;
pub mod observer;
pub mod scene;
pub mod style;

pub use geometry::{Bounds, MarginValue, RootMargin};
pub use layout::{LayoutNodeId, LayoutTree};
pub use observer::{
    IntersectionEntry, ObserveOptions, ObserverId, ObserverRegistry, RelativePosition,
    Subscription,
};
pub use scene::{Element, ElementId, ElementSnapshot, ElementSpec, Overflow, Scene, Selector, Viewport};
pub use style::{ElementStyle, Property};
