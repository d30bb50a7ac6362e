//! Flok Site
//!
//! The studio landing page, composed from the motion layer:
//!
//! - **Page**: builds the scene in visual order and mounts every section
//! - **Sections**: pinned hero, intro, achievements, services
//! - **Config**: `flok.toml` loading
//! - **Run**: headless scroll-through with a text or JSON report
//!
//! # Example
//!
//! ```rust
//! use flok_site::{run, SiteConfig};
//!
//! let mut config = SiteConfig::default();
//! config.run.frames = 120;
//! let report = run(&config).unwrap();
//! assert_eq!(report.sections.len(), 4);
//! ```

pub mod config;
pub mod content;
pub mod page;
pub mod report;
pub mod run;
pub mod sections;

pub use config::{RunConfig, SiteConfig, ViewportConfig, CONFIG_FILE};
pub use page::{build_scene, Page, PageElements};
pub use report::{ControllerReport, RunReport, SectionReport};
pub use run::{context, run, snapshot};
pub use sections::Section;
