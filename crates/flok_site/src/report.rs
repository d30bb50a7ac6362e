//! Run reports
//!
//! A snapshot of every controller after a headless run, printable as text
//! or JSON.

use anyhow::{Context, Result};
use flok_motion::RevealState;
use serde::Serialize;
use std::fmt;

/// State of one controller
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ControllerReport {
    pub name: String,
    pub state: RevealState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ControllerReport {
    pub fn new(name: impl Into<String>, state: RevealState) -> Self {
        Self {
            name: name.into(),
            state,
            progress: None,
            value: None,
        }
    }

    pub fn progress(mut self, progress: Option<f32>) -> Self {
        self.progress = progress;
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Controllers of one section
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionReport {
    pub name: &'static str,
    pub controllers: Vec<ControllerReport>,
}

impl SectionReport {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            controllers: Vec::new(),
        }
    }

    pub fn controller(mut self, controller: ControllerReport) -> Self {
        self.controllers.push(controller);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ControllerReport> {
        self.controllers.iter().find(|c| c.name == name)
    }
}

/// Outcome of a headless run
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunReport {
    pub frames: usize,
    /// Simulated seconds
    pub elapsed: f32,
    pub viewport: [f32; 2],
    pub scroll_y: f32,
    pub document_height: f32,
    pub reduced_motion: bool,
    pub active_timelines: usize,
    pub sections: Vec<SectionReport>,
}

impl RunReport {
    pub fn section(&self, name: &str) -> Option<&SectionReport> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }
}

fn state_name(state: RevealState) -> &'static str {
    match state {
        RevealState::Idle => "idle",
        RevealState::Armed => "armed",
        RevealState::Playing => "playing",
        RevealState::Settled => "settled",
        RevealState::Bypassed => "bypassed",
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} frames ({:.2}s) at {}x{}, scroll {:.0}/{:.0}px{}",
            self.frames,
            self.elapsed,
            self.viewport[0],
            self.viewport[1],
            self.scroll_y,
            self.document_height,
            if self.reduced_motion { ", reduced motion" } else { "" }
        )?;
        writeln!(f, "active timelines: {}", self.active_timelines)?;

        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "[{}]", section.name)?;
            for c in &section.controllers {
                write!(f, "  {:<14} {:<9}", c.name, state_name(c.state))?;
                if let Some(progress) = c.progress {
                    write!(f, " {:>5.1}%", progress * 100.0)?;
                }
                if let Some(value) = &c.value {
                    write!(f, "  {value}")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunReport {
        RunReport {
            frames: 60,
            elapsed: 1.0,
            viewport: [1440.0, 900.0],
            scroll_y: 900.0,
            document_height: 7000.0,
            reduced_motion: false,
            active_timelines: 2,
            sections: vec![SectionReport::new("hero").controller(
                ControllerReport::new("mask-scrub", RevealState::Playing)
                    .progress(Some(0.5))
                    .value("mask 50%"),
            )],
        }
    }

    #[test]
    fn test_text_output() {
        let text = sample().to_string();
        assert!(text.starts_with("60 frames (1.00s) at 1440x900"));
        assert!(text.contains("[hero]"));
        assert!(text.contains("mask-scrub"));
        assert!(text.contains("playing"));
        assert!(text.contains(" 50.0%"));
    }

    #[test]
    fn test_json_output() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(json["active_timelines"], 2);
        let controller = &json["sections"][0]["controllers"][0];
        assert_eq!(controller["state"], "playing");
        assert_eq!(controller["value"], "mask 50%");
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let report = ControllerReport::new("heading", RevealState::Armed);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("progress").is_none());
        assert!(json.get("value").is_none());
    }
}
