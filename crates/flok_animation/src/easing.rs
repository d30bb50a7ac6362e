//! Easing functions for animations
//!
//! Curves can be named the way motion designers write them (`power2.out`,
//! `power3.inOut`, `none`) or with CSS keywords (`ease-out`,
//! `cubic-bezier(0.2, 0, 0, 1)`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an easing identifier cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EasingError {
    #[error("unknown easing curve: {0}")]
    Unknown(String),

    #[error("malformed cubic-bezier: {0}")]
    MalformedBezier(String),
}

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => ease_in_out(t, 3),
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => ease_in_out(t, 2),
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => ease_in_out(t, 3),
            Easing::EaseInQuart => t.powi(4),
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => ease_in_out(t, 4),
            Easing::EaseInQuint => t.powi(5),
            Easing::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            Easing::EaseInOutQuint => ease_in_out(t, 5),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
        }
    }

    /// Canonical identifier, parseable by `from_str`
    pub fn name(&self) -> String {
        match self {
            Easing::Linear => "none".into(),
            Easing::EaseIn => "ease-in".into(),
            Easing::EaseOut => "ease-out".into(),
            Easing::EaseInOut => "ease-in-out".into(),
            Easing::EaseInQuad => "power1.in".into(),
            Easing::EaseOutQuad => "power1.out".into(),
            Easing::EaseInOutQuad => "power1.inOut".into(),
            Easing::EaseInCubic => "power2.in".into(),
            Easing::EaseOutCubic => "power2.out".into(),
            Easing::EaseInOutCubic => "power2.inOut".into(),
            Easing::EaseInQuart => "power3.in".into(),
            Easing::EaseOutQuart => "power3.out".into(),
            Easing::EaseInOutQuart => "power3.inOut".into(),
            Easing::EaseInQuint => "power4.in".into(),
            Easing::EaseOutQuint => "power4.out".into(),
            Easing::EaseInOutQuint => "power4.inOut".into(),
            Easing::CubicBezier(a, b, c, d) => format!("cubic-bezier({a}, {b}, {c}, {d})"),
        }
    }
}

fn ease_in_out(t: f32, power: i32) -> f32 {
    if t < 0.5 {
        2f32.powi(power - 1) * t.powi(power)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(power) / 2.0
    }
}

impl FromStr for Easing {
    type Err = EasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();

        if let Some(args) = name
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let values: Vec<f32> = args
                .split(',')
                .map(|v| v.trim().parse::<f32>())
                .collect::<Result<_, _>>()
                .map_err(|_| EasingError::MalformedBezier(name.to_string()))?;
            return match values.as_slice() {
                [x1, y1, x2, y2] => Ok(Easing::CubicBezier(*x1, *y1, *x2, *y2)),
                _ => Err(EasingError::MalformedBezier(name.to_string())),
            };
        }

        // A bare power name defaults to its `.out` variant
        let (family, variant) = name.split_once('.').unwrap_or((name, "out"));

        let easing = match (family, variant) {
            ("none" | "linear", _) => Easing::Linear,
            ("ease-in", _) => Easing::EaseIn,
            ("ease-out", _) => Easing::EaseOut,
            ("ease-in-out" | "ease", _) => Easing::EaseInOut,
            ("power1", "in") => Easing::EaseInQuad,
            ("power1", "out") => Easing::EaseOutQuad,
            ("power1", "inOut") => Easing::EaseInOutQuad,
            ("power2", "in") => Easing::EaseInCubic,
            ("power2", "out") => Easing::EaseOutCubic,
            ("power2", "inOut") => Easing::EaseInOutCubic,
            ("power3", "in") => Easing::EaseInQuart,
            ("power3", "out") => Easing::EaseOutQuart,
            ("power3", "inOut") => Easing::EaseInOutQuart,
            ("power4", "in") => Easing::EaseInQuint,
            ("power4", "out") => Easing::EaseOutQuint,
            ("power4", "inOut") => Easing::EaseInOutQuint,
            _ => return Err(EasingError::Unknown(name.to_string())),
        };
        Ok(easing)
    }
}

impl TryFrom<String> for Easing {
    type Error = EasingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.name()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Cubic bezier easing calculation (matches CSS / browser implementations).
///
/// Uses Newton-Raphson with binary-search fallback for robustness.
/// Computes in f64 internally to avoid f32 precision jitter.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x = t as f64;
    let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);

    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        let curves = [
            Easing::Linear,
            Easing::EaseOutCubic,
            Easing::EaseInOutCubic,
            Easing::EaseOutQuart,
            Easing::EaseInOutQuint,
            Easing::CubicBezier(0.2, 0.0, 0.0, 1.0),
        ];
        for curve in curves {
            assert_eq!(curve.apply(0.0), 0.0, "{curve}");
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-6, "{curve}");
        }
    }

    #[test]
    fn test_decelerating_curve_leads_linear() {
        let ease = Easing::EaseOutQuart;
        for i in 1..10 {
            let t = i as f32 / 10.0;
            assert!(ease.apply(t) > t);
        }
    }

    #[test]
    fn test_parse_power_names() {
        assert_eq!("power2.out".parse::<Easing>(), Ok(Easing::EaseOutCubic));
        assert_eq!("power3.out".parse::<Easing>(), Ok(Easing::EaseOutQuart));
        assert_eq!("power2.inOut".parse::<Easing>(), Ok(Easing::EaseInOutCubic));
        assert_eq!("power1".parse::<Easing>(), Ok(Easing::EaseOutQuad));
        assert_eq!("none".parse::<Easing>(), Ok(Easing::Linear));
        assert_eq!(
            "cubic-bezier(0.4, 0, 0.2, 1)".parse::<Easing>(),
            Ok(Easing::CubicBezier(0.4, 0.0, 0.2, 1.0))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("bounce.out".parse::<Easing>(), Err(EasingError::Unknown(_))));
        assert!(matches!(
            "cubic-bezier(0.4, 0)".parse::<Easing>(),
            Err(EasingError::MalformedBezier(_))
        ));
    }

    #[test]
    fn test_name_round_trips() {
        for curve in [Easing::Linear, Easing::EaseInOutCubic, Easing::EaseOutQuart] {
            assert_eq!(curve.name().parse::<Easing>(), Ok(curve));
        }
    }
}
