//! Easing functions for animations

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Platform "default" timing curve
    pub const SYSTEM_DEFAULT: Easing = Easing::CubicBezier(0.25, 0.1, 0.25, 1.0);
    /// Platform "easeIn" timing curve
    pub const SYSTEM_EASE_IN: Easing = Easing::CubicBezier(0.42, 0.0, 1.0, 1.0);
    /// Platform "easeOut" timing curve
    pub const SYSTEM_EASE_OUT: Easing = Easing::CubicBezier(0.0, 0.0, 0.58, 1.0);
    /// Platform "easeInEaseOut" timing curve
    pub const SYSTEM_EASE_IN_EASE_OUT: Easing = Easing::CubicBezier(0.42, 0.0, 0.58, 1.0);

    /// Resolve a media timing function name (`linear`, `easeIn`, `easeOut`,
    /// `easeInEaseOut`, `default`) to its curve.
    ///
    /// Snake-case spellings (`ease_in`, `ease_in_ease_out`) are accepted too.
    pub fn from_name(name: &str) -> Result<Easing> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "linear" => Ok(Easing::Linear),
            "easein" => Ok(Easing::SYSTEM_EASE_IN),
            "easeout" => Ok(Easing::SYSTEM_EASE_OUT),
            "easeineaseout" | "easeinout" => Ok(Easing::SYSTEM_EASE_IN_EASE_OUT),
            "default" => Ok(Easing::SYSTEM_DEFAULT),
            _ => Err(AnimationError::UnknownTimingFunction(name.to_string())),
        }
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
        }
    }
}

/// Cubic bezier easing calculation (matches CSS / media timing function curves).
///
/// Newton-Raphson with a bisection fallback, computed in f64.
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

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³, Horner form
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
        for easing in [
            Easing::Linear,
            Easing::EaseOut,
            Easing::EaseInOutQuad,
            Easing::SYSTEM_DEFAULT,
            Easing::SYSTEM_EASE_IN_EASE_OUT,
        ] {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_from_name_accepts_media_timing_names() {
        assert_eq!(Easing::from_name("linear").unwrap(), Easing::Linear);
        assert_eq!(Easing::from_name("easeIn").unwrap(), Easing::SYSTEM_EASE_IN);
        assert_eq!(Easing::from_name("ease_out").unwrap(), Easing::SYSTEM_EASE_OUT);
        assert_eq!(
            Easing::from_name("easeInEaseOut").unwrap(),
            Easing::SYSTEM_EASE_IN_EASE_OUT
        );
        assert!(matches!(
            Easing::from_name("bouncy"),
            Err(AnimationError::UnknownTimingFunction(_))
        ));
    }

    #[test]
    fn test_bezier_is_monotonic_for_system_curves() {
        let mut last = 0.0;
        for i in 1..=100 {
            let v = Easing::SYSTEM_EASE_IN_EASE_OUT.apply(i as f32 / 100.0);
            assert!(v >= last - 1e-5);
            last = v;
        }
    }

    #[test]
    fn test_ease_out_leads_linear() {
        assert!(Easing::SYSTEM_EASE_OUT.apply(0.3) > 0.3);
        assert!(Easing::SYSTEM_EASE_IN.apply(0.3) < 0.3);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Easing::EaseInOutQuad).unwrap();
        assert_eq!(json, "\"ease_in_out_quad\"");
        let parsed: Easing = serde_json::from_str("{\"cubic_bezier\":[0.0,0.0,0.58,1.0]}").unwrap();
        assert_eq!(parsed, Easing::SYSTEM_EASE_OUT);
    }
}
