//! Human-readable body descriptions for the selection panel.

use crate::core::catalog::{BodyInfo, BodyKind};

/// Light years per astronomical unit.
pub const AU_TO_LY: f64 = 0.000015813;

/// Earth's distance from the sun in AU; other distances are measured against it.
pub const EARTH_AU: f64 = 1.0;

/// Panel text when nothing is hovered or locked.
pub const DEFAULT_PROMPT: &str = "Hover over a planet or the Sun!";

/// Significant figures in light-year readouts.
const LY_DIGITS: usize = 5;

/// Multi-line description of a body.
pub fn describe(info: &BodyInfo) -> String {
    let mut lines = vec![format!("Selected: {}", info.name)];
    match info.kind {
        BodyKind::Star => {
            if let Some(text) = &info.info {
                lines.push(format!("Location: {text}"));
            }
        }
        BodyKind::Moon => {
            let parent = info.parent.as_deref().unwrap_or("Earth");
            lines.push(format!("Orbiting: {parent}"));
            lines.extend(info.info.clone());
            lines.push("Distance from Earth: 0.0... Light Years".to_string());
        }
        BodyKind::Planet => {
            if let Some(au) = info.distance_au {
                lines.push(format!(
                    "Dist. from Sun: {au} AU / {} LY",
                    to_precision(au * AU_TO_LY, LY_DIGITS)
                ));
                lines.push(format!(
                    "Dist. from Earth: {} LY (approx)",
                    to_precision((au - EARTH_AU).abs() * AU_TO_LY, LY_DIGITS)
                ));
            }
        }
        BodyKind::Asteroid => {}
    }
    lines.join("\n")
}

/// Format with `precision` significant digits, switching to exponent form
/// for very small or very large magnitudes (`1.2346e-7`, `1.2e+21`).
pub fn to_precision(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return if precision == 1 {
            "0".to_string()
        } else {
            format!("0.{}", "0".repeat(precision - 1))
        };
    }

    // `{:.Ne}` rounds to N+1 significant digits: "-6.1671e-6".
    let sci = format!("{:.*e}", precision - 1, value.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    let sign = if value < 0.0 { "-" } else { "" };

    if exp < -6 || exp >= precision as i32 {
        let (head, tail) = digits.split_at(1);
        let dot = if tail.is_empty() { "" } else { "." };
        let exp_sign = if exp < 0 { "-" } else { "+" };
        return format!("{sign}{head}{dot}{tail}e{exp_sign}{}", exp.abs());
    }

    if exp >= 0 {
        let split = exp as usize + 1;
        let (int, frac) = digits.split_at(split.min(digits.len()));
        if frac.is_empty() {
            format!("{sign}{int}")
        } else {
            format!("{sign}{int}.{frac}")
        }
    } else {
        let zeros = "0".repeat((-exp - 1) as usize);
        format!("{sign}0.{zeros}{digits}")
    }
}
