//! Weighted prompt composition.
//!
//! An explicit weight is the final weight of a fragment: `((cat:1.25), dog)`
//! means `cat` at 1.25, so nesting is never used to scale weights. The
//! composer multiplies each fragment weight by one overall multiplier and
//! writes the result once.

use crate::text::normalize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A text segment paired with its emphasis weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedFragment {
    pub text: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl WeightedFragment {
    pub fn new(text: impl Into<String>, weight: f64) -> Self {
        Self {
            text: text.into(),
            weight,
        }
    }
}

/// Error returned when a `text:weight` argument cannot be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid weight '{weight}' in fragment '{fragment}'")]
pub struct FragmentParseError {
    pub fragment: String,
    pub weight: String,
}

impl FromStr for WeightedFragment {
    type Err = FragmentParseError;

    /// Parses `text:weight`, splitting on the last colon. Text without a
    /// colon gets weight 1.0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            Some((text, weight)) => {
                let parsed = weight.trim().parse::<f64>().map_err(|_| FragmentParseError {
                    fragment: s.to_string(),
                    weight: weight.to_string(),
                })?;
                Ok(Self::new(text, parsed))
            }
            None => Ok(Self::new(s, 1.0)),
        }
    }
}

impl fmt::Display for WeightedFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&normalize(&self.text), self.weight))
    }
}

fn render(text: &str, weight: f64) -> String {
    // Exact comparison: 0.9999999 is still annotated.
    if weight == 1.0 {
        text.to_string()
    } else {
        format!("({text}:{weight:.3})")
    }
}

/// Compose weighted fragments into one prompt string.
///
/// Fragments whose normalized text is empty or whose own weight is exactly
/// zero are dropped. The rest are scaled by `overall_weight`, annotated unless
/// the result is exactly 1.0, and joined with `", "` in input order.
pub fn compose(fragments: &[WeightedFragment], overall_weight: f64) -> String {
    fragments
        .iter()
        .filter_map(|fragment| {
            let text = normalize(&fragment.text);
            if text.is_empty() || fragment.weight == 0.0 {
                return None;
            }
            Some(render(&text, fragment.weight * overall_weight))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
