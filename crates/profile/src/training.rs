//! Training input at the core boundary, plus the adapter for legacy text
//! that carries its weight and edition as inline marker lines.

use chrono::Utc;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use stylecast_core::error::ProfileError;
use stylecast_core::profile::TrainingRecord;
use tracing::warn;

/// Weight applied when none is given or the given one is unusable.
pub const DEFAULT_WEIGHT: f64 = 1.0;

// `weight: 0.7` or `[weight=0.7]` on a line of its own, LF or CRLF
static WEIGHT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?imR)^[ \t]*\[?[ \t]*weight[ \t]*[:=][ \t]*([^\]\r\n]*?)[ \t]*\]?[ \t]*$")
        .expect("weight marker pattern is valid")
});

static EDITION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?imR)^[ \t]*\[?[ \t]*edition[ \t]*[:=][ \t]*([^\]\r\n]*?)[ \t]*\]?[ \t]*$")
        .expect("edition marker pattern is valid")
});

/// One piece of training content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingInput {
    pub content: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
}

impl TrainingInput {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            weight: None,
            edition: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        self.edition = Some(edition.into());
        self
    }

    /// Read weight and edition from marker lines inside `content`, then strip
    /// the markers. Unusable weights fall back to [`DEFAULT_WEIGHT`].
    pub fn from_legacy(content: &str, source: impl Into<String>) -> Self {
        let weight = WEIGHT_MARKER
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .and_then(|raw| match parse_weight(raw) {
                Some(w) => Some(w),
                None => {
                    warn!(raw = %raw, "Ignoring malformed weight marker");
                    None
                }
            });

        let edition = EDITION_MARKER
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|e| !e.is_empty());

        let cleaned = WEIGHT_MARKER.replace_all(content, "");
        let cleaned = EDITION_MARKER.replace_all(&cleaned, "");

        Self {
            content: cleaned.trim().to_string(),
            source: source.into(),
            weight,
            edition,
        }
    }

    /// The weight to apply: the given one if usable, else the default.
    pub fn effective_weight(&self) -> f64 {
        match self.weight {
            Some(w) if valid_weight(w) => w,
            Some(w) => {
                warn!(weight = w, "Weight outside [0, 1]; using default");
                DEFAULT_WEIGHT
            }
            None => DEFAULT_WEIGHT,
        }
    }

    /// Reject content that is empty once markers are gone.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.content.trim().is_empty() {
            return Err(ProfileError::InvalidInput(
                "training content is empty".into(),
            ));
        }
        Ok(())
    }

    /// The record written to the training corpus.
    pub fn to_record(&self) -> TrainingRecord {
        TrainingRecord {
            content: self.content.clone(),
            source: self.source.clone(),
            weight: self.effective_weight(),
            edition: self.edition.clone(),
            timestamp: Utc::now(),
        }
    }
}

fn valid_weight(w: f64) -> bool {
    w.is_finite() && (0.0..=1.0).contains(&w)
}

fn parse_weight(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|w| valid_weight(*w))
}
