//! Style profile domain types.
//!
//! The `StyleProfile` is the single persisted document that accumulates what
//! has been learned about a writer: tone, recurring themes, signature phrases,
//! writing patterns, expertise areas and per-topic primitives. The JSON keys
//! are camelCase and are the on-disk format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A cached per-topic bundle injected into prompts for that topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Primitive {
    /// The one idea every answer on this topic should return to
    pub core_principle: String,

    /// Frameworks the writer reaches for, in order of first appearance
    #[serde(default)]
    pub key_frameworks: Vec<String>,

    /// How answers on this topic are usually structured
    #[serde(default)]
    pub response_pattern: String,
}

/// The accumulated style profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleProfile {
    /// Free-text tone description. Only changed by direct edits.
    #[serde(default)]
    pub tone: String,

    /// Free-text voice description. Only changed by direct edits.
    #[serde(default)]
    pub voice: String,

    #[serde(default)]
    pub themes: Vec<String>,

    #[serde(default)]
    pub phrases: Vec<String>,

    /// Sentence / paragraph / conclusion style descriptors
    #[serde(default)]
    pub writing_patterns: BTreeMap<String, String>,

    #[serde(default)]
    pub expertise_areas: Vec<String>,

    /// Topic name → primitive. Topics never observed are absent.
    #[serde(default)]
    pub primitives: BTreeMap<String, Primitive>,

    /// Number of accepted training calls
    #[serde(default)]
    pub training_count: u64,

    /// Running mean of every weight ever applied
    #[serde(default)]
    pub average_weight: f64,

    pub last_updated: DateTime<Utc>,
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self {
            tone: "professional, insightful".into(),
            voice: "first person, conversational".into(),
            themes: Vec::new(),
            phrases: Vec::new(),
            writing_patterns: BTreeMap::new(),
            expertise_areas: Vec::new(),
            primitives: BTreeMap::new(),
            training_count: 0,
            average_weight: 0.0,
            last_updated: Utc::now(),
        }
    }
}

impl StyleProfile {
    /// Stamp the document as modified now.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    /// Count one accepted training call with the given weight and fold the
    /// weight into the running mean.
    pub fn record_weight(&mut self, weight: f64) {
        self.training_count += 1;
        let n = self.training_count as f64;
        self.average_weight = (self.average_weight * (n - 1.0) + weight) / n;
        self.touch();
    }

    /// Look up the primitive cached for a topic.
    pub fn primitive(&self, topic: &str) -> Option<&Primitive> {
        self.primitives.get(topic)
    }
}

/// One training call, as written to the training corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    /// Content with inline markers removed
    pub content: String,

    /// Where the content came from (file name, URL, label)
    pub source: String,

    /// Influence weight in [0, 1]
    pub weight: f64,

    /// Edition / issue label when one was given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,

    pub timestamp: DateTime<Utc>,
}
