//! Keyword-scored topic classification.
//!
//! Each topic family has a keyword set and a weight. A family scores its
//! full weight once when any of its keywords occurs in the lower-cased
//! message (plain substring test). The highest score wins; on a tie the
//! family declared first wins.

use serde::Serialize;

/// Label used where no topic applies.
pub const NO_TOPIC: &str = "none";

/// A topic and the keywords that trigger it.
#[derive(Debug, Clone, Copy)]
pub struct TopicFamily {
    pub name: &'static str,
    pub weight: u32,
    pub keywords: &'static [&'static str],
}

/// Built-in topic families, in tie-break order.
pub const TOPIC_FAMILIES: &[TopicFamily] = &[
    TopicFamily {
        name: "strategy",
        weight: 3,
        keywords: &[
            "strategy",
            "strategic",
            "competitive",
            "advantage",
            "positioning",
            "differentiation",
        ],
    },
    TopicFamily {
        name: "marketing",
        weight: 3,
        keywords: &[
            "marketing",
            "advertising",
            "brand",
            "customer",
            "campaign",
            "engagement",
        ],
    },
    TopicFamily {
        name: "technology",
        weight: 2,
        keywords: &["technology", "tech", "digital", "ai", "automation", "innovation"],
    },
    TopicFamily {
        name: "leadership",
        weight: 2,
        keywords: &["leadership", "leader", "management", "team", "culture", "change"],
    },
    TopicFamily {
        name: "business",
        weight: 1,
        keywords: &["business", "company", "organization", "growth", "revenue", "profit"],
    },
    TopicFamily {
        name: "digital_transformation",
        weight: 2,
        keywords: &[
            "transformation",
            "digital transformation",
            "change management",
            "agile",
            "modernization",
        ],
    },
];

/// One family's score for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopicScore {
    pub topic: &'static str,
    pub score: u32,
}

/// Score every family, in declaration order.
pub fn scores(message: &str) -> Vec<TopicScore> {
    let lowered = message.to_lowercase();
    TOPIC_FAMILIES
        .iter()
        .map(|family| TopicScore {
            topic: family.name,
            score: if family.keywords.iter().any(|k| lowered.contains(k)) {
                family.weight
            } else {
                0
            },
        })
        .collect()
}

/// The best-scoring topic, or `None` when nothing matched.
pub fn classify(message: &str) -> Option<&'static str> {
    let mut best: Option<TopicScore> = None;
    for candidate in scores(message) {
        if candidate.score == 0 {
            continue;
        }
        if best.is_none_or(|b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    best.map(|b| b.topic)
}

/// `classify` as a label, `"none"` when nothing matched.
pub fn classify_label(message: &str) -> &'static str {
    classify(message).unwrap_or(NO_TOPIC)
}

/// Whether `name` is one of the built-in topics.
pub fn is_known_topic(name: &str) -> bool {
    TOPIC_FAMILIES.iter().any(|f| f.name == name)
}
