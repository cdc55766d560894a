//! Observed style attributes and how they fold into the profile.
//!
//! The remote model is asked to describe a piece of writing as JSON; the
//! answer is parsed into a [`StyleObservation`] and applied to the profile
//! through the weighted merge.

use crate::classifier;
use crate::merge::{self, CaseInsensitiveSubstring, MergeRules};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stylecast_core::error::ProviderError;
use stylecast_core::profile::{Primitive, StyleProfile};
use tracing::debug;

/// What one piece of training content revealed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleObservation {
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub phrases: Vec<String>,
    #[serde(default)]
    pub expertise_areas: Vec<String>,
    #[serde(default)]
    pub writing_patterns: BTreeMap<String, String>,
    #[serde(default)]
    pub primitives: BTreeMap<String, ObservedPrimitive>,
}

/// A primitive as the model reports it (snake_case keys).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservedPrimitive {
    #[serde(default)]
    pub core_principle: String,
    #[serde(default)]
    pub key_frameworks: Vec<String>,
    #[serde(default)]
    pub response_pattern: String,
}

/// System instruction for the analysis call.
pub fn analysis_instruction() -> String {
    let topics: Vec<&str> = classifier::TOPIC_FAMILIES.iter().map(|f| f.name).collect();
    format!(
        "You analyse writing style. Read the text the user sends and reply with a single JSON \
         object and nothing else, using exactly these keys:\n\
         {{\"themes\": [string], \"phrases\": [string], \"expertise_areas\": [string], \
         \"writing_patterns\": {{\"sentence\": string, \"paragraph\": string, \"conclusion\": string}}, \
         \"primitives\": {{<topic>: {{\"core_principle\": string, \"key_frameworks\": [string], \
         \"response_pattern\": string}}}}}}\n\
         themes: recurring subjects. phrases: distinctive expressions quoted verbatim. \
         expertise_areas: fields the author writes about with authority. \
         primitives: only for topics the text actually covers, chosen from: {}. \
         Use empty lists or objects when nothing applies.",
        topics.join(", ")
    )
}

/// Parse the model's answer into an observation.
///
/// Accepts bare JSON, JSON inside a Markdown fence, or JSON surrounded by
/// prose; the first balanced object is used. Primitives for unknown topics
/// and primitives without a core principle are dropped.
pub fn parse_observation(text: &str) -> Result<StyleObservation, ProviderError> {
    let json = first_json_object(text).ok_or_else(|| {
        ProviderError::MalformedResponse("analysis contained no JSON object".into())
    })?;

    let mut observation: StyleObservation = serde_json::from_str(json)
        .map_err(|e| ProviderError::MalformedResponse(format!("analysis JSON: {e}")))?;

    observation.primitives.retain(|topic, primitive| {
        let keep = classifier::is_known_topic(topic) && !primitive.core_principle.trim().is_empty();
        if !keep {
            debug!(topic = %topic, "Dropping primitive for unknown topic or empty principle");
        }
        keep
    });

    Ok(observation)
}

/// Slice out the first balanced `{...}`, ignoring braces inside strings.
fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Fold an observation into the profile and count the training call.
pub fn apply(
    profile: &mut StyleProfile,
    observation: &StyleObservation,
    weight: f64,
    rules: &MergeRules,
) {
    let policy = CaseInsensitiveSubstring;

    profile.themes = merge::merge_with(&profile.themes, &observation.themes, weight, &policy, rules);
    profile.phrases =
        merge::merge_with(&profile.phrases, &observation.phrases, weight, &policy, rules);
    profile.expertise_areas = merge::merge_with(
        &profile.expertise_areas,
        &observation.expertise_areas,
        weight,
        &policy,
        rules,
    );
    profile.writing_patterns = merge::merge_patterns(
        &profile.writing_patterns,
        &observation.writing_patterns,
        weight,
        rules,
    );

    for (topic, observed) in &observation.primitives {
        match profile.primitives.get_mut(topic) {
            None => {
                profile.primitives.insert(
                    topic.clone(),
                    Primitive {
                        core_principle: observed.core_principle.clone(),
                        key_frameworks: merge::merge_with(
                            &[],
                            &observed.key_frameworks,
                            weight,
                            &policy,
                            rules,
                        ),
                        response_pattern: observed.response_pattern.clone(),
                    },
                );
            }
            Some(stored) => {
                stored.key_frameworks = merge::merge_with(
                    &stored.key_frameworks,
                    &observed.key_frameworks,
                    weight,
                    &policy,
                    rules,
                );
                if rules.replaces(weight) {
                    stored.core_principle = observed.core_principle.clone();
                    if !observed.response_pattern.trim().is_empty() {
                        stored.response_pattern = observed.response_pattern.clone();
                    }
                }
            }
        }
    }

    profile.record_weight(weight);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed(core: &str, frameworks: &[&str]) -> ObservedPrimitive {
        ObservedPrimitive {
            core_principle: core.into(),
            key_frameworks: frameworks.iter().map(|s| s.to_string()).collect(),
            response_pattern: "Hook, insight, takeaway".into(),
        }
    }

    #[test]
    fn parses_bare_json() {
        let obs = parse_observation(r#"{"themes":["pricing"],"phrases":["Here's the thing"]}"#)
            .unwrap();
        assert_eq!(obs.themes, vec!["pricing"]);
        assert_eq!(obs.phrases, vec!["Here's the thing"]);
        assert!(obs.writing_patterns.is_empty());
    }

    #[test]
    fn parses_fenced_json_with_prose() {
        let text = "Sure! Here is the analysis:\n```json\n{\"themes\": [\"brand {voice}\"], \
                    \"expertise_areas\": [\"B2B SaaS\"]}\n```\nHope this helps.";
        let obs = parse_observation(text).unwrap();
        assert_eq!(obs.themes, vec!["brand {voice}"]);
        assert_eq!(obs.expertise_areas, vec!["B2B SaaS"]);
    }

    #[test]
    fn no_json_is_malformed() {
        let err = parse_observation("I could not analyse that.").unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn broken_json_is_malformed() {
        let err = parse_observation(r#"{"themes": "not a list"}"#).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn unknown_topic_primitives_dropped() {
        let text = r#"{"primitives": {
            "marketing": {"core_principle": "Earn attention", "key_frameworks": ["AIDA"]},
            "cooking": {"core_principle": "Salt early"},
            "strategy": {"core_principle": "  "}
        }}"#;
        let obs = parse_observation(text).unwrap();
        assert_eq!(obs.primitives.len(), 1);
        assert!(obs.primitives.contains_key("marketing"));
    }

    #[test]
    fn apply_merges_lists_and_counts() {
        let mut profile = StyleProfile::default();
        let obs = StyleObservation {
            themes: vec!["Pricing".into()],
            phrases: vec!["Here's the thing".into()],
            expertise_areas: vec!["SaaS".into()],
            ..Default::default()
        };
        apply(&mut profile, &obs, 0.6, &MergeRules::default());
        assert_eq!(profile.themes, vec!["Pricing"]);
        assert_eq!(profile.phrases, vec!["Here's the thing"]);
        assert_eq!(profile.training_count, 1);
        assert!((profile.average_weight - 0.6).abs() < 1e-12);
    }

    #[test]
    fn tone_and_voice_untouched() {
        let mut profile = StyleProfile {
            tone: "wry".into(),
            voice: "second person".into(),
            ..Default::default()
        };
        let obs = StyleObservation {
            themes: vec!["tone".into(), "voice".into()],
            ..Default::default()
        };
        apply(&mut profile, &obs, 1.0, &MergeRules::default());
        assert_eq!(profile.tone, "wry");
        assert_eq!(profile.voice, "second person");
    }

    #[test]
    fn primitive_inserted_then_guarded_by_weight() {
        let rules = MergeRules::default();
        let mut profile = StyleProfile::default();

        let mut first = StyleObservation::default();
        first
            .primitives
            .insert("marketing".into(), observed("Earn attention", &["AIDA"]));
        apply(&mut profile, &first, 0.4, &rules);
        assert_eq!(profile.primitives["marketing"].core_principle, "Earn attention");

        let mut second = StyleObservation::default();
        second
            .primitives
            .insert("marketing".into(), observed("Rent attention", &["Jobs to be done"]));
        apply(&mut profile, &second, 0.5, &rules);
        let stored = &profile.primitives["marketing"];
        assert_eq!(stored.core_principle, "Earn attention");
        assert_eq!(stored.key_frameworks, vec!["AIDA", "Jobs to be done"]);

        apply(&mut profile, &second, 0.9, &rules);
        assert_eq!(profile.primitives["marketing"].core_principle, "Rent attention");
        assert_eq!(profile.training_count, 3);
    }

    #[test]
    fn empty_observation_only_counts() {
        let mut profile = StyleProfile::default();
        apply(&mut profile, &StyleObservation::default(), 1.0, &MergeRules::default());
        assert_eq!(profile.training_count, 1);
        assert!(profile.themes.is_empty());
    }

    #[test]
    fn instruction_lists_topics() {
        let text = analysis_instruction();
        assert!(text.contains("digital_transformation"));
        assert!(text.contains("expertise_areas"));
    }
}
