//! Prompt assembly.
//!
//! Everything here is a pure function of the profile: the store hands in a
//! borrowed document and gets a string back.

use crate::classifier::NO_TOPIC;
use std::fmt::Write;
use stylecast_core::profile::StyleProfile;

const CLOSING_INSTRUCTION: &str = "Apply the frameworks where they fit, follow the response \
     pattern, and tie the answer back to the core principle.";

/// Append the cached primitive for `topic` to `base_prompt`.
///
/// Returns `base_prompt` unchanged when there is no topic, the topic is
/// `"none"`, or no primitive has been learned for it yet.
pub fn assemble(base_prompt: &str, topic: Option<&str>, profile: &StyleProfile) -> String {
    let Some(topic) = topic.filter(|t| *t != NO_TOPIC) else {
        return base_prompt.to_string();
    };
    let Some(primitive) = profile.primitive(topic) else {
        return base_prompt.to_string();
    };

    let mut prompt = String::from(base_prompt);
    let _ = write!(
        prompt,
        "\n\n## Topic: {topic}\nCore principle: {}",
        primitive.core_principle
    );
    if !primitive.key_frameworks.is_empty() {
        prompt.push_str("\nKey frameworks:");
        for framework in &primitive.key_frameworks {
            let _ = write!(prompt, "\n- {framework}");
        }
    }
    if !primitive.response_pattern.trim().is_empty() {
        let _ = write!(prompt, "\nResponse pattern: {}", primitive.response_pattern);
    }
    prompt.push_str("\n\n");
    prompt.push_str(CLOSING_INSTRUCTION);
    prompt
}

/// System instruction describing the writer's style.
pub fn style_instruction(profile: &StyleProfile) -> String {
    let mut out = String::from(
        "You write on behalf of the author described below. Match their style closely.",
    );

    let _ = write!(out, "\n\nTone: {}\nVoice: {}", profile.tone, profile.voice);

    list_section(&mut out, "Recurring themes", &profile.themes);
    list_section(&mut out, "Signature phrases (use sparingly)", &profile.phrases);

    if !profile.writing_patterns.is_empty() {
        out.push_str("\n\nWriting patterns:");
        // BTreeMap iterates in key order
        for (aspect, pattern) in &profile.writing_patterns {
            let _ = write!(out, "\n- {aspect}: {pattern}");
        }
    }

    list_section(&mut out, "Areas of expertise", &profile.expertise_areas);
    out
}

/// System instruction for style transfer.
pub fn rewrite_instruction(profile: &StyleProfile) -> String {
    let mut out = style_instruction(profile);
    out.push_str(
        "\n\nRewrite the text the user sends in this author's voice. Keep its meaning and \
         facts intact and reply with the rewritten text only.",
    );
    out
}

fn list_section(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = write!(out, "\n\n{title}:");
    for item in items {
        let _ = write!(out, "\n- {item}");
    }
}
