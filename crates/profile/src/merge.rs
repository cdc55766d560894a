//! Weighted merge of list-valued profile attributes.
//!
//! Each training call brings newly observed themes, phrases and expertise
//! areas together with an influence weight. An incoming item that matches a
//! stored item replaces it only when the weight is above the replace
//! threshold; unmatched items are appended. Lists are capped, and on overflow
//! the oldest entries are dropped so the newest are always kept.
//!
//! Matching is a named policy behind [`MatchPolicy`] so a stricter matcher
//! can be swapped in without touching the merge itself.

use std::collections::BTreeMap;

/// Maximum length of a merged list.
pub const DEFAULT_CAPACITY: usize = 20;

/// Weights strictly above this overwrite matching entries.
pub const DEFAULT_REPLACE_THRESHOLD: f64 = 0.8;

/// Decides whether an incoming item refers to an existing one.
pub trait MatchPolicy: Send + Sync {
    fn matches(&self, existing: &str, incoming: &str) -> bool;
}

/// Case-insensitive containment in either direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveSubstring;

impl MatchPolicy for CaseInsensitiveSubstring {
    fn matches(&self, existing: &str, incoming: &str) -> bool {
        let existing = existing.to_lowercase();
        let incoming = incoming.to_lowercase();
        existing.contains(&incoming) || incoming.contains(&existing)
    }
}

/// Capacity and threshold for a merge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeRules {
    pub capacity: usize,
    pub replace_threshold: f64,
}

impl Default for MergeRules {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            replace_threshold: DEFAULT_REPLACE_THRESHOLD,
        }
    }
}

impl MergeRules {
    pub fn replaces(&self, weight: f64) -> bool {
        weight > self.replace_threshold
    }
}

/// Merge with the default policy and rules.
pub fn merge(existing: &[String], incoming: &[String], weight: f64) -> Vec<String> {
    merge_with(
        existing,
        incoming,
        weight,
        &CaseInsensitiveSubstring,
        &MergeRules::default(),
    )
}

/// Merge `incoming` into `existing`.
///
/// Only the entries that were in `existing` are match candidates; the first
/// match in stored order wins. Blank incoming items are ignored.
pub fn merge_with<P: MatchPolicy + ?Sized>(
    existing: &[String],
    incoming: &[String],
    weight: f64,
    policy: &P,
    rules: &MergeRules,
) -> Vec<String> {
    let incoming: Vec<&String> = incoming.iter().filter(|i| !i.trim().is_empty()).collect();

    if incoming.is_empty() {
        return existing.to_vec();
    }

    if existing.is_empty() {
        let mut merged: Vec<String> = incoming.into_iter().cloned().collect();
        keep_newest(&mut merged, rules.capacity);
        return merged;
    }

    let stored = existing.len();
    let mut merged = existing.to_vec();

    for item in incoming {
        match merged[..stored]
            .iter()
            .position(|e| policy.matches(e, item))
        {
            Some(i) if rules.replaces(weight) => merged[i] = item.clone(),
            Some(_) => {}
            None => merged.push(item.clone()),
        }
    }

    keep_newest(&mut merged, rules.capacity);
    merged
}

/// Drop entries from the front until at most `capacity` remain.
fn keep_newest(items: &mut Vec<String>, capacity: usize) {
    if items.len() > capacity {
        let excess = items.len() - capacity;
        items.drain(..excess);
    }
}

/// Merge writing-pattern descriptors keyed by aspect (sentence, paragraph...).
///
/// Keys compare case-insensitively. New aspects are inserted; a known aspect
/// takes the incoming descriptor only above the replace threshold.
pub fn merge_patterns(
    existing: &BTreeMap<String, String>,
    incoming: &BTreeMap<String, String>,
    weight: f64,
    rules: &MergeRules,
) -> BTreeMap<String, String> {
    let mut merged = existing.clone();
    for (key, value) in incoming {
        if key.trim().is_empty() || value.trim().is_empty() {
            continue;
        }
        let known = merged
            .keys()
            .find(|k| k.eq_ignore_ascii_case(key))
            .cloned();
        match known {
            Some(k) if rules.replaces(weight) => {
                merged.insert(k, value.clone());
            }
            Some(_) => {}
            None => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}
