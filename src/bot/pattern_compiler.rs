// src/bot/pattern_compiler.rs - Word-to-pattern compilation and the combined matcher cache

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, error};
use regex::{Regex, RegexBuilder};

use crate::bot::scope::ApplicableRules;
use crate::bot::substitution::{substitution_map, NOISE};
use crate::types::{StrictnessLevel, ValidationError};

/// Upper bound on the compiled size of one combined matcher. Acts as the
/// documented complexity limit for a guild's active rule set: a combination
/// that exceeds it fails compilation and surfaces as a broken filter.
pub const MATCHER_SIZE_LIMIT: usize = 2 * (1 << 20);

/// Expand one banned word into a tolerant pattern fragment. Each character
/// becomes its level-specific alternation (or the escaped literal when the
/// table has no entry), wrapped non-capturing so neighbouring fragments
/// cannot cross-match, and followed by exactly one noise separator -
/// including after the last character. Character order is preserved.
///
/// Callers must reject empty words; an empty fragment must never enter the
/// combined alternation.
pub fn word_fragment(word: &str, level: StrictnessLevel) -> String {
    let map = substitution_map(level);
    let mut fragment = String::new();
    for ch in word.chars() {
        match map.get(&ch) {
            Some(alternatives) => {
                fragment.push_str("(?:");
                fragment.push_str(alternatives);
                fragment.push(')');
            }
            None => fragment.push_str(&regex::escape(&ch.to_string())),
        }
        fragment.push_str(NOISE);
    }
    fragment
}

fn builder(pattern: &str) -> RegexBuilder {
    let mut builder = RegexBuilder::new(pattern);
    builder
        .case_insensitive(true)
        .size_limit(MATCHER_SIZE_LIMIT);
    builder
}

/// Standalone validation of a custom pattern at insertion time, with the
/// same builder settings the combined compile uses. A pattern rejected here
/// is never stored.
pub fn validate_custom_pattern(pattern: &str) -> Result<(), ValidationError> {
    builder(pattern)
        .build()
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidPattern(e.to_string()))
}

/// One compiled matcher for a (guild, channel) rule set.
#[derive(Debug)]
pub enum CombinedMatcher {
    /// All applicable fragments joined into a single alternation.
    Compiled(Regex),
    /// No applicable rules: nothing to filter, not a fault.
    Empty,
    /// The combination failed to build (malformed custom pattern that only
    /// breaks in combination, or the size limit was exceeded).
    Invalid(String),
}

/// Join every applicable rule into one case-insensitive, Unicode-aware
/// matcher. Word rules go through `word_fragment`; custom patterns are used
/// verbatim. Every fragment is wrapped non-capturing before alternation.
///
/// The command layer rejects empty words and patterns, but a hand-edited
/// settings file can still carry one. An empty fragment wrapped as `(?:)`
/// matches every message, so it is treated as a broken rule set here rather
/// than silently blocking all text.
pub fn compile_combined(rules: &ApplicableRules<'_>) -> CombinedMatcher {
    let mut fragments = Vec::with_capacity(rules.words.len() + rules.patterns.len());
    for rule in &rules.words {
        if rule.word.is_empty() {
            error!("Empty banned word in rule set, refusing to compile");
            return CombinedMatcher::Invalid("empty banned word".to_string());
        }
        fragments.push(format!("(?:{})", word_fragment(&rule.word, rule.level)));
    }
    for rule in &rules.patterns {
        if rule.pattern.is_empty() {
            error!("Empty custom pattern in rule set, refusing to compile");
            return CombinedMatcher::Invalid("empty custom pattern".to_string());
        }
        fragments.push(format!("(?:{})", rule.pattern));
    }
    if fragments.is_empty() {
        return CombinedMatcher::Empty;
    }
    match builder(&fragments.join("|")).build() {
        Ok(regex) => CombinedMatcher::Compiled(regex),
        Err(e) => {
            error!("Combined matcher failed to build: {e}");
            CombinedMatcher::Invalid(e.to_string())
        }
    }
}

struct CacheEntry {
    version: u64,
    matcher: Arc<CombinedMatcher>,
}

/// Per-(guild, channel) matcher cache keyed by rule-set version. A version
/// mismatch discards the stale entry and recompiles; a superseded matcher is
/// never reused.
#[derive(Default)]
pub struct MatcherCache {
    entries: HashMap<(String, String), CacheEntry>,
}

impl MatcherCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile(
        &mut self,
        guild_id: &str,
        channel_id: &str,
        version: u64,
        rules: &ApplicableRules<'_>,
    ) -> Arc<CombinedMatcher> {
        let key = (guild_id.to_string(), channel_id.to_string());
        if let Some(entry) = self.entries.get(&key) {
            if entry.version == version {
                return Arc::clone(&entry.matcher);
            }
            debug!(
                "Matcher for guild {guild_id} channel {channel_id} is stale \
                 (v{} -> v{version}), recompiling",
                entry.version
            );
        }
        let matcher = Arc::new(compile_combined(rules));
        self.entries.insert(
            key,
            CacheEntry {
                version,
                matcher: Arc::clone(&matcher),
            },
        );
        matcher
    }

    /// Drop every cached matcher for a guild, e.g. when its config is
    /// removed outright.
    pub fn purge_guild(&mut self, guild_id: &str) {
        self.entries.retain(|(guild, _), _| guild != guild_id);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
