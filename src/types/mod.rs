// src/types/mod.rs - Core data model for the filtering engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Strictness level for a banned word, 0 (exact spelling) through 5 (most
/// aggressive lookalike tolerance). Ordering is meaningful: every input
/// matched at a lower level is also matched at any higher one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StrictnessLevel(u8);

impl StrictnessLevel {
    pub const MIN: StrictnessLevel = StrictnessLevel(0);
    pub const MAX: StrictnessLevel = StrictnessLevel(5);

    pub fn new(level: u8) -> Result<Self, ValidationError> {
        if level > Self::MAX.0 {
            return Err(ValidationError::LevelOutOfRange(level));
        }
        Ok(StrictnessLevel(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All levels in ascending order, for table construction and tests.
    pub fn all() -> impl Iterator<Item = StrictnessLevel> {
        (Self::MIN.0..=Self::MAX.0).map(StrictnessLevel)
    }
}

impl TryFrom<u8> for StrictnessLevel {
    type Error = ValidationError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        StrictnessLevel::new(level)
    }
}

impl From<StrictnessLevel> for u8 {
    fn from(level: StrictnessLevel) -> u8 {
        level.0
    }
}

impl std::fmt::Display for StrictnessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which channels a rule applies to. `AllChannels` is a distinct sentinel
/// gated by the guild's monitoring policy; an explicit channel set applies
/// unconditionally and is never merged with the sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChannelScope {
    #[default]
    AllChannels,
    Channels(Vec<String>),
}

impl ChannelScope {
    pub fn channel(channel_id: impl Into<String>) -> Self {
        ChannelScope::Channels(vec![channel_id.into()])
    }

    /// Two scopes overlap when some channel falls under both. The sentinel
    /// overlaps everything, including itself.
    pub fn overlaps(&self, other: &ChannelScope) -> bool {
        match (self, other) {
            (ChannelScope::AllChannels, _) | (_, ChannelScope::AllChannels) => true,
            (ChannelScope::Channels(a), ChannelScope::Channels(b)) => {
                a.iter().any(|id| b.contains(id))
            }
        }
    }
}

/// Persisted form: the string "all" or an array of channel ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChannelScopeRepr {
    Keyword(String),
    Channels(Vec<String>),
}

impl Serialize for ChannelScope {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ChannelScope::AllChannels => serializer.serialize_str("all"),
            ChannelScope::Channels(ids) => ids.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ChannelScope {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ChannelScopeRepr::deserialize(deserializer)? {
            ChannelScopeRepr::Keyword(word) if word == "all" => Ok(ChannelScope::AllChannels),
            ChannelScopeRepr::Keyword(word) => Err(serde::de::Error::custom(format!(
                "expected \"all\" or a list of channel ids, got \"{word}\""
            ))),
            // An empty persisted set carries no information; treat it as the
            // unscoped form rather than a rule that applies nowhere.
            ChannelScopeRepr::Channels(ids) if ids.is_empty() => Ok(ChannelScope::AllChannels),
            ChannelScopeRepr::Channels(ids) => Ok(ChannelScope::Channels(ids)),
        }
    }
}

/// A banned word with its tolerance level and channel scope. The word is
/// stored lower-cased; the command layer normalizes on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannedWordRule {
    pub word: String,
    pub level: StrictnessLevel,
    #[serde(default)]
    pub channels: ChannelScope,
}

/// A raw regex pattern with a channel scope. Early versions persisted these
/// as bare pattern strings; deserialization accepts both shapes and
/// normalizes the legacy one to an all-channels scope, so the evaluation
/// path only ever sees the structured form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CustomPatternRepr")]
pub struct CustomPatternRule {
    pub pattern: String,
    #[serde(default)]
    pub channels: ChannelScope,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CustomPatternRepr {
    Scoped {
        pattern: String,
        #[serde(default)]
        channels: ChannelScope,
    },
    Legacy(String),
}

impl From<CustomPatternRepr> for CustomPatternRule {
    fn from(repr: CustomPatternRepr) -> Self {
        match repr {
            CustomPatternRepr::Scoped { pattern, channels } => {
                CustomPatternRule { pattern, channels }
            }
            CustomPatternRepr::Legacy(pattern) => CustomPatternRule {
                pattern,
                channels: ChannelScope::AllChannels,
            },
        }
    }
}

/// Guild-wide monitoring policy for rules scoped to all channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    /// Only channels in the monitored list are filtered.
    #[serde(rename = "list")]
    OnlyListed,
    /// Every channel except those in the monitored list is filtered.
    #[default]
    #[serde(rename = "all")]
    AllExceptListed,
}

pub const DEFAULT_DELETE_TIMEOUT_MS: u64 = 2000;

fn default_delete_timeout() -> u64 {
    DEFAULT_DELETE_TIMEOUT_MS
}

/// Per-guild filter configuration, the unit of persistence. Field names
/// match the persisted JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuildFilterConfig {
    pub monitored_channels: Vec<String>,
    pub filter_mode: FilterMode,
    pub delete_timeout_ms: u64,
    pub banned_word_rules: Vec<BannedWordRule>,
    pub custom_pattern_rules: Vec<CustomPatternRule>,
    pub whitelist: Vec<String>,
    pub immune_roles: Vec<String>,
}

impl Default for GuildFilterConfig {
    fn default() -> Self {
        Self {
            monitored_channels: Vec::new(),
            filter_mode: FilterMode::default(),
            delete_timeout_ms: default_delete_timeout(),
            banned_word_rules: Vec::new(),
            custom_pattern_rules: Vec::new(),
            whitelist: Vec::new(),
            immune_roles: Vec::new(),
        }
    }
}

/// Outcome of evaluating one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Message is fine, or no rules applied to its channel.
    Allow,
    /// Message matched a banned rule and was not whitelisted.
    Block,
    /// The combined matcher failed to build; moderators need to fix the
    /// rule set. Fail-open for this message, with an alert.
    FilterBroken,
}

/// What the moderation-action collaborator should do with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationDirective {
    None,
    DeleteAndWarn { warn_text: String, delete_after_ms: u64 },
    NotifyChannel { text: String, delete_after_ms: u64 },
}

/// One incoming message or edit, as delivered by the platform collaborator.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub guild_id: String,
    pub channel_id: String,
    pub author_role_ids: Vec<String>,
    pub content: String,
}

/// Synchronous rejection of a command-layer mutation. Never a system fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("entry already exists for an overlapping scope")]
    AlreadyExists,
    #[error("no matching entry found")]
    NotFound,
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("strictness level {0} is out of range (0-5)")]
    LevelOutOfRange(u8),
    #[error("word must not be empty")]
    EmptyWord,
    #[error("channel set must not be empty")]
    EmptyChannelSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_range_is_enforced() {
        assert!(StrictnessLevel::new(0).is_ok());
        assert!(StrictnessLevel::new(5).is_ok());
        assert_eq!(
            StrictnessLevel::new(6),
            Err(ValidationError::LevelOutOfRange(6))
        );
        assert!(serde_json::from_str::<StrictnessLevel>("6").is_err());
        assert!(serde_json::from_str::<StrictnessLevel>("3").is_ok());
    }

    #[test]
    fn levels_are_ordered() {
        let l1 = StrictnessLevel::new(1).unwrap();
        let l4 = StrictnessLevel::new(4).unwrap();
        assert!(l1 < l4);
        assert_eq!(StrictnessLevel::all().count(), 6);
    }

    #[test]
    fn scope_overlap() {
        let all = ChannelScope::AllChannels;
        let a = ChannelScope::channel("100");
        let b = ChannelScope::channel("200");
        let ab = ChannelScope::Channels(vec!["100".into(), "200".into()]);

        assert!(all.overlaps(&all));
        assert!(all.overlaps(&a));
        assert!(a.overlaps(&ab));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn scope_serializes_as_all_or_list() {
        let all = serde_json::to_string(&ChannelScope::AllChannels).unwrap();
        assert_eq!(all, "\"all\"");
        let set = serde_json::to_string(&ChannelScope::channel("42")).unwrap();
        assert_eq!(set, "[\"42\"]");

        assert_eq!(
            serde_json::from_str::<ChannelScope>("\"all\"").unwrap(),
            ChannelScope::AllChannels
        );
        assert_eq!(
            serde_json::from_str::<ChannelScope>("[\"42\"]").unwrap(),
            ChannelScope::channel("42")
        );
        // Empty set carries no channels; normalized to the sentinel.
        assert_eq!(
            serde_json::from_str::<ChannelScope>("[]").unwrap(),
            ChannelScope::AllChannels
        );
        assert!(serde_json::from_str::<ChannelScope>("\"some\"").is_err());
    }

    #[test]
    fn legacy_bare_pattern_normalizes_to_all_channels() {
        let rule: CustomPatternRule = serde_json::from_str("\"b+ad\"").unwrap();
        assert_eq!(rule.pattern, "b+ad");
        assert_eq!(rule.channels, ChannelScope::AllChannels);

        let rule: CustomPatternRule =
            serde_json::from_str(r#"{"pattern":"b+ad","channels":["7"]}"#).unwrap();
        assert_eq!(rule.channels, ChannelScope::channel("7"));
    }

    #[test]
    fn word_rule_defaults_to_all_channels() {
        let rule: BannedWordRule = serde_json::from_str(r#"{"word":"bad","level":2}"#).unwrap();
        assert_eq!(rule.channels, ChannelScope::AllChannels);
        assert_eq!(rule.level.get(), 2);
    }

    #[test]
    fn filter_mode_serde_names() {
        assert_eq!(
            serde_json::to_string(&FilterMode::OnlyListed).unwrap(),
            "\"list\""
        );
        assert_eq!(
            serde_json::from_str::<FilterMode>("\"all\"").unwrap(),
            FilterMode::AllExceptListed
        );
    }
}
