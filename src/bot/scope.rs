// src/bot/scope.rs - Per-channel rule scope resolution

use crate::types::{BannedWordRule, ChannelScope, CustomPatternRule, FilterMode, GuildFilterConfig};

/// The subset of a guild's rules that applies to one channel.
pub struct ApplicableRules<'a> {
    pub words: Vec<&'a BannedWordRule>,
    pub patterns: Vec<&'a CustomPatternRule>,
}

impl ApplicableRules<'_> {
    /// No applicable rules means the channel is unfiltered for this
    /// message, not "filtered and nothing matched".
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.patterns.is_empty()
    }
}

/// Decide whether one rule's scope covers a channel. An explicit channel
/// set applies unconditionally; the all-channels sentinel is gated by the
/// guild's monitoring policy.
fn scope_applies(scope: &ChannelScope, config: &GuildFilterConfig, channel_id: &str) -> bool {
    match scope {
        ChannelScope::Channels(ids) => ids.iter().any(|id| id == channel_id),
        ChannelScope::AllChannels => {
            let listed = config.monitored_channels.iter().any(|id| id == channel_id);
            match config.filter_mode {
                FilterMode::OnlyListed => listed,
                FilterMode::AllExceptListed => !listed,
            }
        }
    }
}

/// Collect every banned-word and custom-pattern rule that applies to
/// messages in `channel_id`.
pub fn resolve_applicable<'a>(
    config: &'a GuildFilterConfig,
    channel_id: &str,
) -> ApplicableRules<'a> {
    ApplicableRules {
        words: config
            .banned_word_rules
            .iter()
            .filter(|rule| scope_applies(&rule.channels, config, channel_id))
            .collect(),
        patterns: config
            .custom_pattern_rules
            .iter()
            .filter(|rule| scope_applies(&rule.channels, config, channel_id))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StrictnessLevel;

    fn word_rule(word: &str, channels: ChannelScope) -> BannedWordRule {
        BannedWordRule {
            word: word.to_string(),
            level: StrictnessLevel::new(1).unwrap(),
            channels,
        }
    }

    fn config_with(mode: FilterMode, monitored: &[&str], rules: Vec<BannedWordRule>) -> GuildFilterConfig {
        GuildFilterConfig {
            filter_mode: mode,
            monitored_channels: monitored.iter().map(|s| s.to_string()).collect(),
            banned_word_rules: rules,
            ..GuildFilterConfig::default()
        }
    }

    #[test]
    fn explicit_scope_applies_even_when_channel_is_not_monitored() {
        let config = config_with(
            FilterMode::OnlyListed,
            &[], // channel C is not monitored
            vec![word_rule("x", ChannelScope::channel("C"))],
        );
        let applicable = resolve_applicable(&config, "C");
        assert_eq!(applicable.words.len(), 1);
    }

    #[test]
    fn all_channels_scope_respects_only_listed_mode() {
        let rules = vec![word_rule("y", ChannelScope::AllChannels)];
        let config = config_with(FilterMode::OnlyListed, &[], rules.clone());
        assert!(resolve_applicable(&config, "C").is_empty());

        let config = config_with(FilterMode::OnlyListed, &["C"], rules);
        assert_eq!(resolve_applicable(&config, "C").words.len(), 1);
    }

    #[test]
    fn all_channels_scope_respects_all_except_listed_mode() {
        let rules = vec![word_rule("y", ChannelScope::AllChannels)];
        let config = config_with(FilterMode::AllExceptListed, &["C"], rules.clone());
        assert!(resolve_applicable(&config, "C").is_empty());
        assert_eq!(resolve_applicable(&config, "D").words.len(), 1);
    }

    #[test]
    fn rules_scoped_elsewhere_do_not_leak() {
        let config = config_with(
            FilterMode::AllExceptListed,
            &[],
            vec![word_rule("x", ChannelScope::channel("other"))],
        );
        assert!(resolve_applicable(&config, "C").is_empty());
    }

    #[test]
    fn custom_patterns_are_scoped_like_words() {
        let mut config = config_with(FilterMode::OnlyListed, &[], Vec::new());
        config.custom_pattern_rules = vec![
            CustomPatternRule {
                pattern: "spam".to_string(),
                channels: ChannelScope::channel("C"),
            },
            CustomPatternRule {
                pattern: "ham".to_string(),
                channels: ChannelScope::AllChannels,
            },
        ];
        let applicable = resolve_applicable(&config, "C");
        // Explicit scope applies; the all-channels pattern is gated out
        // because C is not monitored under OnlyListed.
        assert_eq!(applicable.patterns.len(), 1);
        assert_eq!(applicable.patterns[0].pattern, "spam");
    }
}
