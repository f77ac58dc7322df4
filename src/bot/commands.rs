// src/bot/commands.rs - Command-layer mutations of the guild filter config

use std::sync::Arc;

use log::info;
use tokio::sync::RwLock;

use crate::bot::pattern_compiler::validate_custom_pattern;
use crate::config::GuildConfigStore;
use crate::types::{
    BannedWordRule, ChannelScope, CustomPatternRule, FilterMode, GuildFilterConfig,
    StrictnessLevel, ValidationError,
};

/// Command-surface operations. Every method validates first and mutates
/// (bumping the guild's rule-set version) only on success; a rejected
/// mutation leaves the store untouched. Permission checks and reply
/// formatting belong to the calling command surface, not here.
pub struct FilterCommands {
    store: Arc<RwLock<GuildConfigStore>>,
}

impl FilterCommands {
    pub fn new(store: Arc<RwLock<GuildConfigStore>>) -> Self {
        Self { store }
    }

    /// Ban a word at a strictness level, scoped to a channel set or to all
    /// monitored channels. The same word may be banned again only for a
    /// disjoint channel set.
    pub async fn add_banned_word(
        &self,
        guild_id: &str,
        word: &str,
        level: StrictnessLevel,
        scope: ChannelScope,
    ) -> Result<(), ValidationError> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Err(ValidationError::EmptyWord);
        }
        validate_scope(&scope)?;

        let mut store = self.store.write().await;
        let duplicate = store.get(guild_id).is_some_and(|config| {
            config
                .banned_word_rules
                .iter()
                .any(|rule| rule.word == word && rule.channels.overlaps(&scope))
        });
        if duplicate {
            return Err(ValidationError::AlreadyExists);
        }

        store.mutate(guild_id, |config| {
            config.banned_word_rules.push(BannedWordRule {
                word: word.clone(),
                level,
                channels: scope,
            });
        });
        info!("Guild {guild_id}: banned word \"{word}\" at level {level}");
        Ok(())
    }

    /// Remove every scope entry for a banned word.
    pub async fn remove_banned_word(
        &self,
        guild_id: &str,
        word: &str,
    ) -> Result<(), ValidationError> {
        let word = word.trim().to_lowercase();
        let mut store = self.store.write().await;
        let present = store
            .get(guild_id)
            .is_some_and(|config| config.banned_word_rules.iter().any(|rule| rule.word == word));
        if !present {
            return Err(ValidationError::NotFound);
        }
        store.mutate(guild_id, |config| {
            config.banned_word_rules.retain(|rule| rule.word != word);
        });
        info!("Guild {guild_id}: removed banned word \"{word}\"");
        Ok(())
    }

    /// Add a raw regex pattern. Validated standalone here with the same
    /// builder settings as the combined compile; an invalid pattern is
    /// rejected and never stored.
    pub async fn add_custom_pattern(
        &self,
        guild_id: &str,
        pattern: &str,
        scope: ChannelScope,
    ) -> Result<(), ValidationError> {
        if pattern.is_empty() {
            return Err(ValidationError::InvalidPattern("empty pattern".to_string()));
        }
        validate_scope(&scope)?;
        validate_custom_pattern(pattern)?;

        let mut store = self.store.write().await;
        let duplicate = store.get(guild_id).is_some_and(|config| {
            config
                .custom_pattern_rules
                .iter()
                .any(|rule| rule.pattern == pattern && rule.channels.overlaps(&scope))
        });
        if duplicate {
            return Err(ValidationError::AlreadyExists);
        }

        store.mutate(guild_id, |config| {
            config.custom_pattern_rules.push(CustomPatternRule {
                pattern: pattern.to_string(),
                channels: scope,
            });
        });
        info!("Guild {guild_id}: added custom pattern");
        Ok(())
    }

    /// Remove a custom pattern by zero-based index.
    pub async fn remove_custom_pattern(
        &self,
        guild_id: &str,
        index: usize,
    ) -> Result<(), ValidationError> {
        let mut store = self.store.write().await;
        let in_bounds = store
            .get(guild_id)
            .is_some_and(|config| index < config.custom_pattern_rules.len());
        if !in_bounds {
            return Err(ValidationError::NotFound);
        }
        store.mutate(guild_id, |config| {
            config.custom_pattern_rules.remove(index);
        });
        info!("Guild {guild_id}: removed custom pattern #{index}");
        Ok(())
    }

    /// Whitelist an exact spelling, exempting it guild-wide.
    pub async fn add_whitelist_word(
        &self,
        guild_id: &str,
        word: &str,
    ) -> Result<(), ValidationError> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Err(ValidationError::EmptyWord);
        }
        let mut store = self.store.write().await;
        let present = store
            .get(guild_id)
            .is_some_and(|config| config.whitelist.contains(&word));
        if present {
            return Err(ValidationError::AlreadyExists);
        }
        store.mutate(guild_id, |config| config.whitelist.push(word.clone()));
        info!("Guild {guild_id}: whitelisted \"{word}\"");
        Ok(())
    }

    pub async fn remove_whitelist_word(
        &self,
        guild_id: &str,
        word: &str,
    ) -> Result<(), ValidationError> {
        let word = word.trim().to_lowercase();
        let mut store = self.store.write().await;
        let present = store
            .get(guild_id)
            .is_some_and(|config| config.whitelist.contains(&word));
        if !present {
            return Err(ValidationError::NotFound);
        }
        store.mutate(guild_id, |config| {
            config.whitelist.retain(|entry| entry != &word);
        });
        Ok(())
    }

    pub async fn set_filter_mode(&self, guild_id: &str, mode: FilterMode) {
        let mut store = self.store.write().await;
        store.mutate(guild_id, |config| config.filter_mode = mode);
        info!("Guild {guild_id}: filter mode set to {mode:?}");
    }

    pub async fn add_monitored_channel(
        &self,
        guild_id: &str,
        channel_id: &str,
    ) -> Result<(), ValidationError> {
        let mut store = self.store.write().await;
        let present = store.get(guild_id).is_some_and(|config| {
            config.monitored_channels.iter().any(|id| id == channel_id)
        });
        if present {
            return Err(ValidationError::AlreadyExists);
        }
        store.mutate(guild_id, |config| {
            config.monitored_channels.push(channel_id.to_string());
        });
        Ok(())
    }

    pub async fn remove_monitored_channel(
        &self,
        guild_id: &str,
        channel_id: &str,
    ) -> Result<(), ValidationError> {
        let mut store = self.store.write().await;
        let present = store.get(guild_id).is_some_and(|config| {
            config.monitored_channels.iter().any(|id| id == channel_id)
        });
        if !present {
            return Err(ValidationError::NotFound);
        }
        store.mutate(guild_id, |config| {
            config.monitored_channels.retain(|id| id != channel_id);
        });
        Ok(())
    }

    pub async fn add_immune_role(
        &self,
        guild_id: &str,
        role_id: &str,
    ) -> Result<(), ValidationError> {
        let mut store = self.store.write().await;
        let present = store
            .get(guild_id)
            .is_some_and(|config| config.immune_roles.iter().any(|id| id == role_id));
        if present {
            return Err(ValidationError::AlreadyExists);
        }
        store.mutate(guild_id, |config| {
            config.immune_roles.push(role_id.to_string());
        });
        Ok(())
    }

    pub async fn remove_immune_role(
        &self,
        guild_id: &str,
        role_id: &str,
    ) -> Result<(), ValidationError> {
        let mut store = self.store.write().await;
        let present = store
            .get(guild_id)
            .is_some_and(|config| config.immune_roles.iter().any(|id| id == role_id));
        if !present {
            return Err(ValidationError::NotFound);
        }
        store.mutate(guild_id, |config| {
            config.immune_roles.retain(|id| id != role_id);
        });
        Ok(())
    }

    /// How long the moderation-action collaborator keeps warning messages
    /// around before deleting them.
    pub async fn set_delete_timeout(&self, guild_id: &str, timeout_ms: u64) {
        let mut store = self.store.write().await;
        store.mutate(guild_id, |config| config.delete_timeout_ms = timeout_ms);
    }

    /// Snapshot of a guild's settings for display by the command surface.
    pub async fn settings_summary(&self, guild_id: &str) -> GuildFilterConfig {
        let store = self.store.read().await;
        store.get(guild_id).cloned().unwrap_or_default()
    }
}

fn validate_scope(scope: &ChannelScope) -> Result<(), ValidationError> {
    match scope {
        ChannelScope::Channels(ids) if ids.is_empty() => Err(ValidationError::EmptyChannelSet),
        _ => Ok(()),
    }
}
