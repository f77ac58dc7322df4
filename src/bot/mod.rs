// src/bot/mod.rs - Engine facade: message events in, moderation directives out

use std::sync::Arc;

use log::info;
use tokio::sync::RwLock;

use crate::config::GuildConfigStore;
use crate::types::{MessageEvent, ModerationDirective, Verdict};

pub mod commands;
pub mod pattern_compiler;
pub mod pipeline;
pub mod scope;
pub mod substitution;

use commands::FilterCommands;
use pipeline::EvaluationPipeline;

const WARN_TEXT: &str = "Your message contained prohibited words.";
const WARN_TEXT_EDITED: &str = "Your edited message contained prohibited words.";
const FILTER_BROKEN_TEXT: &str =
    "The word filter is currently broken. Please fix the custom patterns for this server.";

/// Ties the config store and evaluation pipeline together and translates
/// verdicts into directives for the moderation-action collaborator. The
/// platform connection delivers events here and carries out the directives;
/// this type performs no network or file I/O of its own.
pub struct FilterBot {
    store: Arc<RwLock<GuildConfigStore>>,
    pipeline: Arc<RwLock<EvaluationPipeline>>,
}

impl FilterBot {
    pub fn new() -> Self {
        Self::with_store(GuildConfigStore::new())
    }

    pub fn with_store(store: GuildConfigStore) -> Self {
        info!("Filter engine ready ({} guild(s) configured)", store.guild_count());
        Self {
            store: Arc::new(RwLock::new(store)),
            pipeline: Arc::new(RwLock::new(EvaluationPipeline::new())),
        }
    }

    /// Command operations bound to the same store; mutations made through
    /// it are picked up by the next evaluation.
    pub fn commands(&self) -> FilterCommands {
        FilterCommands::new(Arc::clone(&self.store))
    }

    pub fn store(&self) -> Arc<RwLock<GuildConfigStore>> {
        Arc::clone(&self.store)
    }

    /// Drop a guild's config and every matcher cached for it, e.g. when the
    /// bot leaves the guild. Returns false when the guild was never
    /// configured.
    pub async fn remove_guild(&self, guild_id: &str) -> bool {
        let removed = {
            let mut store = self.store.write().await;
            store.remove_guild(guild_id)
        };
        if removed {
            let mut pipeline = self.pipeline.write().await;
            pipeline.purge_guild(guild_id);
            info!("Removed filter config for guild {guild_id}");
        }
        removed
    }

    /// Evaluate a newly sent message.
    pub async fn handle_message(&self, event: &MessageEvent) -> (Verdict, ModerationDirective) {
        self.evaluate(event, WARN_TEXT).await
    }

    /// Evaluate an edited message. The full pipeline re-runs against the
    /// new text with the rules current at edit time; the prior content is
    /// never consulted.
    pub async fn handle_edit(&self, event: &MessageEvent) -> (Verdict, ModerationDirective) {
        self.evaluate(event, WARN_TEXT_EDITED).await
    }

    async fn evaluate(&self, event: &MessageEvent, warn_text: &str) -> (Verdict, ModerationDirective) {
        let snapshot = {
            let store = self.store.read().await;
            store.snapshot(&event.guild_id)
        };
        let (config, version) = match snapshot {
            Some(snapshot) => snapshot,
            // Guild never configured: nothing to filter.
            None => return (Verdict::Allow, ModerationDirective::None),
        };

        let verdict = {
            let mut pipeline = self.pipeline.write().await;
            pipeline.evaluate(
                &event.guild_id,
                &config,
                version,
                &event.channel_id,
                &event.author_role_ids,
                &event.content,
            )
        };

        let directive = match verdict {
            Verdict::Allow => ModerationDirective::None,
            Verdict::Block => ModerationDirective::DeleteAndWarn {
                warn_text: warn_text.to_string(),
                delete_after_ms: config.delete_timeout_ms,
            },
            Verdict::FilterBroken => ModerationDirective::NotifyChannel {
                text: FILTER_BROKEN_TEXT.to_string(),
                delete_after_ms: config.delete_timeout_ms,
            },
        };
        (verdict, directive)
    }
}

impl Default for FilterBot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChannelScope, StrictnessLevel};

    fn event(channel: &str, text: &str) -> MessageEvent {
        MessageEvent {
            guild_id: "g".to_string(),
            channel_id: channel.to_string(),
            author_role_ids: Vec::new(),
            content: text.to_string(),
        }
    }

    #[tokio::test]
    async fn block_produces_delete_and_warn() {
        let bot = FilterBot::new();
        bot.commands()
            .add_banned_word("g", "bad", StrictnessLevel::new(1).unwrap(), ChannelScope::AllChannels)
            .await
            .unwrap();

        let (verdict, directive) = bot.handle_message(&event("c", "that is b4d")).await;
        assert_eq!(verdict, Verdict::Block);
        assert!(matches!(directive, ModerationDirective::DeleteAndWarn { .. }));
    }

    #[tokio::test]
    async fn unknown_guild_is_unfiltered() {
        let bot = FilterBot::new();
        let (verdict, directive) = bot.handle_message(&event("c", "anything")).await;
        assert_eq!(verdict, Verdict::Allow);
        assert_eq!(directive, ModerationDirective::None);
    }

    #[tokio::test]
    async fn edit_directive_uses_edited_wording() {
        let bot = FilterBot::new();
        bot.commands()
            .add_banned_word("g", "bad", StrictnessLevel::new(0).unwrap(), ChannelScope::AllChannels)
            .await
            .unwrap();

        let (_, directive) = bot.handle_edit(&event("c", "now bad")).await;
        match directive {
            ModerationDirective::DeleteAndWarn { warn_text, .. } => {
                assert!(warn_text.contains("edited"));
            }
            other => panic!("expected DeleteAndWarn, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn command_mutations_take_effect_on_next_message() {
        let bot = FilterBot::new();
        let commands = bot.commands();

        commands
            .add_banned_word("g", "bad", StrictnessLevel::new(0).unwrap(), ChannelScope::AllChannels)
            .await
            .unwrap();
        let (verdict, _) = bot.handle_message(&event("c", "bad")).await;
        assert_eq!(verdict, Verdict::Block);

        commands.remove_banned_word("g", "bad").await.unwrap();
        let (verdict, _) = bot.handle_message(&event("c", "bad")).await;
        assert_eq!(verdict, Verdict::Allow);
    }

    #[tokio::test]
    async fn remove_guild_drops_config_and_cached_matchers() {
        let bot = FilterBot::new();
        bot.commands()
            .add_banned_word("g", "bad", StrictnessLevel::new(1).unwrap(), ChannelScope::AllChannels)
            .await
            .unwrap();
        let (verdict, _) = bot.handle_message(&event("c", "bad")).await;
        assert_eq!(verdict, Verdict::Block);

        assert!(bot.remove_guild("g").await);
        let (verdict, _) = bot.handle_message(&event("c", "bad")).await;
        assert_eq!(verdict, Verdict::Allow);

        // Second removal is a no-op.
        assert!(!bot.remove_guild("g").await);
    }

    #[tokio::test]
    async fn delete_timeout_is_carried_into_directive() {
        let bot = FilterBot::new();
        let commands = bot.commands();
        commands.set_delete_timeout("g", 12345).await;
        commands
            .add_banned_word("g", "bad", StrictnessLevel::new(0).unwrap(), ChannelScope::AllChannels)
            .await
            .unwrap();

        let (_, directive) = bot.handle_message(&event("c", "bad")).await;
        match directive {
            ModerationDirective::DeleteAndWarn { delete_after_ms, .. } => {
                assert_eq!(delete_after_ms, 12345);
            }
            other => panic!("expected DeleteAndWarn, got {other:?}"),
        }
    }
}
