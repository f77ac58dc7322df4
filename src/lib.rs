//! # Obfuscation-Resistant Word Filtering Engine
//!
//! A lexical filtering engine for chat moderation: banned words with
//! tunable strictness levels, raw custom patterns, per-channel rule
//! scoping, an exact-spelling whitelist override, and role immunity.
//!
//! ## Features
//!
//! - **Six strictness tiers**: from exact spelling up to leetspeak,
//!   ASCII art, accents, and cross-script unicode lookalikes
//! - **Noise tolerance**: punctuation and whitespace wedged between
//!   letters does not defeat a rule
//! - **Per-channel scoping**: rules bound to specific channels apply
//!   unconditionally; guild-wide rules follow the monitoring policy
//! - **One matcher per channel**: all applicable rules compile into a
//!   single linear-time regex, cached by rule-set version
//! - **Fail-open with alert**: a broken rule set flags moderators instead
//!   of silently allowing or blocking everything
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nogoon::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bot = FilterBot::new();
//!
//!     let commands = bot.commands();
//!     commands
//!         .add_banned_word("guild", "badword", StrictnessLevel::new(3)?, ChannelScope::AllChannels)
//!         .await?;
//!
//!     let event = MessageEvent {
//!         guild_id: "guild".into(),
//!         channel_id: "general".into(),
//!         author_role_ids: vec![],
//!         content: "b @ d w 0 r d".into(),
//!     };
//!     let (verdict, directive) = bot.handle_message(&event).await;
//!     println!("{verdict:?} -> {directive:?}");
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod config;
pub mod types;

// Re-export commonly used items
pub mod prelude {
    pub use crate::bot::commands::FilterCommands;
    pub use crate::bot::FilterBot;
    pub use crate::config::GuildConfigStore;
    pub use crate::types::{
        BannedWordRule, ChannelScope, CustomPatternRule, FilterMode, GuildFilterConfig,
        MessageEvent, ModerationDirective, StrictnessLevel, ValidationError, Verdict,
    };
    pub use anyhow::Result;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
