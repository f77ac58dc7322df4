// src/main.rs - Local evaluation harness: feed lines on stdin, get verdicts

use anyhow::Result;
use log::{info, warn};
use std::env;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

use nogoon::config::GuildConfigStore;
use nogoon::prelude::*;

const DEMO_GUILD: &str = "local";
const DEMO_CHANNEL: &str = "stdin";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("nogoon v{} - word filter evaluation harness", nogoon::VERSION);

    let settings_path = env::var("NOGOON_SETTINGS").unwrap_or_else(|_| "guild_settings.json".to_string());
    let store = if Path::new(&settings_path).exists() {
        info!("Loading settings from {settings_path}");
        GuildConfigStore::load_from_file(&settings_path).await?
    } else {
        warn!("{settings_path} not found, starting with an empty rule set");
        GuildConfigStore::new()
    };

    let bot = FilterBot::with_store(store);
    seed_demo_rules(&bot).await?;

    info!("Type a message per line (guild \"{DEMO_GUILD}\", channel \"{DEMO_CHANNEL}\"); Ctrl-D to exit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let event = MessageEvent {
            guild_id: DEMO_GUILD.to_string(),
            channel_id: DEMO_CHANNEL.to_string(),
            author_role_ids: Vec::new(),
            content: line,
        };
        let (verdict, directive) = bot.handle_message(&event).await;
        match directive {
            ModerationDirective::None => println!("{verdict:?}"),
            ModerationDirective::DeleteAndWarn { warn_text, delete_after_ms } => {
                println!("{verdict:?}: delete + warn \"{warn_text}\" ({delete_after_ms} ms)")
            }
            ModerationDirective::NotifyChannel { text, .. } => {
                println!("{verdict:?}: notify \"{text}\"")
            }
        }
    }

    Ok(())
}

/// Give the harness something to chew on when no settings file is present.
async fn seed_demo_rules(bot: &FilterBot) -> Result<()> {
    let commands = bot.commands();
    if !commands.settings_summary(DEMO_GUILD).await.banned_word_rules.is_empty() {
        return Ok(());
    }
    for (word, level) in [("badword", 3), ("golf", 0)] {
        match commands
            .add_banned_word(DEMO_GUILD, word, StrictnessLevel::new(level)?, ChannelScope::AllChannels)
            .await
        {
            Ok(()) | Err(ValidationError::AlreadyExists) => {}
            Err(e) => return Err(e.into()),
        }
    }
    match commands.add_whitelist_word(DEMO_GUILD, "golfer").await {
        Ok(()) | Err(ValidationError::AlreadyExists) => {}
        Err(e) => return Err(e.into()),
    }
    info!("Seeded demo rules: badword (level 3), golf (level 0), whitelist golfer");
    Ok(())
}
