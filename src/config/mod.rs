// src/config/mod.rs - Guild configuration store with rule-set versioning

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::types::GuildFilterConfig;

/// Persisted settings file shape: one config per guild, plus a save stamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    guilds: HashMap<String, GuildFilterConfig>,
}

struct GuildEntry {
    config: GuildFilterConfig,
    /// Rule-set version, bumped on every mutation. Matcher cache entries
    /// are keyed against it; a bump invalidates them on next lookup.
    version: u64,
}

/// Explicit store for every guild's filter configuration. Passed by
/// reference into the command and evaluation layers; there is no ambient
/// global. Mutation and version bump happen together, so a compiled
/// matcher can never be validated against rules it was not built from.
#[derive(Default)]
pub struct GuildConfigStore {
    guilds: HashMap<String, GuildEntry>,
}

impl GuildConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the persisted JSON settings. Legacy shapes (bare custom
    /// pattern strings, missing scopes) are normalized during
    /// deserialization; the in-memory model only holds the structured form.
    pub fn load(json: &str) -> Result<Self> {
        let file: SettingsFile = serde_json::from_str(json).context("parsing guild settings")?;
        let guilds = file
            .guilds
            .into_iter()
            .map(|(id, config)| (id, GuildEntry { config, version: 1 }))
            .collect::<HashMap<_, _>>();
        info!("Loaded filter settings for {} guild(s)", guilds.len());
        Ok(Self { guilds })
    }

    /// Serialize every guild config in the persisted schema.
    pub fn to_json(&self) -> Result<String> {
        let file = SettingsFile {
            last_updated: Some(Utc::now()),
            guilds: self
                .guilds
                .iter()
                .map(|(id, entry)| (id.clone(), entry.config.clone()))
                .collect(),
        };
        serde_json::to_string_pretty(&file).context("serializing guild settings")
    }

    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        Self::load(&json)
    }

    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        debug!("Saved filter settings to {}", path.display());
        Ok(())
    }

    /// Clone of a guild's config together with its current rule-set
    /// version, for evaluation without holding the store borrow.
    pub fn snapshot(&self, guild_id: &str) -> Option<(GuildFilterConfig, u64)> {
        self.guilds
            .get(guild_id)
            .map(|entry| (entry.config.clone(), entry.version))
    }

    pub fn get(&self, guild_id: &str) -> Option<&GuildFilterConfig> {
        self.guilds.get(guild_id).map(|entry| &entry.config)
    }

    /// Apply a mutation to a guild's config, creating the guild entry on
    /// first reference, and bump its rule-set version.
    pub fn mutate<R>(
        &mut self,
        guild_id: &str,
        mutation: impl FnOnce(&mut GuildFilterConfig) -> R,
    ) -> R {
        let entry = self
            .guilds
            .entry(guild_id.to_string())
            .or_insert_with(|| GuildEntry {
                config: GuildFilterConfig::default(),
                version: 0,
            });
        let result = mutation(&mut entry.config);
        entry.version += 1;
        debug!("Guild {guild_id} rule set now at v{}", entry.version);
        result
    }

    pub fn remove_guild(&mut self, guild_id: &str) -> bool {
        self.guilds.remove(guild_id).is_some()
    }

    pub fn guild_count(&self) -> usize {
        self.guilds.len()
    }
}
