// src/bot/pipeline.rs - Per-message evaluation: immunity, scoping, matching, whitelist

use log::{debug, error};
use regex::RegexBuilder;

use crate::bot::pattern_compiler::{CombinedMatcher, MatcherCache};
use crate::bot::scope::resolve_applicable;
use crate::types::{GuildFilterConfig, Verdict};

/// Whitelist entries are compiled as exact word-boundary literals,
/// deliberately without substitution or noise tolerance: only the exact
/// spelling is exempted, even though the block side tolerates disguises.
fn whitelist_permits(whitelist: &[String], text: &str) -> bool {
    whitelist.iter().any(|word| {
        let pattern = format!(r"\b{}\b", regex::escape(word));
        match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(re) => re.is_match(text),
            // Escaped literals always compile; treat a failure as no match
            // rather than letting one entry disable the filter.
            Err(e) => {
                error!("Whitelist entry '{word}' failed to compile: {e}");
                false
            }
        }
    })
}

/// Runs the full evaluation for one message. Owns the matcher cache; a
/// single pipeline instance serves every guild.
#[derive(Default)]
pub struct EvaluationPipeline {
    cache: MatcherCache,
}

impl EvaluationPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn (config, channel, author roles, text) into a verdict. Always
    /// returns; an engine fault becomes `FilterBroken`, never a panic or an
    /// implicit allow-everything/block-everything.
    pub fn evaluate(
        &mut self,
        guild_id: &str,
        config: &GuildFilterConfig,
        version: u64,
        channel_id: &str,
        author_role_ids: &[String],
        text: &str,
    ) -> Verdict {
        if author_role_ids
            .iter()
            .any(|role| config.immune_roles.contains(role))
        {
            debug!("Author immune in guild {guild_id}, skipping filter");
            return Verdict::Allow;
        }

        let rules = resolve_applicable(config, channel_id);
        if rules.is_empty() {
            return Verdict::Allow;
        }

        let matcher = self
            .cache
            .get_or_compile(guild_id, channel_id, version, &rules);
        let regex = match &*matcher {
            CombinedMatcher::Compiled(regex) => regex,
            CombinedMatcher::Empty => return Verdict::Allow,
            CombinedMatcher::Invalid(reason) => {
                error!("Filter broken for guild {guild_id} channel {channel_id}: {reason}");
                return Verdict::FilterBroken;
            }
        };

        if !regex.is_match(text) {
            return Verdict::Allow;
        }

        if whitelist_permits(&config.whitelist, text) {
            debug!("Whitelist override in guild {guild_id} channel {channel_id}");
            return Verdict::Allow;
        }

        Verdict::Block
    }

    pub fn purge_guild(&mut self, guild_id: &str) {
        self.cache.purge_guild(guild_id);
    }
}
