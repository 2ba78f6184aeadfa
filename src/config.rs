use crate::error::Error;
use serenity::all::GuildId;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PREFIX: &str = "!";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub guild_id: Option<GuildId>,
    pub command_prefix: String,
    pub fetch: FetchConfig,
    pub bot_version: String,
}

/// Limits applied to every outbound page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_bytes: DEFAULT_MAX_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `DISCORD_TOKEN` — Bot token from Discord Developer Portal
    ///
    /// Optional:
    /// - `GUILD_ID` — Register slash commands to a single guild instead of globally
    /// - `COMMAND_PREFIX` — Prefix for text commands (default `!`)
    /// - `CRAWL_TIMEOUT_SECS` — Total fetch timeout in seconds (default 10)
    /// - `CRAWL_MAX_BYTES` — Largest accepted response body (default 10 MiB)
    /// - `CRAWL_USER_AGENT` — User-Agent sent with every fetch
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_token = var("DISCORD_TOKEN")
            .ok_or_else(|| Error::Config("DISCORD_TOKEN environment variable is required".into()))?;

        let guild_id = match parse_optional::<u64>("GUILD_ID", var("GUILD_ID"))? {
            Some(0) => return Err(Error::Config("GUILD_ID must be a non-zero ID".into())),
            other => other.map(GuildId::new),
        };

        let command_prefix = var("COMMAND_PREFIX")
            .map(|p| p.trim().to_string())
            .unwrap_or_else(|| DEFAULT_PREFIX.into());

        let timeout_secs = parse_optional::<u64>("CRAWL_TIMEOUT_SECS", var("CRAWL_TIMEOUT_SECS"))?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::Config("CRAWL_TIMEOUT_SECS must be greater than zero".into()));
        }

        let max_bytes = parse_optional::<u64>("CRAWL_MAX_BYTES", var("CRAWL_MAX_BYTES"))?
            .unwrap_or(DEFAULT_MAX_BYTES);
        if max_bytes == 0 {
            return Err(Error::Config("CRAWL_MAX_BYTES must be greater than zero".into()));
        }

        let user_agent = var("CRAWL_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.into());

        Ok(Self {
            discord_token,
            guild_id,
            command_prefix,
            fetch: FetchConfig {
                timeout: Duration::from_secs(timeout_secs),
                max_bytes,
                user_agent,
            },
            bot_version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}

fn parse_optional<T>(var: &str, value: Option<String>) -> Result<Option<T>, Error>
where
    T: FromStr,
{
    match value {
        Some(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("Invalid value for {var}: '{val}'"))),
        None => Ok(None),
    }
}
