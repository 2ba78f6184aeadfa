pub mod commands;
pub mod config;
pub mod crawl;
pub mod error;
pub mod utils;

/// Shared data accessible across all Poise commands.
pub struct Data {
    pub config: config::Config,
    pub fetcher: crawl::Fetcher,
    pub start_time: std::time::Instant,
}

/// Poise context alias used throughout the bot.
pub type Context<'a> = poise::Context<'a, Data, error::Error>;
