use crate::crawl::{crawl_with, extract_links, extract_text, extract_title, CrawlError};
use crate::utils::embeds;
use crate::utils::text::{truncate, FIELD_LIMIT};
use crate::Context;
use serenity::all::CreateEmbed;
use tracing::{info, warn};
use url::Url;

type Error = crate::error::Error;

const TITLE_LIMIT: usize = 400;
const LIST_LIMIT: usize = 4000;
const TEXT_DEFAULT_CHARS: u32 = 500;
const TEXT_MAX_CHARS: u32 = 4000;

/// What a crawl command tells the user, before it is turned into an embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Something was extracted.
    Found(String),
    /// The fetch worked but there was nothing to show.
    Empty(String),
    /// The fetch failed.
    Failed(String),
}

impl Reply {
    fn into_embed(self, heading: &str, url: &str) -> CreateEmbed {
        let (embed, description) = match self {
            Reply::Found(text) => (embeds::success_embed().title(heading), text),
            Reply::Empty(text) => (embeds::warning_embed().title(heading), text),
            Reply::Failed(text) => (embeds::error_embed().title("Crawl failed"), text),
        };
        embed
            .description(description)
            .field("URL", truncate(url, FIELD_LIMIT), false)
    }
}

pub fn title_reply(outcome: &Result<Option<String>, CrawlError>) -> Reply {
    match outcome {
        Ok(Some(title)) if title.is_empty() => Reply::Empty("The page has an empty title.".into()),
        Ok(Some(title)) => Reply::Found(truncate(title, TITLE_LIMIT)),
        Ok(None) => Reply::Empty("No title found.".into()),
        Err(e) => Reply::Failed(e.user_message()),
    }
}

pub fn links_reply(outcome: &Result<Vec<Url>, CrawlError>) -> Reply {
    match outcome {
        Ok(links) if links.is_empty() => Reply::Empty("No links found.".into()),
        Ok(links) => {
            let list = links.iter().map(Url::as_str).collect::<Vec<_>>().join("\n");
            Reply::Found(truncate(&list, LIST_LIMIT))
        }
        Err(e) => Reply::Failed(e.user_message()),
    }
}

pub fn text_reply(outcome: &Result<String, CrawlError>, max_chars: usize) -> Reply {
    match outcome {
        Ok(text) if text.is_empty() => Reply::Empty("No visible text.".into()),
        Ok(text) => Reply::Found(truncate(text, max_chars)),
        Err(e) => Reply::Failed(e.user_message()),
    }
}

fn log_outcome<T>(command: &str, url: &str, outcome: &Result<T, CrawlError>) {
    match outcome {
        Ok(_) => info!(command, url, "Crawl completed"),
        Err(e) => warn!(command, url, error = %e, "Crawl failed"),
    }
}

async fn send(ctx: Context<'_>, embed: CreateEmbed) -> Result<(), Error> {
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Fetch a web page and reply with its title.
#[poise::command(slash_command, prefix_command)]
pub async fn crawl(
    ctx: Context<'_>,
    #[description = "Page URL (http or https)"]
    #[rest]
    url: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    let outcome = crawl_with(&ctx.data().fetcher, &url, |page| extract_title(&page.body)).await;
    log_outcome("crawl", &url, &outcome);

    send(ctx, title_reply(&outcome).into_embed("Page Title", &url)).await
}

/// List the links on a web page without following them.
#[poise::command(slash_command, prefix_command)]
pub async fn crawl_links(
    ctx: Context<'_>,
    #[description = "Page URL (http or https)"]
    #[rest]
    url: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    let outcome = crawl_with(&ctx.data().fetcher, &url, |page| {
        extract_links(&page.body, &page.url)
    })
    .await;
    log_outcome("crawl_links", &url, &outcome);

    let heading = match &outcome {
        Ok(links) => format!("Page Links ({})", links.len()),
        Err(_) => "Page Links".to_string(),
    };
    send(ctx, links_reply(&outcome).into_embed(&heading, &url)).await
}

/// Show a snippet of the visible text on a web page.
#[poise::command(slash_command, prefix_command)]
pub async fn crawl_text(
    ctx: Context<'_>,
    #[description = "Page URL (http or https)"] url: String,
    #[description = "Maximum characters to show (default 500)"]
    #[min = 1]
    #[max = 4000]
    max_chars: Option<u32>,
) -> Result<(), Error> {
    let max_chars = max_chars
        .unwrap_or(TEXT_DEFAULT_CHARS)
        .clamp(1, TEXT_MAX_CHARS) as usize;

    ctx.defer().await?;

    let outcome = crawl_with(&ctx.data().fetcher, &url, |page| extract_text(&page.body)).await;
    log_outcome("crawl_text", &url, &outcome);

    let embed = text_reply(&outcome, max_chars)
        .into_embed("Page Text Snippet", &url)
        .footer(serenity::all::CreateEmbedFooter::new(format!(
            "Showing up to {max_chars} characters"
        )));
    send(ctx, embed).await
}
