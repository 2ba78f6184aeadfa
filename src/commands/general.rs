use crate::utils::embeds;
use crate::Context;
use serenity::all::Mentionable;

type Error = crate::error::Error;

/// Check gateway and API latency, and show the crawl limits in force.
#[poise::command(slash_command, prefix_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let start = std::time::Instant::now();
    let msg = ctx.say("Pong!").await?;
    let api_latency = start.elapsed().as_millis();
    let gateway_latency = ctx.ping().await.as_millis();
    let fetch = &ctx.data().config.fetch;

    let embed = embeds::primary_embed()
        .title("Pong!")
        .field("API Latency", format!("{api_latency}ms"), true)
        .field("Gateway", format!("{gateway_latency}ms"), true)
        .field("Fetch Timeout", format!("{}s", fetch.timeout.as_secs()), true)
        .field("Page Size Limit", format!("{} KiB", fetch.max_bytes / 1024), true);

    msg.edit(ctx, poise::CreateReply::default().content("").embed(embed))
        .await?;

    Ok(())
}

/// Say hello.
#[poise::command(slash_command, prefix_command)]
pub async fn hello(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(format!("Hello, {}!", ctx.author().mention()))
        .await?;
    Ok(())
}

/// Show bot info and uptime.
#[poise::command(slash_command, prefix_command)]
pub async fn about(ctx: Context<'_>) -> Result<(), Error> {
    let uptime = ctx.data().start_time.elapsed();
    let hours = uptime.as_secs() / 3600;
    let minutes = (uptime.as_secs() % 3600) / 60;
    let seconds = uptime.as_secs() % 60;
    let fetch = &ctx.data().config.fetch;

    let embed = embeds::primary_embed()
        .title("About Crawler Bot")
        .description("Fetches a web page and reports its title, links or text.")
        .field("Version", &ctx.data().config.bot_version, true)
        .field("Uptime", format!("{hours}h {minutes}m {seconds}s"), true)
        .field("Fetch Timeout", format!("{}s", fetch.timeout.as_secs()), true)
        .field("Language", "Rust + Serenity/Poise", true);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// List all available commands.
#[poise::command(slash_command, prefix_command)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Command to get help for"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> Result<(), Error> {
    let footer = help_footer(&ctx.data().config.command_prefix);
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            extra_text_at_bottom: &footer,
            ephemeral: true,
            ..Default::default()
        },
    )
    .await?;
    Ok(())
}

/// Usage summary for the crawl commands, shown under the command list.
pub fn help_footer(prefix: &str) -> String {
    format!(
        "Crawling: {prefix}crawl <url> for the title, {prefix}crawl_links <url> for links, \
         {prefix}crawl_text <url> [max_chars] for a text snippet. Slash versions work too."
    )
}
