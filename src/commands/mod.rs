pub mod crawl;
pub mod general;

use crate::utils::embeds;
use crate::Data;

type Error = crate::error::Error;

/// Framework-level error hook. Command failures get an ephemeral embed,
/// bad arguments get a usage line, everything else goes to Poise's default.
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let embed = embeds::error_embed()
                .title("Error")
                .description(error.user_message());
            let _ = ctx
                .send(poise::CreateReply::default().embed(embed).ephemeral(true))
                .await;
            tracing::error!(command = %ctx.command().name, error = %error, "Command error");
        }
        poise::FrameworkError::ArgumentParse { error, input, ctx, .. } => {
            let prefix = &ctx.data().config.command_prefix;
            let embed = embeds::warning_embed()
                .title("Invalid arguments")
                .description(usage_hint(prefix, &ctx.command().name));
            let _ = ctx
                .send(poise::CreateReply::default().embed(embed).ephemeral(true))
                .await;
            tracing::warn!(
                command = %ctx.command().name,
                input = ?input,
                error = %error,
                "Argument parse failed"
            );
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!(error = %e, "Error handling error");
            }
        }
    }
}

/// One-line usage for a command, falling back to a pointer at `help`.
pub fn usage_hint(prefix: &str, command: &str) -> String {
    match command {
        "crawl" | "crawl_links" => format!("Usage: `{prefix}{command} <url>`"),
        "crawl_text" => format!("Usage: `{prefix}crawl_text <url> [max_chars]`"),
        _ => format!("Try `{prefix}help {command}`."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crawl_commands_get_their_usage() {
        assert_eq!(usage_hint("!", "crawl"), "Usage: `!crawl <url>`");
        assert_eq!(usage_hint("?", "crawl_links"), "Usage: `?crawl_links <url>`");
        assert_eq!(
            usage_hint("!", "crawl_text"),
            "Usage: `!crawl_text <url> [max_chars]`"
        );
    }

    #[test]
    fn other_commands_point_at_help() {
        assert_eq!(usage_hint("!", "about"), "Try `!help about`.");
    }
}
