use poise::serenity_prelude as serenity;
use poise::CreateReply;

use crate::error::BotError;
use crate::types::{Context, Error};

/// Sends the outcome of a command.
///
/// Invalid input and missing targets are answered with a "`title` Error"
/// embed and end the command normally. Any other error is returned to the
/// framework's error handler.
pub async fn finish(
    ctx: Context<'_>,
    title: &str,
    color: u32,
    result: Result<serenity::CreateEmbed, BotError>,
) -> Result<(), Error> {
    let embed = match result {
        Ok(embed) => embed,
        Err(BotError::InvalidInput(message)) | Err(BotError::NotFound(message)) => {
            serenity::CreateEmbed::default()
                .title(format!("{} Error", title))
                .description(message)
                .color(color)
        }
        Err(e) => return Err(e.into()),
    };

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
