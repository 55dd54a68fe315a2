use chrono::{TimeDelta, Utc};
use poise::futures_util::StreamExt;
use poise::serenity_prelude as serenity;
use poise::CreateReply;

pub(crate) use crate::types::{Context, Data, Error};

use crate::error::BotError;
use crate::helpers::embed::{self, GRAY_EMBED};
use crate::helpers::reply::finish;
use crate::structs::time_parse::{human_readable, resolve_from_now};

const SLOWMODE_LIMIT: TimeDelta = TimeDelta::hours(6);
const TIMEOUT_LIMIT: TimeDelta = TimeDelta::days(28);
const BULK_DELETE_WINDOW: TimeDelta = TimeDelta::days(14);
const BULK_DELETE_CHUNK: usize = 100;
const AUTOCOMPLETE_LIMIT: usize = 25;

pub fn all_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        ban(),
        delete(),
        kick(),
        slowmode(),
        timeout(),
        unban(),
        // add more here
    ]
}

fn reason_text(reason: &Option<String>) -> &str {
    reason.as_deref().unwrap_or("No reason provided")
}

/// Ban user from server
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "BAN_MEMBERS",
    required_bot_permissions = "BAN_MEMBERS"
)]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "User to ban"] user: serenity::User,
    #[description = "Days to delete user messages"]
    #[min = 1]
    #[max = 7]
    delete_message_days: Option<u8>,
    #[description = "Reason for ban"] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("guild_only command ran outside a guild")?;
    let days = delete_message_days.unwrap_or(0).min(7);

    match &reason {
        Some(reason) => guild_id.ban_with_reason(ctx, user.id, days, reason).await?,
        None => guild_id.ban(ctx, user.id, days).await?,
    }

    tracing::info!("{} banned {} in {}", ctx.author().name, user.id, guild_id);

    let description = format!("Banned **{}**\nReason: `{}`", user.tag(), reason_text(&reason));
    ctx.send(CreateReply::default().embed(embed::moderation("Ban", description)))
        .await?;
    Ok(())
}

fn deletion_summary(deleted: usize, requested: usize) -> String {
    let count = format!("`{}` deleted", embed::plural(deleted, "message"));
    if deleted < requested {
        format!("{}\nOlder messages past `14 days` cannot be deleted", count)
    } else {
        count
    }
}

/// Purge messages from channel
#[poise::command(
    slash_command,
    guild_only,
    ephemeral,
    required_permissions = "MANAGE_MESSAGES",
    required_bot_permissions = "MANAGE_MESSAGES"
)]
pub async fn delete(
    ctx: Context<'_>,
    #[description = "Amount to delete"]
    #[min = 1]
    amount: u32,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let channel_id = ctx.channel_id();
    let cutoff = (Utc::now() - BULK_DELETE_WINDOW).timestamp();
    let amount = amount as usize;

    let mut ids = Vec::new();
    let mut messages = Box::pin(channel_id.messages_iter(ctx));
    while ids.len() < amount {
        let Some(message) = messages.next().await else {
            break;
        };
        let message = message?;
        if message.timestamp.unix_timestamp() <= cutoff {
            break;
        }
        ids.push(message.id);
    }

    for chunk in ids.chunks(BULK_DELETE_CHUNK) {
        match chunk {
            [single] => channel_id.delete_message(ctx, *single).await?,
            many => channel_id.delete_messages(ctx, many).await?,
        }
    }

    let embed = if ids.is_empty() {
        embed::moderation(
            "Delete Error",
            "Unable to delete messages!\nMessages are older than `14 days` or do not exist",
        )
    } else {
        tracing::info!("{} deleted {} message(s) in {}", ctx.author().name, ids.len(), channel_id);
        embed::moderation("Delete", deletion_summary(ids.len(), amount))
    };

    ctx.send(CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Kick member from server
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "KICK_MEMBERS",
    required_bot_permissions = "KICK_MEMBERS"
)]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "Member to kick"] member: serenity::Member,
    #[description = "Reason for kick"] reason: Option<String>,
) -> Result<(), Error> {
    match &reason {
        Some(reason) => member.kick_with_reason(ctx, reason).await?,
        None => member.kick(ctx).await?,
    }

    tracing::info!("{} kicked {} in {}", ctx.author().name, member.user.id, member.guild_id);

    let description = format!(
        "Kicked **{}**\nReason: `{}`",
        member.user.tag(),
        reason_text(&reason)
    );
    ctx.send(CreateReply::default().embed(embed::moderation("Kick", description)))
        .await?;
    Ok(())
}

/// Slowmode channel
#[poise::command(slash_command, guild_only, subcommands("slowmode_enable", "slowmode_disable"), subcommand_required)]
pub async fn slowmode(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

async fn resolve_channel(
    ctx: Context<'_>,
    channel: Option<serenity::GuildChannel>,
) -> Result<serenity::GuildChannel, BotError> {
    if let Some(channel) = channel {
        return Ok(channel);
    }

    ctx.guild_channel().await.ok_or_else(|| {
        BotError::NotFound("This command must be invoked in a valid textable guild channel!".into())
    })
}

fn slowmode_seconds(delta: TimeDelta) -> Result<u16, BotError> {
    if delta > SLOWMODE_LIMIT {
        return Err(BotError::InvalidInput(
            "Duration cannot be longer than `6 hours`!".into(),
        ));
    }

    u16::try_from(delta.num_seconds())
        .map_err(|_| BotError::InvalidInput("Duration cannot be longer than `6 hours`!".into()))
}

async fn apply_slowmode(
    ctx: Context<'_>,
    duration: &str,
    channel: Option<serenity::GuildChannel>,
) -> Result<serenity::CreateEmbed, BotError> {
    let delta = resolve_from_now(duration)
        .await
        .delta()
        .map_err(|e| BotError::InvalidInput(e.to_string()))?;
    let seconds = slowmode_seconds(delta)?;
    let channel = resolve_channel(ctx, channel).await?;

    channel
        .id
        .edit(ctx, serenity::EditChannel::new().rate_limit_per_user(seconds))
        .await?;

    tracing::info!("{} set slowmode of {} to {}s", ctx.author().name, channel.id, seconds);

    Ok(embed::moderation(
        "Slowmode",
        format!(
            "Set slowmode for **{}** to `{}`",
            channel.name,
            human_readable(delta)
        ),
    ))
}

/// Enable slowmode for channel
#[poise::command(
    slash_command,
    guild_only,
    rename = "enable",
    required_permissions = "MANAGE_CHANNELS",
    required_bot_permissions = "MANAGE_CHANNELS"
)]
pub async fn slowmode_enable(
    ctx: Context<'_>,
    #[description = "Duration of slowmode"] duration: String,
    #[description = "Channel to enable slowmode"]
    #[channel_types("Text")]
    channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    let result = apply_slowmode(ctx, &duration, channel).await;
    finish(ctx, "Slowmode", GRAY_EMBED, result).await
}

async fn clear_slowmode(
    ctx: Context<'_>,
    channel: Option<serenity::GuildChannel>,
) -> Result<serenity::CreateEmbed, BotError> {
    let channel = resolve_channel(ctx, channel).await?;

    channel
        .id
        .edit(ctx, serenity::EditChannel::new().rate_limit_per_user(0))
        .await?;

    Ok(embed::moderation(
        "Slowmode",
        format!("Removed slowmode from **{}**", channel.name),
    ))
}

/// Disable slowmode from channel
#[poise::command(
    slash_command,
    guild_only,
    rename = "disable",
    required_permissions = "MANAGE_CHANNELS",
    required_bot_permissions = "MANAGE_CHANNELS"
)]
pub async fn slowmode_disable(
    ctx: Context<'_>,
    #[description = "Channel to disable slowmode"]
    #[channel_types("Text")]
    channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    let result = clear_slowmode(ctx, channel).await;
    finish(ctx, "Slowmode", GRAY_EMBED, result).await
}

/// Timeout member
#[poise::command(slash_command, guild_only, subcommands("timeout_set", "timeout_remove"), subcommand_required)]
pub async fn timeout(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

async fn apply_timeout(
    ctx: Context<'_>,
    member: &serenity::Member,
    duration: &str,
    reason: &Option<String>,
) -> Result<serenity::CreateEmbed, BotError> {
    let parsed = resolve_from_now(duration).await;
    let until = parsed
        .instant()
        .map_err(|e| BotError::InvalidInput(e.to_string()))?;

    if until - parsed.anchor() > TIMEOUT_LIMIT {
        return Err(BotError::InvalidInput(
            "Duration cannot be longer than `28 days`!".into(),
        ));
    }

    let mut edit = serenity::EditMember::new().disable_communication_until(until.to_rfc3339());
    if let Some(reason) = reason {
        edit = edit.audit_log_reason(reason);
    }
    member.guild_id.edit_member(ctx, member.user.id, edit).await?;

    tracing::info!("{} timed out {} until {}", ctx.author().name, member.user.id, until);

    Ok(embed::moderation(
        "Timeout",
        format!(
            "Timed out **{}** until {}\nReason: `{}`",
            member.user.tag(),
            embed::full_time(until.timestamp()),
            reason_text(reason)
        ),
    ))
}

/// Set timeout for member
#[poise::command(
    slash_command,
    guild_only,
    rename = "set",
    required_permissions = "MODERATE_MEMBERS",
    required_bot_permissions = "MODERATE_MEMBERS"
)]
pub async fn timeout_set(
    ctx: Context<'_>,
    #[description = "Member to timeout"] member: serenity::Member,
    #[description = "Duration of the timeout"] duration: String,
    #[description = "Reason for timeout"] reason: Option<String>,
) -> Result<(), Error> {
    let result = apply_timeout(ctx, &member, &duration, &reason).await;
    finish(ctx, "Timeout", GRAY_EMBED, result).await
}

async fn clear_timeout(
    ctx: Context<'_>,
    member: &serenity::Member,
) -> Result<serenity::CreateEmbed, BotError> {
    let timed_out = member
        .communication_disabled_until
        .is_some_and(|until| until.unix_timestamp() > Utc::now().timestamp());
    if !timed_out {
        return Err(BotError::NotFound(
            "You cannot remove timeout from member that is not timed out!".into(),
        ));
    }

    member
        .guild_id
        .edit_member(ctx, member.user.id, serenity::EditMember::new().enable_communication())
        .await?;

    Ok(embed::moderation(
        "Timeout",
        format!("Removed timeout from **{}**", member.user.tag()),
    ))
}

/// Remove timeout from member
#[poise::command(
    slash_command,
    guild_only,
    rename = "remove",
    required_permissions = "MODERATE_MEMBERS",
    required_bot_permissions = "MODERATE_MEMBERS"
)]
pub async fn timeout_remove(
    ctx: Context<'_>,
    #[description = "Member to remove timeout"] member: serenity::Member,
) -> Result<(), Error> {
    let result = clear_timeout(ctx, &member).await;
    finish(ctx, "Timeout", GRAY_EMBED, result).await
}

fn matching_bans(bans: &[serenity::Ban], partial: &str) -> Vec<serenity::AutocompleteChoice> {
    let partial = partial.to_lowercase();

    bans.iter()
        .filter(|ban| ban.user.tag().to_lowercase().contains(&partial))
        .take(AUTOCOMPLETE_LIMIT)
        .map(|ban| serenity::AutocompleteChoice::new(ban.user.tag(), ban.user.id.to_string()))
        .collect()
}

async fn autocomplete_banned(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    let Some(guild_id) = ctx.guild_id() else {
        return Vec::new();
    };

    match guild_id.bans(ctx, None, None).await {
        Ok(bans) => matching_bans(&bans, partial),
        Err(e) => {
            tracing::warn!("Failed to fetch bans for {}: {}", guild_id, e);
            Vec::new()
        }
    }
}

fn is_not_found(error: &serenity::Error) -> bool {
    match error {
        serenity::Error::Http(http_error) => {
            http_error.status_code().map(|code| code.as_u16()) == Some(404)
        }
        _ => false,
    }
}

async fn lift_ban(ctx: Context<'_>, user: &str) -> Result<serenity::CreateEmbed, BotError> {
    let guild_id = ctx
        .guild_id()
        .ok_or_else(|| BotError::NotFound("This command was not invoked in a guild!".into()))?;
    let user_id = user
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(serenity::UserId::new)
        .ok_or_else(|| BotError::InvalidInput("Unable to find the specified user!".into()))?;

    let target = user_id.to_user(ctx).await?;

    match guild_id.unban(ctx, user_id).await {
        Ok(()) => {}
        Err(e) if is_not_found(&e) => {
            return Err(BotError::NotFound(
                "Unable to unban user that is not banned!".into(),
            ))
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!("{} unbanned {} in {}", ctx.author().name, user_id, guild_id);

    Ok(embed::moderation("Unban", format!("Unbanned **{}**", target.tag())))
}

/// Unban user from server
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "BAN_MEMBERS",
    required_bot_permissions = "BAN_MEMBERS"
)]
pub async fn unban(
    ctx: Context<'_>,
    #[description = "User to unban"]
    #[autocomplete = "autocomplete_banned"]
    user: String,
) -> Result<(), Error> {
    let result = lift_ban(ctx, &user).await;
    finish(ctx, "Unban", GRAY_EMBED, result).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_mentions_age_limit_when_short() {
        assert_eq!(deletion_summary(5, 5), "`5 messages` deleted");
        assert_eq!(deletion_summary(1, 1), "`1 message` deleted");
        assert_eq!(
            deletion_summary(3, 10),
            "`3 messages` deleted\nOlder messages past `14 days` cannot be deleted"
        );
    }

    #[test]
    fn slowmode_limit() {
        assert_eq!(slowmode_seconds(TimeDelta::seconds(30)).unwrap(), 30);
        assert_eq!(slowmode_seconds(TimeDelta::hours(6)).unwrap(), 21_600);
        assert!(matches!(
            slowmode_seconds(TimeDelta::hours(6) + TimeDelta::seconds(1)),
            Err(BotError::InvalidInput(_))
        ));
    }

    #[test]
    fn reason_defaults() {
        assert_eq!(reason_text(&None), "No reason provided");
        assert_eq!(reason_text(&Some("spam".into())), "spam");
    }
}
