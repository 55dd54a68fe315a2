pub(crate) use crate::types::{Context, Data, Error};

use poise::serenity_prelude as serenity;
use poise::CreateReply;

use crate::error::{permission_names, BotError};
use crate::helpers::embed::{self, relative_time, BLURPLE};
use crate::helpers::reply::finish;
use crate::helpers::system::SystemSnapshot;

const NOT_IN_GUILD: &str = "`Not in Guild`";
const LIBRARY: &str = "poise 0.6 / serenity 0.12";

pub fn all_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        stats(),
        info(),
    ]
}

/// Statistics related to Scripty
#[poise::command(slash_command, subcommands("stats_about", "stats_ping", "stats_system"), subcommand_required)]
pub async fn stats(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

fn bot_author(ctx: Context<'_>) -> serenity::CreateEmbedAuthor {
    let me = ctx.cache().current_user();
    serenity::CreateEmbedAuthor::new(me.name.clone()).icon_url(me.face())
}

fn developers() -> String {
    env!("CARGO_PKG_AUTHORS")
        .split(':')
        .filter(|name| !name.is_empty())
        .map(|name| format!("`{}`", name))
        .collect::<Vec<_>>()
        .join(" ")
}

/// About the Scripty Discord bot
#[poise::command(slash_command, rename = "about")]
pub async fn stats_about(ctx: Context<'_>) -> Result<(), Error> {
    let guilds = ctx.cache().guild_count();

    let embed = embed::embed("About")
        .author(bot_author(ctx))
        .field("Version", format!("Scripty {}", env!("CARGO_PKG_VERSION")), true)
        .field("Language", "Rust", true)
        .field("Library", LIBRARY, true)
        .field("Repository", format!("[GitHub]({})", env!("CARGO_PKG_REPOSITORY")), true)
        .field("Guilds", guilds.to_string(), true)
        .field("Developers", developers(), true);

    let mut reply = CreateReply::default().embed(embed);
    if let Some(invite) = &ctx.data().config.invite_url {
        reply = reply.components(vec![serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new_link(invite).label("Add Scripty to Server"),
        ])]);
    }

    ctx.send(reply).await?;
    Ok(())
}

/// Replies with bot latency
#[poise::command(slash_command, rename = "ping")]
pub async fn stats_ping(ctx: Context<'_>) -> Result<(), Error> {
    let latency = ctx.ping().await;

    let embed = embed::embed("Ping").description(format!("Pong! `{}ms`", latency.as_millis()));
    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Bot system information
#[poise::command(slash_command, rename = "system")]
pub async fn stats_system(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let snapshot = SystemSnapshot::capture(&mut data.system.lock());

    let embed = embed::embed("System")
        .author(bot_author(ctx))
        .field("System", &snapshot.system, true)
        .field("Platform", &snapshot.platform, true)
        .field("Machine", &snapshot.machine, true)
        .field("Processor", &snapshot.processor, true)
        .field("CPU", snapshot.cpu(), true)
        .field("Memory", snapshot.memory(), true)
        .field("Host", format!("Booted {}", relative_time(snapshot.boot_time as i64)), true)
        .field(
            "Process",
            format!("Online {}", relative_time(data.started_at.timestamp())),
            true,
        );

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Get information
#[poise::command(
    slash_command,
    subcommands("info_user", "info_server", "info_role", "info_channel", "info_invite"),
    subcommand_required
)]
pub async fn info(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Permission names wrapped in code spans, e.g. "`KICK_MEMBERS` `BAN_MEMBERS`".
fn permission_list(permissions: serenity::Permissions) -> String {
    permission_names(permissions)
        .split(", ")
        .map(|name| format!("`{}`", name))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Get information about user
#[poise::command(slash_command, rename = "user")]
pub async fn info_user(
    ctx: Context<'_>,
    #[description = "The user to get information about"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let user = user.unwrap_or_else(|| ctx.author().clone());

    let member = match ctx.guild_id() {
        Some(guild_id) => guild_id.member(ctx, user.id).await.ok(),
        None => None,
    };
    let permissions = member.as_ref().and_then(|member| {
        ctx.guild()
            .map(|guild| guild.member_permissions(member))
    });

    let discriminator = user
        .discriminator
        .map(|d| format!("{:04}", d.get()))
        .unwrap_or_else(|| "0".to_string());

    let mut embed = embed::embed("Info")
        .author(serenity::CreateEmbedAuthor::new(user.tag()).icon_url(user.face()))
        .field("Name", &user.name, true)
        .field("Discriminator", discriminator, true)
        .field("ID", user.id.to_string(), true)
        .field("Created", relative_time(user.id.created_at().unix_timestamp()), true)
        .thumbnail(user.face());

    embed = match &member {
        Some(member) => {
            let roles = member
                .roles
                .iter()
                .map(|role| format!("<@&{}>", role))
                .collect::<Vec<_>>()
                .join(" ");

            embed
                .field(
                    "Joined",
                    member
                        .joined_at
                        .map(|joined| relative_time(joined.unix_timestamp()))
                        .unwrap_or_else(|| NOT_IN_GUILD.to_string()),
                    true,
                )
                .field("Nickname", member.nick.clone().unwrap_or_else(|| "None".to_string()), true)
                .field("Roles", if roles.is_empty() { "None".to_string() } else { roles }, false)
                .field(
                    "Permissions",
                    permissions.map(permission_list).unwrap_or_else(|| NOT_IN_GUILD.to_string()),
                    false,
                )
        }
        None => embed
            .field("Joined", NOT_IN_GUILD, true)
            .field("Nickname", NOT_IN_GUILD, true)
            .field("Roles", NOT_IN_GUILD, false)
            .field("Permissions", NOT_IN_GUILD, false),
    };

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

async fn describe_server(ctx: Context<'_>) -> Result<serenity::CreateEmbed, BotError> {
    let guild_id = ctx
        .guild_id()
        .ok_or_else(|| BotError::NotFound("This command was not invoked in a guild!".into()))?;

    let guild = guild_id.to_partial_guild_with_counts(ctx).await?;
    let channels = guild_id.channels(ctx).await?;
    let owner = guild.owner_id.to_user(ctx).await?;

    let members = format!(
        "{}/{}",
        guild.approximate_presence_count.unwrap_or_default(),
        guild.approximate_member_count.unwrap_or_default()
    );

    let mut embed = embed::embed("Info")
        .field("Name", &guild.name, true)
        .field("ID", guild.id.to_string(), true)
        .field("Owner", owner.tag(), true)
        .field("Created", relative_time(guild.id.created_at().unix_timestamp()), true)
        .field("Members", members, true)
        .field("Channels", channels.len().to_string(), true)
        .field("Roles", guild.roles.len().to_string(), true)
        .field("Emoji", guild.emojis.len().to_string(), true)
        .field("Region", &guild.preferred_locale, true)
        .field(
            "Premium Boosts",
            guild.premium_subscription_count.unwrap_or_default().to_string(),
            true,
        )
        .field("Premium Tier", format!("{:?}", guild.premium_tier), true)
        .field("Verification Level", format!("{:?}", guild.verification_level), true);

    if let Some(icon) = guild.icon_url() {
        embed = embed.thumbnail(icon);
    }

    Ok(embed)
}

/// Get information about server
#[poise::command(slash_command, rename = "server")]
pub async fn info_server(ctx: Context<'_>) -> Result<(), Error> {
    let result = describe_server(ctx).await;
    finish(ctx, "Info", BLURPLE, result).await
}

/// Get information about role
#[poise::command(slash_command, guild_only, rename = "role")]
pub async fn info_role(
    ctx: Context<'_>,
    #[description = "The role to get information about"] role: serenity::Role,
) -> Result<(), Error> {
    let embed = embed::embed("Info")
        .field("Name", &role.name, true)
        .field("ID", role.id.to_string(), true)
        .field("Created", relative_time(role.id.created_at().unix_timestamp()), true)
        .field("Color", format!("#{}", role.colour.hex()), true)
        .field("Position", role.position.to_string(), true)
        .field("Mentionable", role.mentionable.to_string(), true)
        .field("Hoisted", role.hoist.to_string(), true)
        .field("Managed", role.managed.to_string(), true)
        .field("Permissions", permission_list(role.permissions), false);

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

async fn describe_channel(
    ctx: Context<'_>,
    channel: Option<serenity::GuildChannel>,
) -> Result<serenity::CreateEmbed, BotError> {
    let channel = match channel {
        Some(channel) => channel,
        None => ctx.guild_channel().await.ok_or_else(|| {
            BotError::NotFound("This command must be invoked in a valid textable guild channel!".into())
        })?,
    };

    Ok(embed::embed("Info")
        .field("Name", &channel.name, true)
        .field("ID", channel.id.to_string(), true)
        .field("Created", relative_time(channel.id.created_at().unix_timestamp()), true)
        .field("Type", channel.kind.name(), true))
}

/// Get information about channel
#[poise::command(slash_command, rename = "channel")]
pub async fn info_channel(
    ctx: Context<'_>,
    #[description = "The channel to get information about"] channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    let result = describe_channel(ctx, channel).await;
    finish(ctx, "Info", BLURPLE, result).await
}

/// Invites only carry the id of their target user.
fn target_mention(target: Option<serenity::UserId>) -> String {
    target
        .map(|id| format!("<@{}>", id))
        .unwrap_or_else(|| "None".to_string())
}

/// Accepts a bare code or any invite link and returns the code.
fn invite_code(input: &str) -> &str {
    input
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}

async fn describe_invite(ctx: Context<'_>, invite: &str) -> Result<serenity::CreateEmbed, BotError> {
    let code = invite_code(invite);
    if code.is_empty() {
        return Err(BotError::InvalidInput("Provided invite is empty!".into()));
    }

    let invite = serenity::Invite::get(ctx, code, false, true, None)
        .await
        .map_err(|e| {
            tracing::debug!("Invite lookup for {} failed: {}", code, e);
            BotError::NotFound("Unable to find the specified invite!".into())
        })?;

    let none = || "None".to_string();

    Ok(embed::embed("Info")
        .field("Code", &invite.code, true)
        .field("Inviter", invite.inviter.as_ref().map(|user| user.tag()).unwrap_or_else(none), true)
        .field("Target", target_mention(invite.target_user), true)
        .field("Guild", invite.guild.as_ref().map(|guild| guild.name.clone()).unwrap_or_else(none), true)
        .field("Channel", &invite.channel.name, true)
        .field(
            "Expire",
            invite
                .expires_at
                .map(|expires| relative_time(expires.unix_timestamp()))
                .unwrap_or_else(none),
            true,
        ))
}

/// Get information about invite
#[poise::command(slash_command, rename = "invite")]
pub async fn info_invite(
    ctx: Context<'_>,
    #[description = "The invite to get information about"] invite: String,
) -> Result<(), Error> {
    let result = describe_invite(ctx, &invite).await;
    finish(ctx, "Info", BLURPLE, result).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_links_reduce_to_code() {
        assert_eq!(invite_code("abc123"), "abc123");
        assert_eq!(invite_code("https://discord.gg/abc123"), "abc123");
        assert_eq!(invite_code(" discord.com/invite/abc123/ "), "abc123");
        assert_eq!(invite_code("   "), "");
    }

    #[test]
    fn invite_target_is_a_mention() {
        assert_eq!(target_mention(Some(serenity::UserId::new(42))), "<@42>");
        assert_eq!(target_mention(None), "None");
    }

    #[test]
    fn permissions_render_as_code_spans() {
        let list = permission_list(serenity::Permissions::KICK_MEMBERS);
        assert_eq!(list, "`KICK_MEMBERS`");
        assert_eq!(permission_list(serenity::Permissions::empty()), "`UNKNOWN`");
    }

    #[test]
    fn developers_are_listed() {
        assert!(developers().starts_with('`'));
    }
}
