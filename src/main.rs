use poise::serenity_prelude as serenity;
use poise::CreateReply;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;
mod helpers;

mod types;
mod structs;
use types::{Context, Data, Error};

use crate::commands::all_commands;
use crate::config::Config;
use crate::error::{permission_names, BotError, ErrorReport};
use crate::helpers::embed;

async fn report(ctx: Context<'_>, kind: ErrorReport) {
    let reply = CreateReply::default()
        .embed(embed::error(kind.description()))
        .ephemeral(true);

    if let Err(e) = ctx.send(reply).await {
        tracing::warn!("Failed to send error report for `{}`: {}", ctx.command().qualified_name, e);
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!("Failed to start bot: {}", error);
        }
        poise::FrameworkError::MissingBotPermissions { missing_permissions, ctx, .. } => {
            tracing::info!(
                "Bot missing {:?} for `{}`",
                missing_permissions,
                ctx.command().qualified_name
            );
            report(ctx, ErrorReport::BotMissingPermissions(permission_names(missing_permissions))).await;
        }
        poise::FrameworkError::MissingUserPermissions { missing_permissions, ctx, .. } => {
            let permissions = missing_permissions
                .map(permission_names)
                .unwrap_or_else(|| "UNKNOWN".to_string());

            tracing::info!(
                "Command permissions failed: `{}` ran by {} ({})",
                ctx.command().qualified_name,
                ctx.author().name,
                permissions
            );
            report(ctx, ErrorReport::UserMissingPermissions(permissions)).await;
        }
        poise::FrameworkError::GuildOnly { ctx, .. } => {
            report(ctx, ErrorReport::GuildOnly).await;
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Command failed: `{}`: {}", ctx.command().qualified_name, error);

            let reported = error
                .downcast_ref::<BotError>()
                .is_some_and(BotError::is_reported);
            if !reported {
                report(ctx, ErrorReport::Failed(error.to_string())).await;
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scripty=info,warn")),
        )
        .init();

    let config = Config::from_env()?;
    let token = config.discord_token.clone();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            pre_command: |ctx| {
                Box::pin(async move {
                    tracing::info!(
                        "{} invoked `{}` in {:?}",
                        ctx.author().name,
                        ctx.command().qualified_name,
                        ctx.guild_id()
                    );
                })
            },
            on_error: |error| Box::pin(on_error(error)),
            post_command: |ctx| {
                Box::pin(async move {
                    tracing::debug!("Command {} ran", ctx.command().qualified_name);
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("Logged in as {}", ready.user.name);

                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("Registered {} commands", framework.options().commands.len());

                Ok(Data::new(config))
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutting down");
        shard_manager.shutdown_all().await;
    });

    client.start().await?;

    Ok(())
}
