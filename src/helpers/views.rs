use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use poise::futures_util::StreamExt;
use poise::CreateReply;

use crate::helpers::embed;
use crate::structs::session::{Controls, Direction, InteractiveSession};
use crate::types::{Context, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control<C> {
    Navigate(Direction),
    Stop,
    Choose(C),
}

#[derive(Debug, Clone, Copy)]
pub struct Button<C> {
    pub label: &'static str,
    pub style: serenity::ButtonStyle,
    pub control: Control<C>,
}

impl<C> Button<C> {
    pub fn new(label: &'static str, style: serenity::ButtonStyle, control: Control<C>) -> Self {
        Button {
            label,
            style,
            control,
        }
    }
}

/// What a button view shows for its session.
pub trait View: Send + Sync {
    type Item: Send + Sync;
    type Choice: Copy + Send + Sync;

    fn buttons(&self) -> Vec<Button<Self::Choice>>;

    fn render(&self, item: &Self::Item) -> serenity::CreateEmbed;

    /// First embed sent, before any button is pressed.
    fn intro(&self, item: &Self::Item) -> serenity::CreateEmbed {
        self.render(item)
    }

    fn conclude(&self, item: &Self::Item, _choice: Self::Choice) -> serenity::CreateEmbed {
        self.render(item)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ButtonLayout {
    custom_id: String,
    label: &'static str,
    style: serenity::ButtonStyle,
    disabled: bool,
}

fn layout<C>(ctx_id: u64, buttons: &[Button<C>], controls: Controls) -> Vec<ButtonLayout> {
    let disabled = controls != Controls::Enabled;

    let mut row: Vec<ButtonLayout> = buttons
        .iter()
        .enumerate()
        .map(|(index, button)| ButtonLayout {
            custom_id: format!("{}:{}", ctx_id, index),
            label: button.label,
            style: button.style,
            disabled,
        })
        .collect();

    if controls == Controls::TimedOut {
        row.push(ButtonLayout {
            custom_id: format!("{}:timeout", ctx_id),
            label: "Timed out",
            style: serenity::ButtonStyle::Secondary,
            disabled: true,
        });
    }

    row
}

fn components<C>(ctx_id: u64, buttons: &[Button<C>], controls: Controls) -> Vec<serenity::CreateActionRow> {
    let row = layout(ctx_id, buttons, controls)
        .into_iter()
        .map(|button| {
            serenity::CreateButton::new(button.custom_id)
                .label(button.label)
                .style(button.style)
                .disabled(button.disabled)
        })
        .collect();

    vec![serenity::CreateActionRow::Buttons(row)]
}

fn pressed_index(prefix: &str, custom_id: &str) -> Option<usize> {
    custom_id.strip_prefix(prefix)?.parse().ok()
}

/// How long the session's single collector stays open. Zero once the
/// deadline has passed.
fn collector_window(deadline: DateTime<Utc>, now: DateTime<Utc>) -> std::time::Duration {
    (deadline - now).to_std().unwrap_or_default()
}

/// Final state of a timed out view: the current render with the timed out
/// controls. Edits replace every embed, so the render has to be resent.
fn timed_out_reply<V: View>(
    view: &V,
    session: &InteractiveSession<V::Item>,
    ctx_id: u64,
    buttons: &[Button<V::Choice>],
) -> CreateReply {
    CreateReply::default()
        .embed(view.render(session.current()))
        .components(components(ctx_id, buttons, session.controls()))
}

/// Sends the view and drives its session until the deadline.
///
/// One collector listens for the whole lifetime of the session and presses
/// are handled in arrival order. Presses that arrive after the session
/// concluded still get an ephemeral notice. When the deadline passes on an
/// active session, the message is edited once more to show the timed out
/// controls.
pub async fn run<V: View>(
    ctx: Context<'_>,
    view: &V,
    mut session: InteractiveSession<V::Item>,
) -> Result<(), Error> {
    let ctx_id = ctx.id();
    let prefix = format!("{}:", ctx_id);
    let buttons = view.buttons();

    let reply = CreateReply::default()
        .embed(view.intro(session.current()))
        .components(components(ctx_id, &buttons, session.controls()));
    let handle = ctx.send(reply).await?;

    tracing::debug!(
        "Session {} opened for {} with {} item(s)",
        ctx_id,
        session.owner(),
        session.len()
    );

    let remaining = collector_window(session.deadline(), Utc::now());
    let filter_prefix = prefix.clone();
    let mut presses = Box::pin(
        serenity::ComponentInteractionCollector::new(ctx)
            .filter(move |press| press.data.custom_id.starts_with(&filter_prefix))
            .timeout(remaining)
            .stream(),
    );

    while let Some(press) = presses.next().await {
        if session.tick(Utc::now()) {
            tracing::debug!("Session {} timed out while a press was in flight", ctx_id);
            let update = serenity::CreateInteractionResponseMessage::new()
                .embed(view.render(session.current()))
                .components(components(ctx_id, &buttons, session.controls()));
            press
                .create_response(
                    ctx.serenity_context(),
                    serenity::CreateInteractionResponse::UpdateMessage(update),
                )
                .await?;
            return Ok(());
        }

        let Some(button) = pressed_index(&prefix, &press.data.custom_id)
            .and_then(|index| buttons.get(index))
        else {
            continue;
        };

        let actor = press.user.id;
        let result = match button.control {
            Control::Navigate(direction) => session
                .navigate(actor, direction)
                .map(|item| view.render(item)),
            Control::Stop => session.stop(actor).map(|item| view.render(item)),
            Control::Choose(choice) => session.choose(actor, |item| view.conclude(item, choice)),
        };

        let response = match result {
            Ok(embed) => serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .components(components(ctx_id, &buttons, session.controls())),
            ),
            Err(rejection) => {
                tracing::debug!(
                    "Session {} rejected press by {} at cursor {}: {}",
                    ctx_id,
                    actor,
                    session.cursor(),
                    rejection
                );
                serenity::CreateInteractionResponse::Message(
                    serenity::CreateInteractionResponseMessage::new()
                        .embed(embed::error(rejection.to_string()))
                        .ephemeral(true),
                )
            }
        };

        press
            .create_response(ctx.serenity_context(), response)
            .await?;
    }

    // the collector only ends once the deadline has been reached
    let now = Utc::now().max(session.deadline());
    if session.tick(now) {
        tracing::debug!("Session {} timed out", ctx_id);
        handle
            .edit(ctx, timed_out_reply(view, &session, ctx_id, &buttons))
            .await?;
    }

    tracing::debug!("Session {} closed as {:?}", ctx_id, session.status());
    Ok(())
}
