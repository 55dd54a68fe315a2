pub(crate) use crate::types::{Context, Data, Error};

use chrono::Utc;
use poise::serenity_prelude as serenity;
use poise::CreateReply;
use rand::seq::IndexedRandom;
use rand::{rng, Rng};

use crate::helpers::embed::{self, DARK_EMBED};
use crate::helpers::reddit::{fetch_memes, Submission};
use crate::helpers::views::{self, Button, Control, View};
use crate::structs::rps::Hand;
use crate::structs::session::{Direction, InteractiveSession, SESSION_TIMEOUT};

pub fn all_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        coin(),
        dice(),
        meme(),
        rickroll(),
        rps(),
    ]
}

/// Flip a coin
#[poise::command(slash_command)]
pub async fn coin(ctx: Context<'_>) -> Result<(), Error> {
    let side = ["Heads", "Tails"].choose(&mut rng()).copied().unwrap_or("Heads");

    ctx.send(CreateReply::default().embed(embed::fun("Coin", side)))
        .await?;
    Ok(())
}

/// Roll a die
#[poise::command(slash_command)]
pub async fn dice(
    ctx: Context<'_>,
    #[description = "Number of sides on the die"]
    #[min = 2]
    sides: Option<u32>,
) -> Result<(), Error> {
    let sides = sides.unwrap_or(6).max(2);
    let roll = rng().random_range(1..=sides);

    ctx.send(CreateReply::default().embed(embed::fun("Dice", roll.to_string())))
        .await?;
    Ok(())
}

struct MemeView;

impl View for MemeView {
    type Item = Submission;
    type Choice = ();

    fn buttons(&self) -> Vec<Button<()>> {
        vec![
            Button::new("Previous", serenity::ButtonStyle::Primary, Control::Navigate(Direction::Previous)),
            Button::new("Stop", serenity::ButtonStyle::Danger, Control::Stop),
            Button::new("Next", serenity::ButtonStyle::Primary, Control::Navigate(Direction::Next)),
        ]
    }

    fn render(&self, submission: &Submission) -> serenity::CreateEmbed {
        serenity::CreateEmbed::default()
            .title(&submission.title)
            .url(submission.link())
            .image(&submission.url)
            .color(DARK_EMBED)
    }
}

/// The hottest Reddit r/memes
#[poise::command(slash_command)]
pub async fn meme(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();

    let submissions = match fetch_memes(&data.http, &data.config.user_agent).await {
        Ok(submissions) => submissions,
        Err(e) => {
            ctx.send(CreateReply::default().embed(embed::fun(
                "Meme Error",
                "Unable to fetch memes right now!",
            )))
            .await?;
            return Err(e.into());
        }
    };

    if submissions.is_empty() {
        ctx.send(CreateReply::default().embed(embed::fun("Meme Error", "No memes found!")))
            .await?;
        return Ok(());
    }

    let session = InteractiveSession::new(submissions, SESSION_TIMEOUT, ctx.author().id, Utc::now())?;
    views::run(ctx, &MemeView, session).await
}

/// ;)
#[poise::command(slash_command)]
pub async fn rickroll(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("https://youtu.be/dQw4w9WgXcQ").await?;
    Ok(())
}

struct RpsView;

impl View for RpsView {
    // the computer's hand
    type Item = Hand;
    type Choice = Hand;

    fn buttons(&self) -> Vec<Button<Hand>> {
        vec![
            Button::new("Rock", serenity::ButtonStyle::Danger, Control::Choose(Hand::Rock)),
            Button::new("Paper", serenity::ButtonStyle::Success, Control::Choose(Hand::Paper)),
            Button::new("Scissors", serenity::ButtonStyle::Primary, Control::Choose(Hand::Scissors)),
        ]
    }

    fn render(&self, _computer: &Hand) -> serenity::CreateEmbed {
        embed::fun("RPS", "Click on the button options to continue the game!")
    }

    fn conclude(&self, computer: &Hand, player: Hand) -> serenity::CreateEmbed {
        embed::fun("RPS", player.describe(*computer))
    }
}

/// Play rock paper scissors
#[poise::command(slash_command)]
pub async fn rps(ctx: Context<'_>) -> Result<(), Error> {
    let computer = Hand::random(&mut rng());

    let session = InteractiveSession::new(vec![computer], SESSION_TIMEOUT, ctx.author().id, Utc::now())?;
    views::run(ctx, &RpsView, session).await
}
