pub(crate) use crate::types::{Context, Data, Error};

use poise::serenity_prelude as serenity;
use poise::CreateReply;

use crate::helpers::embed;

pub fn all_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        avatar(),
        echo(),
        poll(),
    ]
}

/// Retrieves user avatar
#[poise::command(context_menu_command = "Avatar")]
pub async fn avatar(
    ctx: Context<'_>,
    user: serenity::User,
) -> Result<(), Error> {
    let embed = embed::embed("Avatar")
        .author(serenity::CreateEmbedAuthor::new(user.tag()).icon_url(user.face()))
        .image(user.face());

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Repeats user input
#[poise::command(slash_command)]
pub async fn echo(
    ctx: Context<'_>,
    #[description = "Text to repeat"] text: String,
) -> Result<(), Error> {
    let embed = embed::embed("Echo")
        .description(format!("<@{}> said: ```{}```", ctx.author().id, text));

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Regional indicator A onwards, one per poll option.
fn poll_options(options: Vec<Option<String>>) -> Vec<(char, String)> {
    ('\u{1F1E6}'..='\u{1F1EF}')
        .zip(options)
        .filter_map(|(emoji, option)| option.map(|option| (emoji, option)))
        .collect()
}

fn poll_description(options: &[(char, String)]) -> String {
    options
        .iter()
        .map(|(emoji, option)| format!("{} {}", emoji, option))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Creates a simple poll
#[allow(clippy::too_many_arguments)]
#[poise::command(slash_command)]
pub async fn poll(
    ctx: Context<'_>,
    #[description = "Topic of the poll"] topic: String,
    #[description = "Option A"] option_a: String,
    #[description = "Option B"] option_b: String,
    #[description = "Option C"] option_c: Option<String>,
    #[description = "Option D"] option_d: Option<String>,
    #[description = "Option E"] option_e: Option<String>,
    #[description = "Option F"] option_f: Option<String>,
    #[description = "Option G"] option_g: Option<String>,
    #[description = "Option H"] option_h: Option<String>,
    #[description = "Option I"] option_i: Option<String>,
    #[description = "Option J"] option_j: Option<String>,
) -> Result<(), Error> {
    let options = poll_options(vec![
        Some(option_a),
        Some(option_b),
        option_c,
        option_d,
        option_e,
        option_f,
        option_g,
        option_h,
        option_i,
        option_j,
    ]);

    let author = ctx.author();
    let embed = embed::embed(topic)
        .description(poll_description(&options))
        .author(serenity::CreateEmbedAuthor::new(author.tag()).icon_url(author.face()));

    let message = ctx
        .send(CreateReply::default().embed(embed))
        .await?
        .into_message()
        .await?;

    for (emoji, _) in &options {
        message
            .react(ctx, serenity::ReactionType::Unicode(emoji.to_string()))
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_options_keep_their_letter() {
        let options = poll_options(vec![
            Some("Tea".into()),
            Some("Coffee".into()),
            None,
            Some("Water".into()),
        ]);

        assert_eq!(
            options,
            vec![
                ('\u{1F1E6}', "Tea".to_string()),
                ('\u{1F1E7}', "Coffee".to_string()),
                ('\u{1F1E9}', "Water".to_string()),
            ]
        );
        assert_eq!(
            poll_description(&options),
            "\u{1F1E6} Tea\n\n\u{1F1E7} Coffee\n\n\u{1F1E9} Water"
        );
    }

    #[test]
    fn at_most_ten_options() {
        let options = poll_options((0..12).map(|i| Some(i.to_string())).collect());
        assert_eq!(options.len(), 10);
        assert_eq!(options[9].0, '\u{1F1EF}');
    }
}
