pub(crate) use crate::types::{Context, Data, Error};

use poise::CreateReply;

use crate::helpers::embed;
use crate::helpers::links::UrlVerdict;
use crate::structs::validated_url::ValidatedUrl;

const MALFORMED_URL: &str = "Provided URL is malformed!\nPlease check if complies with \
     [DNS](https://en.wikipedia.org/wiki/Domain_Name_System) structure";

pub fn all_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        magykmod(),
    ]
}

/// Scripty MagykMod moderation
#[poise::command(slash_command, subcommands("analyze"), subcommand_required)]
pub async fn magykmod(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Analysis subcomponents for MagykMod
#[poise::command(slash_command, subcommands("analyze_url"), subcommand_required)]
pub async fn analyze(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

fn verdict_embed(url: &ValidatedUrl, verdict: &UrlVerdict) -> poise::serenity_prelude::CreateEmbed {
    embed::embed("Analyze")
        .description(&url.original)
        .field("Fraudulent", verdict.is_fraudulent.to_string(), true)
        .field("Information", &verdict.message, true)
}

/// Analyze URL input for scams
#[poise::command(slash_command, rename = "url")]
pub async fn analyze_url(
    ctx: Context<'_>,
    #[description = "URL to analyze"] url: String,
) -> Result<(), Error> {
    let url = ValidatedUrl::new(url.trim());

    let Some(encoded) = url.encoded.as_deref() else {
        ctx.send(CreateReply::default().embed(embed::embed("Analyze Error").description(MALFORMED_URL)))
            .await?;
        return Ok(());
    };

    let verdict = match ctx.data().links.get_url(encoded).await {
        Ok(verdict) => verdict,
        Err(e) => {
            ctx.send(CreateReply::default().embed(
                embed::embed("Analyze Error").description("An error occurred while analyzing the URL"),
            ))
            .await?;
            return Err(e.into());
        }
    };

    tracing::debug!("{} analyzed as fraudulent={}", url.original, verdict.is_fraudulent);

    ctx.send(CreateReply::default().embed(verdict_embed(&url, &verdict)))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_message_links_dns() {
        assert!(MALFORMED_URL.starts_with("Provided URL is malformed!\n"));
        assert!(MALFORMED_URL.contains("[DNS](https://en.wikipedia.org/wiki/Domain_Name_System)"));
    }

    #[test]
    fn verdict_fields() {
        let url = ValidatedUrl::new("https://example.com");
        let verdict = UrlVerdict {
            is_fraudulent: false,
            message: "Clean".into(),
        };

        let json = serde_json::to_value(verdict_embed(&url, &verdict)).unwrap();
        assert_eq!(json["title"], "Analyze");
        assert_eq!(json["description"], "https://example.com");
        assert_eq!(json["fields"][0]["name"], "Fraudulent");
        assert_eq!(json["fields"][0]["value"], "false");
        assert_eq!(json["fields"][1]["value"], "Clean");
    }
}
