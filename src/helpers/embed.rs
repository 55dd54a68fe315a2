use poise::serenity_prelude as serenity;

pub const BLURPLE: u32 = 0x5865F2;
pub const DARK_EMBED: u32 = 0x2B2D31;
pub const GRAY_EMBED: u32 = 0x36393F;
pub const BACKGROUND_SECONDARY: u32 = 0x2F3136;

/// Default embed for info and utility commands.
pub fn embed(title: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::default().title(title).color(BLURPLE)
}

pub fn fun(title: impl Into<String>, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::default()
        .title(title)
        .description(description)
        .color(DARK_EMBED)
}

pub fn moderation(title: impl Into<String>, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::default()
        .title(title)
        .description(description)
        .color(GRAY_EMBED)
}

pub fn error(description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::default()
        .title("Error")
        .description(description)
        .color(BACKGROUND_SECONDARY)
}

/// Discord relative timestamp markup, e.g. "3 hours ago".
pub fn relative_time(unix_seconds: i64) -> String {
    format!("<t:{}:R>", unix_seconds)
}

pub fn full_time(unix_seconds: i64) -> String {
    format!("<t:{}:F>", unix_seconds)
}

pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_markup() {
        assert_eq!(relative_time(1_700_000_000), "<t:1700000000:R>");
        assert_eq!(full_time(42), "<t:42:F>");
    }

    #[test]
    fn pluralisation() {
        assert_eq!(plural(1, "message"), "1 message");
        assert_eq!(plural(0, "message"), "0 messages");
        assert_eq!(plural(12, "message"), "12 messages");
    }
}
