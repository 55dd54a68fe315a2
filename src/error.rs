use poise::serenity_prelude as serenity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    /// Malformed user input. The message is shown to the user as-is.
    #[error("{0}")]
    InvalidInput(String),
    /// The target of an action does not exist or is not in the expected state.
    #[error("{0}")]
    NotFound(String),
    /// An external HTTP API failed. Already reported to the user by the
    /// command, surfaced again only for logging.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("discord request failed: {0}")]
    Discord(#[from] serenity::Error),
}

impl BotError {
    /// Whether the user has already been told about this failure.
    pub fn is_reported(&self) -> bool {
        matches!(self, BotError::Upstream(_))
    }
}

/// Title and description of the embed sent for a framework error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorReport {
    BotMissingPermissions(String),
    UserMissingPermissions(String),
    GuildOnly,
    Failed(String),
}

impl ErrorReport {
    pub fn description(&self) -> String {
        match self {
            ErrorReport::BotMissingPermissions(permissions) => {
                format!("Bot missing required `{}` permission!", permissions)
            }
            ErrorReport::UserMissingPermissions(permissions) => {
                format!("User missing required `{}` permission!", permissions)
            }
            ErrorReport::GuildOnly => "This command was not invoked in a guild!".to_string(),
            ErrorReport::Failed(reason) => {
                format!("This interaction failed! \n ```{}```", reason)
            }
        }
    }
}

/// Permission names the way Discord spells them, e.g. `BAN_MEMBERS`.
pub fn permission_names(permissions: serenity::Permissions) -> String {
    let names: Vec<String> = permissions
        .iter_names()
        .map(|(name, _)| name.to_string())
        .collect();

    if names.is_empty() {
        "UNKNOWN".to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_wording() {
        assert_eq!(
            ErrorReport::BotMissingPermissions("BAN_MEMBERS".into()).description(),
            "Bot missing required `BAN_MEMBERS` permission!"
        );
        assert_eq!(
            ErrorReport::UserMissingPermissions("KICK_MEMBERS".into()).description(),
            "User missing required `KICK_MEMBERS` permission!"
        );
        assert_eq!(
            ErrorReport::Failed("boom".into()).description(),
            "This interaction failed! \n ```boom```"
        );
    }

    #[test]
    fn permission_names_are_joined() {
        let permissions = serenity::Permissions::BAN_MEMBERS | serenity::Permissions::KICK_MEMBERS;
        let names = permission_names(permissions);
        assert!(names.contains("BAN_MEMBERS"));
        assert!(names.contains("KICK_MEMBERS"));
        assert_eq!(permission_names(serenity::Permissions::empty()), "UNKNOWN");
    }

    #[test]
    fn only_upstream_failures_are_pre_reported() {
        assert!(!BotError::InvalidInput("x".into()).is_reported());
        assert!(!BotError::NotFound("x".into()).is_reported());
    }
}
