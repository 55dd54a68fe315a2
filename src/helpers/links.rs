use serde::Deserialize;

use crate::error::BotError;

/// Verdict returned by the link-reputation service for one URL.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UrlVerdict {
    pub is_fraudulent: bool,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct LinkReputationClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl LinkReputationClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        LinkReputationClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn endpoint(&self, encoded_url: &str) -> String {
        format!("{}/urls/{}", self.base_url, encoded_url)
    }

    /// Looks up an already percent-encoded URL.
    pub async fn get_url(&self, encoded_url: &str) -> Result<UrlVerdict, BotError> {
        let mut request = self.http.get(self.endpoint(encoded_url));
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }

        let verdict = request
            .send()
            .await?
            .error_for_status()?
            .json::<UrlVerdict>()
            .await?;

        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_decodes_camel_case() {
        let verdict: UrlVerdict = serde_json::from_str(
            r#"{"isFraudulent": true, "message": "Known phishing domain", "extra": 1}"#,
        )
        .unwrap();

        assert!(verdict.is_fraudulent);
        assert_eq!(verdict.message, "Known phishing domain");
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = LinkReputationClient::new(reqwest::Client::new(), "https://api.test/v1/", None);
        assert_eq!(
            client.endpoint("https://example.com/a%3Fb"),
            "https://api.test/v1/urls/https://example.com/a%3Fb"
        );
    }
}
