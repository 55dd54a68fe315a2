use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::config::Config;
use crate::helpers::links::LinkReputationClient;

pub struct Data {
    pub config: Config,
    pub http: reqwest::Client,
    pub links: LinkReputationClient,
    pub system: Mutex<sysinfo::System>,
    pub started_at: DateTime<Utc>,
}

impl Data {
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();
        let links = LinkReputationClient::new(
            http.clone(),
            config.link_api_url.clone(),
            config.link_api_token.clone(),
        );

        Data {
            config,
            http,
            links,
            system: Mutex::new(sysinfo::System::new()),
            started_at: Utc::now(),
        }
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;

pub type Context<'a> = poise::Context<'a, Data, Error>;
