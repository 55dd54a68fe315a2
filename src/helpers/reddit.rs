use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::error::BotError;

const MEMES_URL: &str = "https://www.reddit.com/r/memes/hot.json";

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Submission,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Submission {
    pub title: String,
    pub permalink: String,
    pub url: String,
    #[serde(default)]
    pub over_18: bool,
    #[serde(default)]
    pub is_video: bool,
}

impl Submission {
    pub fn link(&self) -> String {
        format!("https://reddit.com{}", self.permalink)
    }
}

fn safe_submissions(listing: Listing) -> Vec<Submission> {
    listing
        .data
        .children
        .into_iter()
        .map(|child| child.data)
        .filter(|submission| !submission.over_18 && !submission.is_video)
        .collect()
}

/// Current hot posts of r/memes, shuffled, without NSFW or video posts.
pub async fn fetch_memes(http: &reqwest::Client, user_agent: &str) -> Result<Vec<Submission>, BotError> {
    let listing = http
        .get(MEMES_URL)
        .header(reqwest::header::USER_AGENT, user_agent)
        .send()
        .await?
        .error_for_status()?
        .json::<Listing>()
        .await?;

    let mut submissions = safe_submissions(listing);
    submissions.shuffle(&mut rand::rng());

    Ok(submissions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_nsfw_and_video_posts() {
        let listing: Listing = serde_json::from_value(serde_json::json!({
            "data": { "children": [
                { "data": { "title": "a", "permalink": "/r/memes/a", "url": "https://i.redd.it/a.png", "over_18": false, "is_video": false } },
                { "data": { "title": "b", "permalink": "/r/memes/b", "url": "https://i.redd.it/b.png", "over_18": true, "is_video": false } },
                { "data": { "title": "c", "permalink": "/r/memes/c", "url": "https://v.redd.it/c", "over_18": false, "is_video": true } },
                { "data": { "title": "d", "permalink": "/r/memes/d", "url": "https://i.redd.it/d.png" } }
            ] }
        }))
        .unwrap();

        let titles: Vec<String> = safe_submissions(listing)
            .into_iter()
            .map(|submission| submission.title)
            .collect();
        assert_eq!(titles, vec!["a", "d"]);
    }

    #[test]
    fn link_points_at_reddit() {
        let submission = Submission {
            title: "t".into(),
            permalink: "/r/memes/comments/xyz/".into(),
            url: "https://i.redd.it/x.png".into(),
            over_18: false,
            is_video: false,
        };
        assert_eq!(submission.link(), "https://reddit.com/r/memes/comments/xyz/");
    }
}
