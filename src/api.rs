use anyhow::Context;
use scraper::Html;
use url::Url;

use crate::matches_parser;
use crate::schema::PlayerId;

const USER_AGENT: &str = "dotabuff-scraping";

pub fn reqwest_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().user_agent(USER_AGENT).build()
}

/// URL of a matches page.  Unlike the cache file names, the `page` query
/// parameter counts from the first page.
pub fn matches_page_url(player_id: &PlayerId, page_from_first: u32) -> anyhow::Result<Url> {
    Url::parse(&format!(
        "https://www.dotabuff.com/players/{player_id}/matches?page={page_from_first}"
    ))
    .with_context(|| format!("Invalid matches page URL for player {player_id}"))
}

pub async fn fetch_match_page(
    client: &reqwest::Client,
    player_id: &PlayerId,
    page_from_first: u32,
) -> anyhow::Result<String> {
    let url = matches_page_url(player_id, page_from_first)?;
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

/// Number of total pages of matches in a Dotabuff profile.
pub async fn fetch_total_pages(
    client: &reqwest::Client,
    player_id: &PlayerId,
) -> anyhow::Result<u32> {
    let page = fetch_match_page(client, player_id, 1).await?;
    matches_parser::parse_last_page_number(&Html::parse_document(&page))
}

#[cfg(test)]
mod tests {
    use crate::schema::PlayerId;

    use super::matches_page_url;

    #[test]
    fn test_matches_page_url() {
        let url = matches_page_url(&PlayerId::from("123456789".to_owned()), 3).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.dotabuff.com/players/123456789/matches?page=3"
        );
    }
}
