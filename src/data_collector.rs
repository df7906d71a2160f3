use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::Context;
use log::{info, warn};
use rand::{thread_rng, Rng};
use scraper::Html;
use tokio::time::sleep;

use crate::api;
use crate::cache::PageCache;
use crate::matches_parser::parse_matches_page;
use crate::schema::{MatchRecord, PlayerId};

const FETCH_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Download the pages that are not in the cache yet.
///
/// Cache page numbers count from the last page, so that a page of old
/// matches keeps its number as new matches accumulate; newly played matches
/// land on new high-numbered files instead.  Returns the number of pages
/// fetched; zero when the cache already covers the whole range.
pub async fn download_missing_pages(
    client: &reqwest::Client,
    cache: &PageCache,
    player_id: &PlayerId,
    total_pages: u32,
) -> anyhow::Result<usize> {
    let cached = cache.cached_page_numbers()?;
    let missing = missing_page_numbers(&cached, total_pages);

    info!(
        "Downloading {total_pages} Dotabuff pages for player {player_id} into {:?}.",
        cache.dir()
    );
    if !missing.is_empty() && !cached.is_empty() {
        info!(
            "Found {} loaded pages in {:?}.  Downloading remaining {}.",
            cached.len(),
            cache.dir(),
            missing.len()
        );
    }
    for (fetched, &page_number) in missing.iter().enumerate() {
        // The fetch URL counts from the first page.
        let page_from_first = total_pages - page_number + 1;
        info!("Page {page_from_first}/{total_pages}");
        let body = fetch_with_retry(client, player_id, page_from_first).await?;
        cache.store(page_number, &body)?;
        sleep(politeness_delay(fetched, total_pages)).await;
    }
    info!("Done.");
    Ok(missing.len())
}

async fn fetch_with_retry(
    client: &reqwest::Client,
    player_id: &PlayerId,
    page_from_first: u32,
) -> anyhow::Result<String> {
    let mut attempt = 1;
    loop {
        match api::fetch_match_page(client, player_id, page_from_first).await {
            Ok(body) => return Ok(body),
            Err(e) if attempt < FETCH_ATTEMPTS => {
                warn!(
                    "Failed to fetch page {page_from_first} (attempt {attempt}/{FETCH_ATTEMPTS}): {e:#}"
                );
                sleep(RETRY_DELAY * attempt).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to fetch page {page_from_first} after {FETCH_ATTEMPTS} attempts")
                })
            }
        }
    }
}

/// Pages to fetch: the full range, counted from the last page, minus the
/// cached ones.  Ordered by descending page number, which is the site's
/// natural page order starting at the newest page.
fn missing_page_numbers(cached: &BTreeSet<u32>, total_pages: u32) -> Vec<u32> {
    (1..=total_pages)
        .rev()
        .filter(|page_number| !cached.contains(page_number))
        .collect()
}

/// Pause between successive fetches.  The lower bound starts near five
/// seconds and grows by one per page fetched this run, capped at the page
/// count; the upper bound is the page count.
fn politeness_delay(pages_fetched: usize, total_pages: u32) -> Duration {
    let upper = f64::from(total_pages);
    let lower = (5.0 + pages_fetched as f64).min(upper);
    Duration::from_secs_f64(thread_rng().gen_range(lower..=upper))
}

/// Parse every cached page, including ones fetched in previous runs, and
/// concatenate the records.
pub fn load_all_records(cache: &PageCache) -> anyhow::Result<Vec<MatchRecord>> {
    let mut records = vec![];
    for path in cache.page_paths()? {
        let html = Html::parse_document(&fs_err::read_to_string(&path)?);
        let mut parsed =
            parse_matches_page(&html).with_context(|| format!("While parsing {path:?}"))?;
        records.append(&mut parsed);
    }
    Ok(records)
}
