use std::cmp::Reverse;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Parser;
use dotabuff_scraping::api::{fetch_total_pages, reqwest_client};
use dotabuff_scraping::cache::PageCache;
use dotabuff_scraping::data_collector::{download_missing_pages, load_all_records};
use dotabuff_scraping::schema::{MatchRecord, PlayerId};
use fs_err::File;

/// Download raw HTML files for all pages of matches in a Dotabuff profile
/// and parse the matches into a CSV file.
#[derive(Parser)]
struct Opts {
    /// Dotabuff player ID.
    #[arg(short = 'i', long)]
    player_id: PlayerId,
    /// Cache directory for raw HTML files.  Defaults to the player ID.
    #[arg(short, long)]
    cache_dir: Option<PathBuf>,
    /// Output csv.  Defaults to <player ID>.csv.
    #[arg(short, long)]
    output_csv: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let player_id = opts.player_id;
    let cache_dir = opts
        .cache_dir
        .unwrap_or_else(|| PathBuf::from(player_id.to_string()));
    let output_csv = opts
        .output_csv
        .unwrap_or_else(|| PathBuf::from(format!("{player_id}.csv")));

    let cache = PageCache::new(cache_dir)?;
    let client = reqwest_client()?;

    let total_pages = fetch_total_pages(&client, &player_id).await?;
    download_missing_pages(&client, &cache, &player_id, total_pages).await?;

    let mut records = load_all_records(&cache)?;
    records.sort_by_key(|record| Reverse(record.timestamp()));
    write_csv(&output_csv, &records)?;
    println!("Saved to {:?}.", output_csv);

    Ok(())
}

fn write_csv(path: &Path, records: &[MatchRecord]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(path)?));
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
