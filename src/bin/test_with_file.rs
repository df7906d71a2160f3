use std::path::PathBuf;

use clap::Parser;
use dotabuff_scraping::matches_parser::parse_matches_page;
use dotabuff_scraping::schema::MatchRecord;
use scraper::Html;

#[derive(Parser)]
struct Opts {
    input_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let html = Html::parse_document(&fs_err::read_to_string(opts.input_file)?);

    let result = parse_matches_page(&html)?;
    dbg!(&result);
    let serialized = serde_json::to_string_pretty(&result)?;
    println!("{}", &serialized);
    let deserialized: Vec<MatchRecord> = serde_json::from_str(&serialized)?;
    dbg!(&deserialized);

    assert_eq!(result, deserialized);

    Ok(())
}
