use anyhow::Context;
use itertools::Itertools;
use scraper::{ElementRef, Html};

use crate::schema::{HeroName, MatchDuration, MatchId, MatchRecord, MatchTime};

/// Parse one matches page into records, one per data row of the matches
/// table.  A page without any table yields no records; this is how pages of
/// players without matches look.
pub fn parse_matches_page(html: &Html) -> anyhow::Result<Vec<MatchRecord>> {
    // The matches table is the largest table on the page; smaller auxiliary
    // tables appear elsewhere in the layout.
    let table = match html
        .select(selector!("table"))
        .max_by_key(|table| table.text().map(str::len).sum::<usize>())
    {
        Some(table) => table,
        None => return Ok(vec![]),
    };
    let mut records = vec![];
    // The first row is the header.
    for row in table.select(selector!("tr")).skip(1) {
        if let Some(record) = parse_row(row)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Parse a row of the matches table.
/// Some cells contain two values (e.g. hero and skill level).
fn parse_row(row: ElementRef) -> anyhow::Result<Option<MatchRecord>> {
    let cells = row.children().filter_map(ElementRef::wrap).collect_vec();
    // Separator and decoration rows have at most one cell.
    if cells.len() <= 1 {
        return Ok(None);
    }

    let hero_cell = *cells.get(1).context("Hero cell not found")?;
    let hero_link = hero_cell
        .select(selector!("a"))
        .next()
        .context("Hero link not found")?;
    let hero = HeroName::from(element_text(hero_link));
    let match_path = hero_link
        .value()
        .attr("href")
        .context("Hero link has no href")?;
    let match_id = MatchId::from(
        match_path
            .strip_prefix("/matches/")
            .unwrap_or(match_path)
            .to_owned(),
    );
    let skill_level = element_text(
        hero_cell
            .select(selector!("div"))
            .next()
            .context("Skill level label not found")?,
    );

    let result_cell = *cells.get(3).context("Result cell not found")?;
    let result = element_text(
        result_cell
            .select(selector!("a"))
            .next()
            .context("Result link not found")?,
    );
    let timestamp: MatchTime = result_cell
        .select(selector!("time"))
        .next()
        .context("Time element not found")?
        .value()
        .attr("datetime")
        .context("Time element has no datetime attribute")?
        .parse()
        .context("Could not parse datetime attribute")?;

    let bracket_cell = *cells.get(4).context("Bracket cell not found")?;
    let match_type = element_text(bracket_cell);
    let game_mode = element_text(
        bracket_cell
            .select(selector!("div"))
            .next()
            .context("Game mode label not found")?,
    );

    let duration = MatchDuration::from(element_text(
        *cells.get(5).context("Duration cell not found")?,
    ));

    let kda = cells
        .get(6)
        .context("KDA cell not found")?
        .select(selector!("span.value"))
        .map(element_text)
        .join("-");

    let items = cells
        .get(7)
        .context("Items cell not found")?
        .select(selector!("a"))
        .filter_map(|link| link.value().attr("href"))
        .map(|href| href.strip_prefix("/items/").unwrap_or(href))
        .join(",");

    Ok(Some(
        MatchRecord::builder()
            .hero(hero)
            .match_id(match_id)
            .skill_level(skill_level)
            .result(result)
            .timestamp(timestamp)
            .match_type(match_type)
            .game_mode(game_mode)
            .duration(duration)
            .kda(kda)
            .items(items)
            .build(),
    ))
}

fn element_text(element: ElementRef) -> String {
    element.text().collect()
}

/// Total number of match pages, read off the "last page" link of the
/// pagination control on the first page.
pub fn parse_last_page_number(html: &Html) -> anyhow::Result<u32> {
    let href = html
        .select(selector!("span.last a"))
        .next()
        .context("Last page link not found in pagination")?
        .value()
        .attr("href")
        .context("Last page link has no href")?;
    let page = regex!(r"page=(\d+)")
        .captures(href)
        .with_context(|| format!("Page number not found in last page link: {href}"))?[1]
        .parse()?;
    Ok(page)
}
