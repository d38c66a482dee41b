use scraper::{ElementRef, Html, Selector};

use transferwatch_core::record::{Completeness, Field, RawRecord, RowExtraction};

/// Extract every transfer row from one listing page, in document order.
///
/// Rows are the striped `tr.odd` / `tr.even` entries of the listing table.
/// Each row maps to exactly one [`RowExtraction`]; any field whose markup
/// cannot be located comes back as `None` and is listed in the row's
/// completeness tag.
pub fn extract_rows(html: &str) -> Vec<RowExtraction> {
    let doc = Html::parse_document(html);
    let row_sel = Selector::parse("tr.odd, tr.even").unwrap();
    let cell_sel = Selector::parse("td.hauptlink").unwrap();
    let link_sel = Selector::parse("a").unwrap();
    let fee_sel = Selector::parse("td.rechts.hauptlink").unwrap();

    doc.select(&row_sel)
        .map(|row| extract_row(row, &cell_sel, &link_sel, &fee_sel))
        .collect()
}

fn extract_row(
    row: ElementRef,
    cell_sel: &Selector,
    link_sel: &Selector,
    fee_sel: &Selector,
) -> RowExtraction {
    let cells: Vec<ElementRef> = row.select(cell_sel).collect();

    // Cell order: player, team left, team joined. The fee cell also carries
    // the `hauptlink` class but sits after the team cells.
    let player_link = cells.first().and_then(|c| c.select(link_sel).next());
    let player = player_link.map(element_text).filter(|s| !s.is_empty());

    // The player's listing id is the last path segment of the profile link.
    let transfermarkt_id = player_link
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| href.rsplit('/').next())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let team_left = cell_link_text(&cells, 1, link_sel);
    let team_joined = cell_link_text(&cells, 2, link_sel);

    let fee = row
        .select(fee_sel)
        .next()
        .map(element_text)
        .filter(|s| !s.is_empty());

    let record = RawRecord {
        player,
        transfermarkt_id,
        team_left,
        team_joined,
        fee,
    };

    let mut missing = Vec::new();
    if record.player.is_none() {
        missing.push(Field::Player);
    }
    if record.transfermarkt_id.is_none() {
        missing.push(Field::TransfermarktId);
    }
    if record.team_left.is_none() {
        missing.push(Field::TeamLeft);
    }
    if record.team_joined.is_none() {
        missing.push(Field::TeamJoined);
    }
    if record.fee.is_none() {
        missing.push(Field::Fee);
    }

    let completeness = if missing.is_empty() {
        Completeness::Complete
    } else {
        Completeness::Partial { missing }
    };

    RowExtraction {
        record,
        completeness,
    }
}

fn cell_link_text(cells: &[ElementRef], idx: usize, link_sel: &Selector) -> Option<String> {
    cells
        .get(idx)
        .and_then(|c| c.select(link_sel).next())
        .map(element_text)
        .filter(|s| !s.is_empty())
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
