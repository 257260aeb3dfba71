use league_table_core::config::OutputEncoding;
use league_table_core::render::{encode, render_html, render_text, write_html, COLUMNS};
use league_table_core::standings::{compute_standings, MatchRecord, Standing, StandingsTable, TeamStats};
use regex::Regex;

fn sample_table() -> StandingsTable {
    compute_standings(&[
        MatchRecord::new("TeamA", "TeamB", 52, 73),
        MatchRecord::new("TeamB", "TeamA", 60, 55),
        MatchRecord::new("Ries & Söhne <BBC>", "TeamA", 80, 40),
    ])
}

fn unescape(cell: &str) -> String {
    cell.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Reads the body rows of a rendered table back into standings.
fn parse_table(html: &str) -> StandingsTable {
    let row_re = Regex::new(r"(?s)<tr>(.*?)</tr>").unwrap();
    let cell_re = Regex::new(r"<td>(.*?)</td>").unwrap();
    let rows = row_re
        .captures_iter(html)
        .map(|row| {
            let cells: Vec<String> = cell_re
                .captures_iter(&row[1])
                .map(|c| c[1].to_string())
                .collect();
            assert_eq!(cells.len(), COLUMNS.len(), "row has wrong cell count: {cells:?}");
            Standing {
                team: unescape(&cells[0]),
                stats: TeamStats {
                    games: cells[1].parse().unwrap(),
                    wins: cells[2].parse().unwrap(),
                    losses: cells[3].parse().unwrap(),
                    points: cells[4].parse().unwrap(),
                    points_made: cells[5].parse().unwrap(),
                    points_conceded: cells[6].parse().unwrap(),
                    diff: cells[7].parse().unwrap(),
                },
            }
        })
        .collect();
    StandingsTable::from_ranked(rows)
}

#[test]
fn rendered_table_round_trips() {
    let table = sample_table();
    let html = render_html(&table);
    assert_eq!(parse_table(&html), table);
}

#[test]
fn header_lists_all_columns_in_order() {
    let html = render_html(&sample_table());
    assert!(html.starts_with("<table border=\"1\" class=\"dataframe\">"));
    assert!(html.contains("<tr style=\"text-align: center;\">"));
    assert!(html.ends_with("</table>"));

    let th_re = Regex::new(r"<th>(.*?)</th>").unwrap();
    let headers: Vec<String> = th_re.captures_iter(&html).map(|c| c[1].to_string()).collect();
    assert_eq!(
        headers,
        vec!["Team", "Games", "Wins", "Losses", "Points", "Points Made", "Points Get", "Diff"]
    );
}

#[test]
fn empty_table_renders_header_only() {
    let html = render_html(&StandingsTable::default());
    assert!(html.contains("<tbody>"));
    assert!(!html.contains("<td>"));
}

#[test]
fn utf16_file_decodes_back_to_html() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("Tabelle_H3.html");
    let html = render_html(&sample_table());

    write_html(&path, &html, OutputEncoding::Utf16).expect("write html");
    let bytes = std::fs::read(&path).expect("read back");

    assert_eq!(&bytes[..2], &[0xFF, 0xFE], "BOM");
    let units: Vec<u16> = bytes[2..]
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    assert_eq!(String::from_utf16(&units).expect("valid utf-16"), html);
}

#[test]
fn utf8_output_is_plain_bytes() {
    let html = render_html(&sample_table());
    assert_eq!(encode(&html, OutputEncoding::Utf8), html.as_bytes());
}

#[test]
fn text_preview_is_limited() {
    let preview = render_text(&sample_table(), 2);
    let lines: Vec<&str> = preview.lines().collect();
    assert_eq!(lines.len(), 3, "header plus two rows:\n{preview}");
    assert!(lines[0].starts_with("Team"));
    assert!(lines[0].contains("Points Get"));
}
