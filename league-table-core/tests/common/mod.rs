use std::path::Path;

use rust_xlsxwriter::Workbook;

/// Writes an `.xlsx` shaped like the portal export, with the table starting
/// in column B. Sheet row 0 holds an optional title; the header sits on row 1.
///
/// Match rows: `A 52:73 B` and `B 60:55 A`, then an unplayed game and a
/// summary row that looks like a match.
pub fn write_results_workbook(path: &Path, with_title: bool) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Ergebnisse").expect("sheet name");

    if with_title {
        sheet
            .write_string(0, 1, "Ergebnisse Bezirksklasse Herren")
            .expect("write title");
    }

    // Matchday numbers go in as numeric cells, the rest as text.
    let rows: [[&str; 4]; 5] = [
        ["Spieltag", "Heimmannschaft", "Gastmannschaft", "Endstand"],
        ["559", "A", "B", "52 : 73"],
        ["559", "B", "A", "60:55"],
        ["560", "A", "C", ""],
        ["", "Summe", "Gesamt", "1 : 1"],
    ];
    for (offset, cells) in rows.iter().enumerate() {
        let row = 1 + offset as u32;
        for (col, cell) in cells.iter().enumerate() {
            let col = 1 + col as u16;
            if let Ok(number) = cell.parse::<f64>() {
                sheet.write_number(row, col, number).expect("write number");
            } else if !cell.is_empty() {
                sheet.write_string(row, col, *cell).expect("write cell");
            }
        }
    }

    workbook.save(path).expect("save workbook");
}
