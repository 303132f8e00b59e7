use crate::error::Result;
use crate::model::{HandRow, MatchExport};
use rust_xlsxwriter::{
    ConditionalFormat3ColorScale, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};
use std::path::Path;

/// Write a finished match to an Excel scoresheet
pub fn write_scoresheet(
    export: &MatchExport,
    team1_name: &str,
    team2_name: &str,
    path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();

    let worksheet = workbook.add_worksheet();
    write_scoresheet_sheet(worksheet, export, team1_name, team2_name)?;

    workbook.save(path)?;
    Ok(())
}

/// Write hand-by-hand scoring to a worksheet
fn write_scoresheet_sheet(
    sheet: &mut Worksheet,
    export: &MatchExport,
    team1_name: &str,
    team2_name: &str,
) -> Result<()> {
    sheet.set_column_width(0, 8)?; // Hand
    for col in 1..=8 {
        sheet.set_column_width(col, 12)?;
    }

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin);

    let headers = [
        "Hand".to_string(),
        format!("{} Bid", team1_name),
        format!("{} Books", team1_name),
        format!("{} Pts", team1_name),
        format!("{} Total", team1_name),
        format!("{} Bid", team2_name),
        format!("{} Books", team2_name),
        format!("{} Pts", team2_name),
        format!("{} Total", team2_name),
    ];

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    let center_format = Format::new().set_align(FormatAlign::Center);
    let score_format = Format::new().set_align(FormatAlign::Right);
    let total_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Right)
        .set_border_top(FormatBorder::Thin);
    let label_format = Format::new().set_bold().set_border_top(FormatBorder::Thin);

    for (row_idx, hand) in export.hands.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet.write_number_with_format(row, 0, hand.hand_no as f64, &center_format)?;

        let team1_bid = format_bid(hand.team1_bid, hand.team1_blind);
        sheet.write_string_with_format(row, 1, &team1_bid, &center_format)?;
        sheet.write_number_with_format(row, 2, hand.team1_books as f64, &center_format)?;
        sheet.write_number_with_format(row, 3, hand.team1_delta as f64, &score_format)?;
        sheet.write_number_with_format(row, 4, hand.team1_total_after as f64, &score_format)?;

        let team2_bid = format_bid(hand.team2_bid, hand.team2_blind);
        sheet.write_string_with_format(row, 5, &team2_bid, &center_format)?;
        sheet.write_number_with_format(row, 6, hand.team2_books as f64, &center_format)?;
        sheet.write_number_with_format(row, 7, hand.team2_delta as f64, &score_format)?;
        sheet.write_number_with_format(row, 8, hand.team2_total_after as f64, &score_format)?;
    }

    // Summary rows
    let totals_row = (export.hands.len() + 1) as u32;
    sheet.write_string_with_format(totals_row, 0, "Total", &label_format)?;
    for col in [1, 2, 3, 5, 6, 7] {
        sheet.write_blank(totals_row, col, &label_format)?;
    }
    sheet.write_number_with_format(totals_row, 4, export.outcome.team1_total as f64, &total_format)?;
    sheet.write_number_with_format(totals_row, 8, export.outcome.team2_total as f64, &total_format)?;

    let winner = match export.outcome.winner_team_id {
        Some(id) if id == export.game.team1_id => team1_name,
        Some(_) => team2_name,
        None => "Tie",
    };
    sheet.write_string(totals_row + 2, 0, "Goal")?;
    sheet.write_number(totals_row + 2, 1, export.game.goal_score as f64)?;
    sheet.write_string(totals_row + 3, 0, "Winner")?;
    sheet.write_string(totals_row + 3, 1, winner)?;

    // Red (set) -> Yellow -> Green (made) on the per-hand points
    if !export.hands.is_empty() {
        let points_format = ConditionalFormat3ColorScale::new()
            .set_minimum_color("F8696B")
            .set_midpoint_color("FFEB84")
            .set_maximum_color("63BE7B");
        let last_row = export.hands.len() as u32;
        sheet.add_conditional_format(1, 3, last_row, 3, &points_format)?;
        sheet.add_conditional_format(1, 7, last_row, 7, &points_format)?;
    }

    sheet.set_name("Scoresheet")?;

    Ok(())
}

/// Bid as shown on the scoresheet: "Nil" for zero, "B" suffix for blind
fn format_bid(bid: u8, blind: bool) -> String {
    let base = if bid == 0 {
        "Nil".to_string()
    } else {
        bid.to_string()
    };
    if blind {
        format!("{} B", base)
    } else {
        base
    }
}

/// One hand as a fixed-width text line, in scoresheet column order
pub fn hand_summary(hand: &HandRow) -> String {
    format!(
        "{:>3}  {:>6} {:>2} {:>+5} {:>5}  |  {:>6} {:>2} {:>+5} {:>5}",
        hand.hand_no,
        format_bid(hand.team1_bid, hand.team1_blind),
        hand.team1_books,
        hand.team1_delta,
        hand.team1_total_after,
        format_bid(hand.team2_bid, hand.team2_blind),
        hand.team2_books,
        hand.team2_delta,
        hand.team2_total_after
    )
}
