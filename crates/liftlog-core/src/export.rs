//! Spreadsheet export.
//!
//! The workbook has two sheets: a summary (name, period, grand total and the
//! body-part breakdown) and a detail log with one row per set. Row contents
//! are built as plain cell data first and written to the workbook last.

use std::path::Path;

use chrono::NaiveDate;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::analysis::{body_part_breakdown, total_tonnage, Period};
use crate::error::Result;
use crate::storage::WorkoutLog;

pub const SUMMARY_SHEET: &str = "サマリー";
pub const DETAIL_SHEET: &str = "詳細ログ";

/// Name shown when the profile cannot be loaded.
pub const DEFAULT_USER_NAME: &str = "ユーザー";

pub const DETAIL_HEADERS: [&str; 10] = [
    "日付",
    "時間帯",
    "総重量",
    "睡眠時間",
    "種目",
    "重量",
    "回数",
    "セット数",
    "小計",
    "部位",
];

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn optional(value: Option<String>) -> Self {
        value.map_or(Cell::Empty, Cell::Text)
    }
}

pub type Row = Vec<Cell>;

/// Summary sheet rows.
pub fn summary_rows(user_name: &str, period: Period, logs: &[WorkoutLog]) -> Vec<Row> {
    let mut rows = vec![
        vec![Cell::text("氏名"), Cell::text(user_name)],
        vec![Cell::text("対象期間"), Cell::text(period.label())],
        vec![
            Cell::text("総重量合計"),
            Cell::text(format!("{:.2} kg", total_tonnage(logs))),
        ],
        Vec::new(),
        vec![Cell::text("部位別トレーニング割合")],
    ];
    rows.extend(body_part_breakdown(logs).into_iter().map(|share| {
        vec![
            Cell::text(share.body_part.label()),
            Cell::text(format!("{} kg", share.tonnage)),
        ]
    }));
    rows
}

/// Detail sheet rows, header first.
///
/// Log-level columns are filled only on the first row of each log. A log with
/// no sets still gets one row carrying its log-level columns.
pub fn detail_rows(logs: &[WorkoutLog]) -> Vec<Row> {
    let mut rows: Vec<Row> = vec![DETAIL_HEADERS.iter().map(|h| Cell::text(*h)).collect()];

    for log in logs {
        let log_cells = [
            Cell::text(log.date.to_string()),
            Cell::optional(log.time_zone.map(|slot| slot.label().to_string())),
            Cell::text(format!("{:.2}", log.total_tonnage)),
            Cell::optional(log.sleep_hours.map(|h| h.to_string())),
        ];

        if log.sets.is_empty() {
            let mut row: Row = log_cells.to_vec();
            row.extend(std::iter::repeat(Cell::Empty).take(6));
            rows.push(row);
            continue;
        }

        for (index, set) in log.sets.iter().enumerate() {
            let mut row: Row = if index == 0 {
                log_cells.to_vec()
            } else {
                vec![Cell::Empty; 4]
            };
            row.extend([
                Cell::text(set.exercise_name.as_str()),
                Cell::Number(set.weight),
                Cell::Number(set.reps as f64),
                Cell::Number(set.sets as f64),
                Cell::text(format!("{:.2}", set.tonnage)),
                Cell::optional(set.target_body_part.clone()),
            ]);
            rows.push(row);
        }
    }

    rows
}

/// `{last} {first}_{yyyymmdd}.xlsx`
pub fn file_name(user_name: &str, today: NaiveDate) -> String {
    format!("{}_{}.xlsx", user_name, today.format("%Y%m%d"))
}

fn write_rows(sheet: &mut Worksheet, rows: &[Row]) -> Result<()> {
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match cell {
                Cell::Empty => {}
                Cell::Text(value) => {
                    sheet.write_string(r, c, value)?;
                }
                Cell::Number(value) => {
                    sheet.write_number(r, c, *value)?;
                }
            }
        }
    }
    Ok(())
}

/// Build the two-sheet workbook.
pub fn build_workbook(user_name: &str, period: Period, logs: &[WorkoutLog]) -> Result<Workbook> {
    let mut workbook = Workbook::new();

    let summary = workbook.add_worksheet();
    summary.set_name(SUMMARY_SHEET)?;
    write_rows(summary, &summary_rows(user_name, period, logs))?;

    let detail = workbook.add_worksheet();
    detail.set_name(DETAIL_SHEET)?;
    write_rows(detail, &detail_rows(logs))?;

    Ok(workbook)
}

/// Build the workbook and write it to `path`.
pub fn write_workbook(
    path: &Path,
    user_name: &str,
    period: Period,
    logs: &[WorkoutLog],
) -> Result<()> {
    let mut workbook = build_workbook(user_name, period, logs)?;
    let bytes = workbook.save_to_buffer()?;
    crate::fs::write_atomic(path, &bytes)?;
    log::info!("Exported {} logs to {}", logs.len(), path.display());
    Ok(())
}
