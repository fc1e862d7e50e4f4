//! Calendar view support.
//!
//! The dashboard loads every log between the first day of the previous month
//! and the last day of the current month, then keys them by date so the
//! calendar can mark logged days and the editor can find the log for a
//! selected day without another query.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::error::{LiftLogError, Result};
use crate::storage::{LogStore, UserContext, WorkoutLog};

/// Weekday headers, Sunday first. Each is padded to the four-column cell width.
const WEEKDAY_HEADER: [&str; 7] = ["  日", "  月", "  火", "  水", "  木", "  金", "  土"];

/// Marker appended to days that have a log.
pub const LOGGED_MARKER: char = '*';

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Last day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> Result<NaiveDate> {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| out_of_range(date))
}

/// Dashboard range: first day of the previous month through the last day of
/// the current month.
pub fn month_window(today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let start = first_of_month(today)
        .checked_sub_months(Months::new(1))
        .ok_or_else(|| out_of_range(today))?;
    Ok((start, last_of_month(today)?))
}

/// Parse a `YYYY-MM` month into its first day.
pub fn parse_month(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d").map_err(|_| {
        LiftLogError::InvalidInput(format!("Invalid month: {} (expected YYYY-MM)", value))
    })
}

fn out_of_range(date: NaiveDate) -> LiftLogError {
    LiftLogError::InvalidInput(format!("Date out of supported range: {}", date))
}

/// Logs keyed by date, for calendar rendering and day selection.
#[derive(Debug, Clone, Default)]
pub struct LogCalendar {
    logs: BTreeMap<NaiveDate, WorkoutLog>,
}

impl LogCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_logs(logs: impl IntoIterator<Item = WorkoutLog>) -> Self {
        Self {
            logs: logs.into_iter().map(|log| (log.date, log)).collect(),
        }
    }

    /// Load the dashboard window around `today`.
    pub fn load<S: LogStore + ?Sized>(
        store: &S,
        user: &UserContext,
        today: NaiveDate,
    ) -> Result<Self> {
        let (start, end) = month_window(today)?;
        let logs = store.get_by_date_range(user, start, end)?;
        log::debug!("Loaded {} logs for {}..{}", logs.len(), start, end);
        Ok(Self::from_logs(logs))
    }

    pub fn get(&self, date: NaiveDate) -> Option<&WorkoutLog> {
        self.logs.get(&date)
    }

    pub fn has_log(&self, date: NaiveDate) -> bool {
        self.logs.contains_key(&date)
    }

    /// Insert or replace the log for its date.
    pub fn insert(&mut self, log: WorkoutLog) {
        self.logs.insert(log.date, log);
    }

    pub fn remove(&mut self, date: NaiveDate) -> Option<WorkoutLog> {
        self.logs.remove(&date)
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Logs in date order.
    pub fn iter(&self) -> impl Iterator<Item = &WorkoutLog> {
        self.logs.values()
    }

    /// Logs falling in the month containing `month`.
    pub fn in_month(&self, month: NaiveDate) -> Result<impl Iterator<Item = &WorkoutLog>> {
        let start = first_of_month(month);
        let end = last_of_month(month)?;
        Ok(self.logs.range(start..=end).map(|(_, log)| log))
    }

    /// Find the log for a selected day.
    ///
    /// Looks in the loaded window first and falls back to the store. A store
    /// failure is logged and treated as "no existing log", so the editor opens
    /// empty. Store hits are cached.
    pub fn select<S: LogStore + ?Sized>(
        &mut self,
        store: &S,
        user: &UserContext,
        date: NaiveDate,
    ) -> Option<WorkoutLog> {
        if let Some(log) = self.logs.get(&date) {
            return Some(log.clone());
        }

        match store.get_by_date(user, date) {
            Ok(Some(log)) => {
                self.insert(log.clone());
                Some(log)
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to load log for {}: {}", date, e);
                None
            }
        }
    }

    /// Render a Sunday-first month grid, marking logged days.
    pub fn render_month(&self, month: NaiveDate) -> Result<String> {
        let first = first_of_month(month);
        let last = last_of_month(month)?;

        let mut out = String::new();
        out.push_str(&format!("{:>16}\n", first.format("%Y-%m")));
        out.push_str(&WEEKDAY_HEADER.concat());
        out.push('\n');

        let offset = first.weekday().num_days_from_sunday() as usize;
        let mut line = "    ".repeat(offset);
        let mut column = offset;

        for day in first.iter_days().take_while(|d| *d <= last) {
            let marker = if self.has_log(day) { LOGGED_MARKER } else { ' ' };
            line.push_str(&format!("{:>3}{}", day.day(), marker));
            column += 1;
            if day.weekday() == Weekday::Sat {
                out.push_str(line.trim_end());
                out.push('\n');
                line.clear();
                column = 0;
            }
        }
        if column > 0 {
            out.push_str(line.trim_end());
            out.push('\n');
        }

        Ok(out)
    }
}
