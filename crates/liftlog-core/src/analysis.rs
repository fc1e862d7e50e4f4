//! Training analysis over a date range.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::classify::BodyPart;
use crate::error::{LiftLogError, Result};
use crate::storage::{LogStore, UserContext, WorkoutLog};

/// Analysis window, counted back from today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    #[default]
    Month,
    All,
}

impl Period {
    /// First date included in the window.
    pub fn start(&self, today: NaiveDate) -> NaiveDate {
        let days = match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::All => return NaiveDate::default(),
        };
        today.checked_sub_days(Days::new(days)).unwrap_or_default()
    }

    /// Label used in exported summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Period::Week => "直近1週間",
            Period::Month => "直近1ヶ月",
            Period::All => "全期間",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::All => "all",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = LiftLogError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "all" => Ok(Period::All),
            other => Err(LiftLogError::InvalidInput(format!(
                "Unknown range: {} (use week, month or all)",
                other
            ))),
        }
    }
}

/// Rounded tonnage for one body part.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyPartShare {
    pub body_part: BodyPart,
    pub tonnage: f64,
}

/// One point of the tonnage trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// `M/d` label.
    pub label: String,
    pub tonnage: f64,
}

/// Everything the analysis view shows for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub period: Period,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub log_count: usize,
    pub total_tonnage: f64,
    pub breakdown: Vec<BodyPartShare>,
    pub trend: Vec<TrendPoint>,
}

/// Sum of log totals.
pub fn total_tonnage(logs: &[WorkoutLog]) -> f64 {
    logs.iter().fold(0.0, |acc, log| acc + log.total_tonnage)
}

/// Tonnage per body part, rounded, largest first.
///
/// A set's stored label wins; sets without one are classified by name.
pub fn body_part_breakdown(logs: &[WorkoutLog]) -> Vec<BodyPartShare> {
    let mut sums: HashMap<BodyPart, f64> = HashMap::new();
    for set in logs.iter().flat_map(|log| log.sets.iter()) {
        *sums.entry(set.body_part()).or_insert(0.0) += set.tonnage;
    }

    let mut shares: Vec<BodyPartShare> = sums
        .into_iter()
        .map(|(body_part, tonnage)| BodyPartShare {
            body_part,
            tonnage: tonnage.round(),
        })
        .collect();
    // Equal values fall back to rule order so output is stable.
    shares.sort_by(|a, b| {
        b.tonnage
            .total_cmp(&a.tonnage)
            .then_with(|| a.body_part.cmp(&b.body_part))
    });
    shares
}

/// One point per log, in log order.
pub fn tonnage_trend(logs: &[WorkoutLog]) -> Vec<TrendPoint> {
    logs.iter()
        .map(|log| TrendPoint {
            date: log.date,
            label: log.date.format("%-m/%-d").to_string(),
            tonnage: log.total_tonnage.round(),
        })
        .collect()
}

/// Logs dated on or after the period start, ascending. Future-dated logs
/// are included.
pub fn load_logs<S: LogStore + ?Sized>(
    store: &S,
    user: &UserContext,
    period: Period,
    today: NaiveDate,
) -> Result<Vec<WorkoutLog>> {
    store.get_since(user, period.start(today))
}

/// Build the full analysis for a period.
pub fn analyze<S: LogStore + ?Sized>(
    store: &S,
    user: &UserContext,
    period: Period,
    today: NaiveDate,
) -> Result<Analysis> {
    let logs = load_logs(store, user, period, today)?;
    let end = logs.last().map_or(today, |log| log.date.max(today));
    Ok(summarize(period, period.start(today), end, &logs))
}

/// Build an analysis from already-loaded logs.
pub fn summarize(period: Period, start: NaiveDate, end: NaiveDate, logs: &[WorkoutLog]) -> Analysis {
    Analysis {
        period,
        start,
        end,
        log_count: logs.len(),
        total_tonnage: total_tonnage(logs),
        breakdown: body_part_breakdown(logs),
        trend: tonnage_trend(logs),
    }
}
