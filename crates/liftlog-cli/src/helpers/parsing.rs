//! Parsing helpers for dates, set specs, and personal-best records.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use liftlog_core::catalog::{is_personal_best_code, PERSONAL_BEST_CODES};
use liftlog_core::nutrition::NutritionSummary;
use liftlog_core::RawSet;

use crate::errors::CliError;

/// Parse a date argument (`YYYY-MM-DD` or `today`).
pub fn parse_date(value: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CliError::invalid_input(format!("Invalid date (expected YYYY-MM-DD): {}", value)).into()
    })
}

/// Parse `--set NAME:WEIGHT:REPS:SETS` values, keeping their order.
pub fn parse_sets(specs: &[String]) -> anyhow::Result<Vec<RawSet>> {
    specs
        .iter()
        .map(|spec| RawSet::parse_spec(spec).map_err(Into::into))
        .collect()
}

fn parse_record(spec: &str) -> anyhow::Result<(String, f64)> {
    let (code, kg) = spec.split_once('=').ok_or_else(|| {
        CliError::invalid_input(format!("Invalid record: {} (expected CODE=KG)", spec))
    })?;
    let code = code.trim();
    if !is_personal_best_code(code) {
        return Err(CliError::invalid_input(format!(
            "Unknown lift code: {} (use one of {})",
            code,
            PERSONAL_BEST_CODES.join(", ")
        ))
        .into());
    }
    let kg: f64 = kg
        .trim()
        .parse()
        .map_err(|_| CliError::invalid_input(format!("Invalid weight for {}: {}", code, kg)))?;
    Ok((code.to_string(), kg))
}

/// Parse `--record CODE=KG` values. Later values for a code win.
pub fn parse_records(specs: &[String]) -> anyhow::Result<BTreeMap<String, f64>> {
    let mut records = BTreeMap::new();
    for spec in specs {
        let (code, kg) = parse_record(spec)?;
        records.insert(code, kg);
    }
    Ok(records)
}

/// Parse a `--nutrition-json` value.
pub fn parse_nutrition_json(text: &str) -> anyhow::Result<NutritionSummary> {
    serde_json::from_str(text).map_err(|e| {
        CliError::invalid_input(format!("Invalid nutrition JSON: {}", e)).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("today", today()).unwrap(), today());
        assert_eq!(
            parse_date("2024-02-29", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("2023-02-29", today()).is_err());
        assert!(parse_date("05/10", today()).is_err());
    }

    #[test]
    fn test_parse_sets_keeps_order() {
        let specs = vec!["スナッチ:60:3:5".to_string(), "バックスクワット:100:5:3".to_string()];
        let sets = parse_sets(&specs).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].exercise_name, "スナッチ");
        assert_eq!(sets[1].weight, 100.0);
    }

    #[test]
    fn test_parse_sets_rejects_malformed_spec() {
        assert!(parse_sets(&["スナッチ:60".to_string()]).is_err());
    }

    #[test]
    fn test_parse_records() {
        let specs = vec!["S=80".to_string(), "C&J=100.5".to_string(), "S=82".to_string()];
        let records = parse_records(&specs).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records["S"], 82.0);
        assert_eq!(records["C&J"], 100.5);
    }

    #[test]
    fn test_parse_records_rejects_unknown_code() {
        assert!(parse_records(&["Bench=100".to_string()]).is_err());
        assert!(parse_records(&["S=heavy".to_string()]).is_err());
        assert!(parse_records(&["S80".to_string()]).is_err());
    }

    #[test]
    fn test_parse_nutrition_json() {
        let summary =
            parse_nutrition_json(r#"{"calories":650,"protein":42.5,"fat":18,"carbs":80}"#)
                .unwrap();
        assert_eq!(summary.calories, 650.0);
        assert!(summary.missing_nutrients.is_empty());
        assert!(parse_nutrition_json("not json").is_err());
    }
}
