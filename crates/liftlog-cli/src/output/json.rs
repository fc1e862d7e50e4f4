//! JSON output formatting for logs and personal bests.

use liftlog_core::nutrition::NutritionSummary;
use liftlog_core::storage::{PersonalBest, WorkoutLog, WorkoutSet};

fn set_json(set: &WorkoutSet) -> serde_json::Value {
    serde_json::json!({
        "id": set.id,
        "exercise_name": set.exercise_name,
        "weight": set.weight,
        "reps": set.reps,
        "sets": set.sets,
        "tonnage": set.tonnage,
        "target_body_part": set.target_body_part,
        "body_part": set.body_part(),
    })
}

/// Convert a log to JSON for output.
///
/// The stored nutrition text is expanded into an object when it parses.
pub fn log_json(log: &WorkoutLog) -> serde_json::Value {
    let nutrition = log
        .nutrition_summary
        .as_deref()
        .and_then(NutritionSummary::from_stored);
    serde_json::json!({
        "id": log.id,
        "date": log.date,
        "time_zone": log.time_zone,
        "total_tonnage": log.total_tonnage,
        "sleep_hours": log.sleep_hours,
        "nutrition_summary": nutrition,
        "created_at": log.created_at,
        "updated_at": log.updated_at,
        "sets": log.sets.iter().map(set_json).collect::<Vec<_>>(),
    })
}

/// Convert multiple logs to a JSON array for output.
pub fn logs_json(logs: &[WorkoutLog]) -> Vec<serde_json::Value> {
    logs.iter().map(log_json).collect()
}

pub fn personal_best_json(best: &PersonalBest) -> serde_json::Value {
    serde_json::json!({
        "grade": best.grade,
        "body_weight": best.body_weight,
        "records": best.records,
        "updated_at": best.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use liftlog_core::storage::TimeSlot;
    use uuid::Uuid;

    fn sample_log(nutrition: Option<&str>) -> WorkoutLog {
        let log_id = Uuid::new_v4();
        WorkoutLog {
            id: log_id,
            user_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            time_zone: Some(TimeSlot::Morning),
            total_tonnage: 900.0,
            sleep_hours: Some(7.0),
            nutrition_summary: nutrition.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            sets: vec![WorkoutSet {
                id: Uuid::new_v4(),
                log_id,
                exercise_name: "スナッチ".to_string(),
                weight: 60.0,
                reps: 3,
                sets: 5,
                tonnage: 900.0,
                target_body_part: None,
                created_at: Utc::now(),
            }],
        }
    }

    #[test]
    fn test_log_json_shape() {
        let value = log_json(&sample_log(None));
        assert_eq!(value["date"], "2024-05-01");
        assert_eq!(value["time_zone"], "午前");
        assert_eq!(value["total_tonnage"], 900.0);
        assert!(value["nutrition_summary"].is_null());
        assert_eq!(value["sets"][0]["body_part"], "全身（スナッチ）");
        assert!(value["sets"][0]["target_body_part"].is_null());
    }

    #[test]
    fn test_log_json_expands_nutrition() {
        let stored = r#"{"calories":650,"protein":42.5,"fat":18,"carbs":80,"missing_nutrients":["鉄"]}"#;
        let value = log_json(&sample_log(Some(stored)));
        assert_eq!(value["nutrition_summary"]["calories"], 650.0);
        assert_eq!(value["nutrition_summary"]["missing_nutrients"][0], "鉄");
    }

    #[test]
    fn test_log_json_ignores_malformed_nutrition() {
        let value = log_json(&sample_log(Some("{broken")));
        assert!(value["nutrition_summary"].is_null());
    }
}
