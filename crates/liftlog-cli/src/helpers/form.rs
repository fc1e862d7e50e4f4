//! Pre-filling save requests from an existing log.

use liftlog_core::storage::{LogFields, WorkoutLog};
use liftlog_core::RawSet;

/// The editor form for a date: the existing log's fields and sets, or empty.
pub fn log_form(existing: Option<&WorkoutLog>) -> (LogFields, Vec<RawSet>) {
    let Some(log) = existing else {
        return (LogFields::new(), Vec::new());
    };
    let fields = LogFields {
        time_zone: log.time_zone,
        sleep_hours: log.sleep_hours,
        nutrition_summary: log.nutrition_summary.clone(),
    };
    let sets = log
        .sets
        .iter()
        .map(|set| RawSet::new(set.exercise_name.clone(), set.weight, set.reps, set.sets))
        .collect();
    (fields, sets)
}
