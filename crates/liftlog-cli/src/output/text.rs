//! Text and table output formatting.

use std::collections::BTreeMap;

use liftlog_core::analysis::Analysis;
use liftlog_core::catalog::{Exercise, PERSONAL_BEST_CODES};
use liftlog_core::nutrition::NutritionSummary;
use liftlog_core::storage::{PersonalBest, WorkoutLog};

use crate::ui::{
    bar, blank_line, divider, format_kg, format_optional, header, kv, print, simple_table,
    truncate, Column, UiContext,
};

const BAR_WIDTH: usize = 24;

/// Print a single log with its sets.
pub fn print_log(ui: &UiContext, log: &WorkoutLog) {
    let date = log.date.to_string();
    print(ui, &header(ui, "log", Some(&date)));
    print(ui, &kv(ui, "Date", &date));
    print(ui, &kv(ui, "Time zone", &format_optional(log.time_zone)));
    print(
        ui,
        &kv(ui, "Sleep", &format_optional(log.sleep_hours.map(format_kg))),
    );
    print(ui, &kv(ui, "Total tonnage", &format_kg(log.total_tonnage)));
    if let Some(summary) = log
        .nutrition_summary
        .as_deref()
        .and_then(NutritionSummary::from_stored)
    {
        print(ui, &kv(ui, "Nutrition", &summary.to_string()));
    }

    if log.sets.is_empty() {
        return;
    }
    blank_line(ui);
    let columns = [
        Column::new("Exercise"),
        Column::new("Weight"),
        Column::new("Reps"),
        Column::new("Sets"),
        Column::new("Tonnage"),
        Column::new("Body part"),
    ];
    let rows: Vec<Vec<String>> = log
        .sets
        .iter()
        .map(|set| {
            vec![
                truncate(&set.exercise_name, 24),
                format_kg(set.weight),
                set.reps.to_string(),
                set.sets.to_string(),
                format_kg(set.tonnage),
                set.body_part().to_string(),
            ]
        })
        .collect();
    print(ui, &simple_table(ui, &columns, &rows));
}

/// Print one row per log.
pub fn print_log_list(ui: &UiContext, logs: &[WorkoutLog]) {
    let columns = [
        Column::new("Date"),
        Column::new("Time zone"),
        Column::new("Sets"),
        Column::new("Tonnage"),
    ];
    let rows: Vec<Vec<String>> = logs
        .iter()
        .map(|log| {
            vec![
                log.date.to_string(),
                format_optional(log.time_zone),
                log.sets.len().to_string(),
                format_kg(log.total_tonnage),
            ]
        })
        .collect();
    print(ui, &simple_table(ui, &columns, &rows));
}

pub fn print_analysis(ui: &UiContext, analysis: &Analysis) {
    let range = format!("{}..{}", analysis.start, analysis.end);
    print(ui, &header(ui, "analysis", Some(analysis.period.label())));
    print(ui, &kv(ui, "Range", &range));
    print(ui, &kv(ui, "Logs", &analysis.log_count.to_string()));
    print(ui, &kv(ui, "Total tonnage", &format_kg(analysis.total_tonnage)));

    if analysis.log_count == 0 {
        return;
    }

    blank_line(ui);
    print(ui, &divider(ui));
    let max = analysis
        .breakdown
        .iter()
        .map(|share| share.tonnage)
        .fold(0.0, f64::max);
    let rows: Vec<Vec<String>> = analysis
        .breakdown
        .iter()
        .map(|share| {
            vec![
                share.body_part.to_string(),
                format_kg(share.tonnage),
                bar(ui, share.tonnage, max, BAR_WIDTH),
            ]
        })
        .collect();
    print(
        ui,
        &simple_table(
            ui,
            &[Column::new("Body part"), Column::new("Tonnage"), Column::new("")],
            &rows,
        ),
    );

    blank_line(ui);
    print(ui, &divider(ui));
    let max = analysis
        .trend
        .iter()
        .map(|point| point.tonnage)
        .fold(0.0, f64::max);
    let rows: Vec<Vec<String>> = analysis
        .trend
        .iter()
        .map(|point| {
            vec![
                point.label.clone(),
                format_kg(point.tonnage),
                bar(ui, point.tonnage, max, BAR_WIDTH),
            ]
        })
        .collect();
    print(
        ui,
        &simple_table(
            ui,
            &[Column::new("Day"), Column::new("Tonnage"), Column::new("")],
            &rows,
        ),
    );
}

/// Print the catalog grouped by `{category}-{major_category}`.
pub fn print_exercises(ui: &UiContext, grouped: &BTreeMap<String, Vec<&Exercise>>) {
    if ui.mode.is_pretty() {
        for (group, exercises) in grouped {
            print(ui, &kv(ui, group, &exercises.len().to_string()));
            for exercise in exercises {
                print(ui, &format!("  {}", exercise.name));
            }
        }
        return;
    }
    for (group, exercises) in grouped {
        for exercise in exercises {
            print(ui, &format!("{}\t{}", group, exercise.name));
        }
    }
}

/// Print one grade's personal bests, one row per tracked lift.
pub fn print_personal_best(ui: &UiContext, best: &PersonalBest) {
    print(ui, &header(ui, "pb", Some(best.grade.label())));
    print(ui, &kv(ui, "Grade", best.grade.label()));
    print(
        ui,
        &kv(ui, "Body weight", &format_optional(best.body_weight.map(format_kg))),
    );
    let rows: Vec<Vec<String>> = PERSONAL_BEST_CODES
        .iter()
        .map(|code| {
            vec![
                code.to_string(),
                format_optional(best.records.get(*code).copied().map(format_kg)),
            ]
        })
        .collect();
    print(
        ui,
        &simple_table(ui, &[Column::new("Lift"), Column::new("KG")], &rows),
    );
}
