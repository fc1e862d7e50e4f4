use std::collections::BTreeMap;

use liftlog_core::catalog::{filter_exercises, Exercise, ExerciseCategory};
use liftlog_core::LogStore;

use crate::app::AppContext;
use crate::cli::ExercisesArgs;
use crate::output::print_exercises;

pub fn handle_exercises(ctx: &AppContext, args: &ExercisesArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let exercises = store.list_exercises()?;

    let category = args
        .category
        .as_deref()
        .map(str::parse::<ExerciseCategory>)
        .transpose()?;
    let matched = filter_exercises(
        &exercises,
        args.query.as_deref(),
        category,
        args.major.as_deref(),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&matched)?);
        return Ok(());
    }

    let ui = ctx.ui_context(false);
    let mut grouped: BTreeMap<String, Vec<&Exercise>> = BTreeMap::new();
    for exercise in matched {
        grouped.entry(exercise.group_key()).or_default().push(exercise);
    }
    print_exercises(&ui, &grouped);
    Ok(())
}
