use liftlog_core::storage::{Grade, PersonalBest};
use liftlog_core::LogStore;

use crate::app::AppContext;
use crate::cli::{PbSetArgs, PbShowArgs};
use crate::errors::CliError;
use crate::helpers::parse_records;
use crate::output::{personal_best_json, print_personal_best};
use crate::ui::{blank_line, hint, print};

pub fn handle_show(ctx: &AppContext, args: &PbShowArgs) -> anyhow::Result<()> {
    let grade: Option<Grade> = args
        .grade
        .as_deref()
        .map(str::parse::<Grade>)
        .transpose()?;
    let (store, user) = ctx.session()?;

    let bests: Vec<PersonalBest> = match grade {
        Some(grade) => store.get_personal_best(&user, grade)?.into_iter().collect(),
        None => store.list_personal_bests(&user)?,
    };

    if args.json {
        let output: Vec<serde_json::Value> = bests.iter().map(personal_best_json).collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let ui = ctx.ui_context(false);
    if bests.is_empty() {
        print(&ui, "No personal bests recorded.");
        print(&ui, &hint(&ui, "liftlog pb set --grade GRADE --record S=80"));
        return Ok(());
    }
    for (index, best) in bests.iter().enumerate() {
        if index > 0 {
            blank_line(&ui);
        }
        print_personal_best(&ui, best);
    }
    Ok(())
}

/// Update one grade. Lifts not named keep their current record; `CODE=0`
/// clears one.
pub fn handle_set(ctx: &AppContext, args: &PbSetArgs) -> anyhow::Result<()> {
    let grade: Grade = args.grade.parse()?;
    if let Some(weight) = args.body_weight {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(CliError::invalid_input(format!(
                "Body weight must be greater than zero: {}",
                weight
            ))
            .into());
        }
    }
    let updates = parse_records(&args.records)?;

    let (mut store, user) = ctx.session()?;
    let existing = store.get_personal_best(&user, grade)?;
    let mut records = existing
        .as_ref()
        .map(|best| best.records.clone())
        .unwrap_or_default();
    records.extend(updates);
    let body_weight = args
        .body_weight
        .or_else(|| existing.as_ref().and_then(|best| best.body_weight));

    let saved = store.save_personal_best(&user, grade, body_weight, &records)?;
    if !ctx.quiet() {
        print_personal_best(&ctx.ui_context(false), &saved);
    }
    Ok(())
}
