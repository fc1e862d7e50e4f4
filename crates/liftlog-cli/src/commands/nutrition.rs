use std::path::Path;

use liftlog_core::nutrition::analyze_file;
use liftlog_core::LogStore;

use crate::app::AppContext;
use crate::cli::NutritionAnalyzeArgs;
use crate::helpers::{log_form, parse_date};
use crate::ui::{format_kg, kv, print};

/// Analyze a meal photo and optionally attach the result to a day's log.
pub fn handle_analyze(ctx: &AppContext, args: &NutritionAnalyzeArgs) -> anyhow::Result<()> {
    let client = ctx.nutrition_client()?;
    let summary = analyze_file(&client, Path::new(&args.photo))?;

    if let Some(value) = args.date.as_deref() {
        let (mut store, user) = ctx.session()?;
        let date = parse_date(value, ctx.today()?)?;
        let existing = store.get_by_date(&user, date)?;
        let (mut fields, sets) = log_form(existing.as_ref());
        fields.nutrition_summary = Some(summary.to_stored()?);
        store.save(&user, date, &fields, &sets)?;
        log::info!("Attached nutrition summary to {}", date);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let ui = ctx.ui_context(false);
    print(&ui, &kv(&ui, "Calories", &format!("{} kcal", format_kg(summary.calories))));
    print(&ui, &kv(&ui, "Protein", &format!("{} g", format_kg(summary.protein))));
    print(&ui, &kv(&ui, "Fat", &format!("{} g", format_kg(summary.fat))));
    print(&ui, &kv(&ui, "Carbs", &format!("{} g", format_kg(summary.carbs))));
    if !summary.missing_nutrients.is_empty() {
        print(&ui, &kv(&ui, "Missing", &summary.missing_nutrients.join(", ")));
    }
    if let Some(value) = args.date.as_deref() {
        print(&ui, &kv(&ui, "Attached", value));
    }
    Ok(())
}
