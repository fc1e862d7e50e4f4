use std::path::Path;

use liftlog_core::nutrition::analyze_file;
use liftlog_core::LogStore;

use crate::app::AppContext;
use crate::cli::LogSaveArgs;
use crate::errors::CliError;
use crate::helpers::{log_form, parse_date, parse_nutrition_json, parse_sets};
use crate::output::log_json;
use crate::ui::{badge, format_kg, print, receipt, Badge};

/// Save the log for a date.
///
/// Options left out keep the values of the existing log; `--set` replaces
/// the whole set list.
pub fn handle_save(ctx: &AppContext, args: &LogSaveArgs) -> anyhow::Result<()> {
    if let Some(hours) = args.sleep {
        if !hours.is_finite() || !(0.0..=24.0).contains(&hours) {
            return Err(CliError::invalid_input(format!(
                "Sleep hours must be between 0 and 24: {}",
                hours
            ))
            .into());
        }
    }

    let (mut store, user) = ctx.session()?;
    let date = parse_date(&args.date, ctx.today()?)?;

    let existing = store.get_by_date(&user, date)?;
    let (mut fields, mut sets) = log_form(existing.as_ref());

    if !args.sets.is_empty() {
        sets = parse_sets(&args.sets)?;
    }
    if let Some(slot) = args.time_zone.as_deref() {
        fields.time_zone = Some(slot.parse()?);
    }
    if let Some(hours) = args.sleep {
        fields.sleep_hours = Some(hours);
    }
    if let Some(text) = args.nutrition_json.as_deref() {
        fields.nutrition_summary = Some(parse_nutrition_json(text)?.to_stored()?);
    }
    if let Some(photo) = args.meal_photo.as_deref() {
        let client = ctx.nutrition_client()?;
        let summary = analyze_file(&client, Path::new(photo))?;
        fields.nutrition_summary = Some(summary.to_stored()?);
    }

    let requested = sets.len();
    let log = store.save(&user, date, &fields, &sets)?;
    let dropped = requested - log.sets.len();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&log_json(&log))?);
        return Ok(());
    }
    if ctx.quiet() {
        return Ok(());
    }

    let ui = ctx.ui_context(false);
    if dropped > 0 {
        print(
            &ui,
            &badge(
                &ui,
                Badge::Warn,
                &format!(
                    "Skipped {} invalid set entr{}",
                    dropped,
                    if dropped == 1 { "y" } else { "ies" }
                ),
            ),
        );
    }
    let date_text = date.to_string();
    let set_count = log.sets.len().to_string();
    let total = format_kg(log.total_tonnage);
    print(
        &ui,
        &receipt(
            &ui,
            "Log saved",
            &[
                ("Date", &date_text),
                ("Sets", &set_count),
                ("Total tonnage", &total),
            ],
        ),
    );
    Ok(())
}
