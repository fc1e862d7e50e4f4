use liftlog_core::calendar::month_window;
use liftlog_core::LogStore;

use crate::app::AppContext;
use crate::cli::LogListArgs;
use crate::errors::CliError;
use crate::helpers::parse_date;
use crate::output::{logs_json, print_log_list};

/// List logs; the range defaults to the calendar window.
pub fn handle_list(ctx: &AppContext, args: &LogListArgs) -> anyhow::Result<()> {
    let (store, user) = ctx.session()?;
    let today = ctx.today()?;
    let (default_start, default_end) = month_window(today)?;

    let start = match args.since.as_deref() {
        Some(value) => parse_date(value, today)?,
        None => default_start,
    };
    let end = match args.until.as_deref() {
        Some(value) => parse_date(value, today)?,
        None => default_end,
    };
    if start > end {
        return Err(CliError::invalid_input(format!(
            "--since {} is after --until {}",
            start, end
        ))
        .into());
    }

    let logs = store.get_by_date_range(&user, start, end)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&logs_json(&logs))?);
        return Ok(());
    }

    print_log_list(&ctx.ui_context(false), &logs);
    Ok(())
}
