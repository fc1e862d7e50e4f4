use liftlog_core::calendar::LogCalendar;

use crate::app::AppContext;
use crate::cli::LogShowArgs;
use crate::helpers::parse_date;
use crate::output::{log_json, print_log};
use crate::ui::{badge, hint, print, Badge};

pub fn handle_show(ctx: &AppContext, args: &LogShowArgs) -> anyhow::Result<()> {
    let (store, user) = ctx.session()?;
    let today = ctx.today()?;
    let date = parse_date(&args.date, today)?;

    let mut calendar = LogCalendar::load(&store, &user, today)?;
    let log = calendar.select(&store, &user, date);

    if args.json {
        let output = log.as_ref().map(log_json).unwrap_or(serde_json::Value::Null);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let ui = ctx.ui_context(false);
    match log {
        Some(log) => print_log(&ui, &log),
        None => {
            print(&ui, &badge(&ui, Badge::Info, &format!("No log for {}", date)));
            print(
                &ui,
                &hint(
                    &ui,
                    &format!("liftlog log save {} --set NAME:WEIGHT:REPS:SETS", date),
                ),
            );
        }
    }
    Ok(())
}
