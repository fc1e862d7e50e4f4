use liftlog_core::calendar::{first_of_month, last_of_month, parse_month, LogCalendar};
use liftlog_core::LogStore;

use crate::app::AppContext;
use crate::cli::CalendarArgs;
use crate::output::print_log_list;
use crate::ui::{blank_line, print};

pub fn handle_calendar(ctx: &AppContext, args: &CalendarArgs) -> anyhow::Result<()> {
    let (store, user) = ctx.session()?;
    let today = ctx.today()?;

    let (month, calendar) = match args.month.as_deref() {
        Some(value) => {
            let month = parse_month(value)?;
            let logs =
                store.get_by_date_range(&user, first_of_month(month), last_of_month(month)?)?;
            (month, LogCalendar::from_logs(logs))
        }
        None => (today, LogCalendar::load(&store, &user, today)?),
    };
    let logs: Vec<_> = calendar.in_month(month)?.cloned().collect();

    if args.json {
        let days: Vec<serde_json::Value> = logs
            .iter()
            .map(|log| {
                serde_json::json!({
                    "date": log.date,
                    "total_tonnage": log.total_tonnage,
                    "sets": log.sets.len(),
                })
            })
            .collect();
        let output = serde_json::json!({
            "month": first_of_month(month).format("%Y-%m").to_string(),
            "days": days,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let ui = ctx.ui_context(false);
    print(&ui, calendar.render_month(month)?.trim_end());
    if !logs.is_empty() {
        blank_line(&ui);
        print_log_list(&ui, &logs);
    }
    Ok(())
}
