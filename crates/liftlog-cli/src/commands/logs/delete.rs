use dialoguer::Confirm;

use liftlog_core::{LiftLogError, LogStore};

use crate::app::AppContext;
use crate::cli::LogDeleteArgs;
use crate::errors::CliError;
use crate::helpers::parse_date;
use crate::ui::{print, receipt};

pub fn handle_delete(ctx: &AppContext, args: &LogDeleteArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    let (mut store, user) = ctx.session()?;
    let date = parse_date(&args.date, ctx.today()?)?;

    if !args.yes && ui.is_interactive() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete the log for {}?", date))
            .default(false)
            .interact()?;
        if !confirmed {
            print(&ui, "Cancelled.");
            return Ok(());
        }
    }

    match store.delete(&user, date) {
        Ok(()) => {}
        Err(LiftLogError::NotFound(_)) => {
            return Err(CliError::not_found(
                format!("No log for {}", date),
                "Hint: Run `liftlog log list` to see logged dates.",
            )
            .into());
        }
        Err(err) => return Err(err.into()),
    }

    if !ctx.quiet() {
        let date_text = date.to_string();
        print(&ui, &receipt(&ui, "Log deleted", &[("Date", &date_text)]));
    }
    Ok(())
}
