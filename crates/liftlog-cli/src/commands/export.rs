use std::path::PathBuf;

use liftlog_core::analysis::{load_logs, Period};
use liftlog_core::export::{file_name, write_workbook, DEFAULT_USER_NAME};
use liftlog_core::LogStore;

use crate::app::{acting_user, AppContext};
use crate::cli::ExportArgs;
use crate::ui::{print, receipt};

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let period: Period = args.range.parse()?;
    let (store, user) = ctx.session()?;
    let target = acting_user(&store, &user, args.for_user.as_deref())?;
    let today = ctx.today()?;

    // Named after the exported account, not the admin running it.
    let user_name = store
        .get_profile(&target.user_id)?
        .map(|profile| profile.full_name())
        .unwrap_or_else(|| DEFAULT_USER_NAME.to_string());
    let logs = load_logs(&store, &target, period, today)?;

    let path = match args.output.as_deref() {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(file_name(&user_name, today)),
    };
    write_workbook(&path, &user_name, period, &logs)?;

    if !ctx.quiet() {
        let ui = ctx.ui_context(false);
        let path_text = path.display().to_string();
        let count = logs.len().to_string();
        print(
            &ui,
            &receipt(
                &ui,
                "Exported",
                &[
                    ("File", &path_text),
                    ("Range", period.label()),
                    ("Logs", &count),
                ],
            ),
        );
    }
    Ok(())
}
