use liftlog_core::LogStore;

use crate::app::AppContext;
use crate::errors::CliError;
use crate::ui::{badge, hint, print, Badge, OutputMode};

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let ui = ctx.ui_context(false);

    match store.check_integrity() {
        Ok(()) => {
            if !ctx.quiet() {
                match ui.mode {
                    OutputMode::Pretty => {
                        print(&ui, &badge(&ui, Badge::Ok, "Integrity check: OK"));
                    }
                    OutputMode::Plain | OutputMode::Json => {
                        println!("check=foreign_keys ok");
                        println!("check=log_totals ok");
                        println!("status=ok");
                    }
                }
            }
            Ok(())
        }
        Err(err) => {
            match ui.mode {
                OutputMode::Pretty => {
                    print(&ui, &badge(&ui, Badge::Err, "Integrity check: FAILED"));
                    print(
                        &ui,
                        &hint(&ui, "Re-save the affected logs or restore from a backup."),
                    );
                }
                OutputMode::Plain | OutputMode::Json => {
                    eprintln!("status=failed");
                }
            }
            Err(CliError::IntegrityFailed(err.to_string()).into())
        }
    }
}
