use liftlog_core::analysis::{self, Period};

use crate::app::{acting_user, AppContext};
use crate::cli::AnalysisArgs;
use crate::output::print_analysis;

pub fn handle_analysis(ctx: &AppContext, args: &AnalysisArgs) -> anyhow::Result<()> {
    let period: Period = args.range.parse()?;
    let (store, user) = ctx.session()?;
    let target = acting_user(&store, &user, args.for_user.as_deref())?;
    let result = analysis::analyze(&store, &target, period, ctx.today()?)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_analysis(&ctx.ui_context(false), &result);
    Ok(())
}
