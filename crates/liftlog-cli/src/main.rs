//! LiftLog CLI - A local-first training log for weightlifters
//!
//! This is the command-line interface for LiftLog. It provides a
//! user-friendly interface to the core library functionality.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;
mod ui;

use clap::Parser;

use crate::app::AppContext;
use crate::cli::{Cli, Commands, LogSubcommand, NutritionSubcommand, PbSubcommand};
use crate::commands::{
    account, analysis, calendar, exercises, export, init, logs, maintenance, misc, nutrition, pb,
};
use crate::errors::exit_code_for;
use crate::ui::render::print_error;

fn main() {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose, cli.quiet);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context(false);
        let error_msg = format!("{:#}", e);
        let (message, hint) = split_hint(&error_msg);
        print_error(&ui_ctx, message, hint);
        std::process::exit(exit_code_for(&e));
    }
}

/// Split a trailing "Hint: ..." line off an error message.
fn split_hint(error: &str) -> (&str, Option<&str>) {
    match error.find("\nHint: ") {
        Some(idx) => (&error[..idx], Some(&error[idx + "\nHint: ".len()..])),
        None => (error, None),
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => {
            init::handle_init(ctx, args)?;
        }
        Some(Commands::Signup(args)) => {
            account::handle_signup(ctx, args)?;
        }
        Some(Commands::Passwd(args)) => {
            account::handle_passwd(ctx, args)?;
        }
        Some(Commands::Users(args)) => {
            account::handle_users(ctx, args)?;
        }
        Some(Commands::Exercises(args)) => {
            exercises::handle_exercises(ctx, args)?;
        }
        Some(Commands::Calendar(args)) => {
            calendar::handle_calendar(ctx, args)?;
        }
        Some(Commands::Log(args)) => match &args.command {
            LogSubcommand::Show(show_args) => {
                logs::handle_show(ctx, show_args)?;
            }
            LogSubcommand::Save(save_args) => {
                logs::handle_save(ctx, save_args)?;
            }
            LogSubcommand::Delete(delete_args) => {
                logs::handle_delete(ctx, delete_args)?;
            }
            LogSubcommand::List(list_args) => {
                logs::handle_list(ctx, list_args)?;
            }
        },
        Some(Commands::Analysis(args)) => {
            analysis::handle_analysis(ctx, args)?;
        }
        Some(Commands::Export(args)) => {
            export::handle_export(ctx, args)?;
        }
        Some(Commands::Nutrition(args)) => match &args.command {
            NutritionSubcommand::Analyze(analyze_args) => {
                nutrition::handle_analyze(ctx, analyze_args)?;
            }
        },
        Some(Commands::Pb(args)) => match &args.command {
            PbSubcommand::Show(show_args) => {
                pb::handle_show(ctx, show_args)?;
            }
            PbSubcommand::Set(set_args) => {
                pb::handle_set(ctx, set_args)?;
            }
        },
        Some(Commands::Check) => {
            maintenance::handle_check(ctx)?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            print_quickstart();
        }
    }
    Ok(())
}

fn print_quickstart() {
    println!("LiftLog {}", liftlog_core::VERSION);
    println!();
    println!("Get started:");
    println!("  liftlog init");
    println!("  liftlog signup --email EMAIL --last-name NAME --first-name NAME");
    println!("  liftlog log save today --set スナッチ:60:3:5");
    println!("  liftlog analysis --range week");
    println!();
    println!("Run `liftlog --help` for all commands.");
}
