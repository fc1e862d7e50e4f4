//! Output formatting helpers for the CLI.
//!
//! JSON shapes for `--json` and text/table rendering for everything else.

mod json;
mod text;

pub use json::{log_json, logs_json, personal_best_json};
pub use text::{
    print_analysis, print_exercises, print_log, print_log_list, print_personal_best,
};
