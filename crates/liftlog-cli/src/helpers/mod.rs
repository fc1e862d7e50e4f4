//! Helper functions for argument parsing and form pre-filling.

mod form;
mod parsing;

pub use form::log_form;
pub use parsing::{parse_date, parse_nutrition_json, parse_records, parse_sets};
