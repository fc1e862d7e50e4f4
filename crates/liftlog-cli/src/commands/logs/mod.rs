//! `log` subcommands: show, save, delete and list daily logs.

mod delete;
mod list;
mod save;
mod show;

pub use delete::handle_delete;
pub use list::handle_list;
pub use save::handle_save;
pub use show::handle_show;
