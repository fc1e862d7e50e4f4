//! Terminal detection for output decisions.

use std::io::IsTerminal;

use super::mode::OutputMode;

const DEFAULT_WIDTH: usize = 80;

#[derive(Debug, Clone)]
pub struct UiContext {
    pub is_tty: bool,
    pub color: bool,
    pub unicode: bool,
    /// Columns, from `COLUMNS` when set.
    pub width: usize,
    pub mode: OutputMode,
}

impl UiContext {
    /// Build from the global `--json`, `--no-color` and `--ascii` flags.
    /// `NO_COLOR` and `TERM=dumb` also turn color off.
    pub fn from_env(json: bool, no_color: bool, ascii: bool) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let color = is_tty && !no_color && !dumb && std::env::var_os("NO_COLOR").is_none();

        Self {
            is_tty,
            color,
            unicode: !ascii,
            width: terminal_width().unwrap_or(DEFAULT_WIDTH),
            mode: OutputMode::resolve(json, is_tty, dumb),
        }
    }

    /// Prompts need both ends of the terminal.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && std::io::stdin().is_terminal()
    }
}

fn terminal_width() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|cols| cols.parse::<usize>().ok())
        .filter(|width| *width > 0)
}
