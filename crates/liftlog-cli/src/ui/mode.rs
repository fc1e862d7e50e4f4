//! Output mode routing.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// JSON on stdout, nothing else
    Json,
    /// `key=value` lines and tab-separated tables for scripts
    #[default]
    Plain,
    /// Colors, headers and boxed tables (TTY only)
    Pretty,
}

impl OutputMode {
    /// `--json` wins; otherwise pretty only on a capable TTY.
    pub fn resolve(json: bool, is_tty: bool, term_is_dumb: bool) -> Self {
        if json {
            Self::Json
        } else if is_tty && !term_is_dumb {
            Self::Pretty
        } else {
            Self::Plain
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}
