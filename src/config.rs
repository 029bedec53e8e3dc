use std::{env, path::PathBuf};

use crate::storage::resolve_data_path;
use crate::themes::{theme_by_id, Theme};

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Snapshot file; `None` keeps the journal in memory only.
    pub data_path: Option<PathBuf>,
    pub theme: &'static Theme,
}

impl Config {
    /// Reads `PORT`, `JOURNAL_DATA_PATH` and `JOURNAL_THEME`.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let theme = theme_by_id(&env::var("JOURNAL_THEME").unwrap_or_default());

        Self {
            port,
            data_path: resolve_data_path(),
            theme,
        }
    }
}
