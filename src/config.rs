use std::{env, path::PathBuf, str::FromStr};

use minesweeper_common::models::GameParams;
use tracing::warn;

use crate::results::ResultFormat;

/// Host settings, read from `MINESWEEPER_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub params: GameParams,
    /// Clock ticks per second.
    pub framerate: u32,
    pub results_file: Option<PathBuf>,
    pub results_format: ResultFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            params: GameParams::default(),
            framerate: 60,
            results_file: None,
            results_format: ResultFormat::Text,
        }
    }
}

fn read<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    match lookup(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}", name, raw);
            default
        }),
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup, falling back to
    /// defaults for anything missing or unparsable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let width = read(&lookup, "MINESWEEPER_WIDTH", defaults.params.width);
        let height = read(&lookup, "MINESWEEPER_HEIGHT", defaults.params.height);
        let mines = read(&lookup, "MINESWEEPER_MINES", defaults.params.mines);
        let framerate = read(&lookup, "MINESWEEPER_FRAMERATE", defaults.framerate).max(1);
        let results_format = read(
            &lookup,
            "MINESWEEPER_RESULTS_FORMAT",
            defaults.results_format,
        );

        let results_file = lookup("MINESWEEPER_RESULTS_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Self {
            params: GameParams {
                width,
                height,
                mines,
            },
            framerate,
            results_file,
            results_format,
        }
    }
}
