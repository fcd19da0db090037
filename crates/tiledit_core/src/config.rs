//! Configuration loading from environment variables.

use crate::constants::*;
use serde::Deserialize;
use std::env;

/// Tunables for the editing engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tab_width: usize,
    pub search_chunk_size: usize,
    pub newline_scan_max: usize,
    pub word_highlight_lookup: usize,
    pub parenthesis_window: usize,
    pub syntax_window: usize,
    pub clipboard_timeout_ms: u64,
    pub cursor_added_width: i32,
    pub line_wrap: bool,
    pub wrap_indicator: char,
    pub annotation_min_columns: usize,
    pub annotation_right_margin_columns: usize,
    pub undo_max_groups: usize,
    pub undo_max_bytes: usize,
    pub undo_coalesce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            search_chunk_size: DEFAULT_SEARCH_CHUNK_SIZE,
            newline_scan_max: DEFAULT_NEWLINE_SCAN_MAX,
            word_highlight_lookup: DEFAULT_WORD_HIGHLIGHT_LOOKUP,
            parenthesis_window: DEFAULT_PARENTHESIS_WINDOW,
            syntax_window: DEFAULT_SYNTAX_WINDOW,
            clipboard_timeout_ms: DEFAULT_CLIPBOARD_TIMEOUT_MS,
            cursor_added_width: 1,
            line_wrap: true,
            wrap_indicator: DEFAULT_WRAP_INDICATOR,
            annotation_min_columns: DEFAULT_ANNOTATION_MIN_COLUMNS,
            annotation_right_margin_columns: 1,
            undo_max_groups: DEFAULT_UNDO_MAX_GROUPS,
            undo_max_bytes: DEFAULT_UNDO_MAX_BYTES,
            undo_coalesce_ms: DEFAULT_UNDO_COALESCE_MS,
        }
    }
}

/// `1`/`0` or a case-insensitive `true`/`false`.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "1" => Some(true),
        "0" => Some(false),
        other => other.to_ascii_lowercase().parse().ok(),
    }
}

impl Config {
    /// Load configuration from `TILEDIT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from a variable lookup. Missing or malformed values
    /// keep their defaults.
    pub fn from_lookup<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let num = |name: &str| lookup(name).and_then(|v| v.trim().parse::<usize>().ok());
        let base = Self::default();
        Self {
            tab_width: num("TILEDIT_TAB_WIDTH")
                .filter(|w| *w > 0)
                .unwrap_or(base.tab_width),
            search_chunk_size: num("TILEDIT_SEARCH_CHUNK_SIZE")
                .filter(|n| *n >= 64)
                .unwrap_or(base.search_chunk_size),
            newline_scan_max: num("TILEDIT_NEWLINE_SCAN_MAX").unwrap_or(base.newline_scan_max),
            undo_max_groups: num("TILEDIT_UNDO_MAX_GROUPS")
                .filter(|n| *n > 0)
                .unwrap_or(base.undo_max_groups),
            clipboard_timeout_ms: lookup("TILEDIT_CLIPBOARD_TIMEOUT_MS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(base.clipboard_timeout_ms),
            line_wrap: lookup("TILEDIT_LINE_WRAP")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(base.line_wrap),
            wrap_indicator: lookup("TILEDIT_WRAP_INDICATOR")
                .and_then(|v| v.chars().next())
                .unwrap_or(base.wrap_indicator),
            ..base
        }
    }
}
