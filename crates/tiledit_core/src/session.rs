//! Per-row state persisted by the shell between sessions.

use serde::{Deserialize, Serialize};

/// Toolbar text plus cursor and scroll positions of one row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowState {
    pub toolbar_str: String,
    pub toolbar_cursor_index: usize,
    pub ta_cursor_index: usize,
    pub ta_offset_index: usize,
}

impl RowState {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Clamp stored offsets against current content lengths; files may have
    /// shrunk since the session was saved.
    pub fn clamped(mut self, toolbar_len: usize, text_len: usize) -> Self {
        self.toolbar_cursor_index = self.toolbar_cursor_index.min(toolbar_len);
        self.ta_cursor_index = self.ta_cursor_index.min(text_len);
        self.ta_offset_index = self.ta_offset_index.min(text_len);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip_keeps_fields() {
        let state = RowState {
            toolbar_str: "/tmp/a.txt | Save".to_string(),
            toolbar_cursor_index: 3,
            ta_cursor_index: 120,
            ta_offset_index: 80,
        };
        let json = state.to_json().expect("serialize");
        assert!(json.contains("\"ta_offset_index\":80"));
        assert_eq!(RowState::from_json(&json).expect("parse"), state);
    }

    #[test]
    fn missing_fields_default() {
        let state = RowState::from_json(r#"{"toolbar_str":"x"}"#).expect("parse");
        assert_eq!(state.ta_cursor_index, 0);
        assert_eq!(state.clamped(0, 0).toolbar_cursor_index, 0);
    }

    #[test]
    fn clamps_to_shorter_content() {
        let state = RowState {
            ta_cursor_index: 50,
            ta_offset_index: 40,
            ..RowState::default()
        };
        let state = state.clamped(0, 10);
        assert_eq!((state.ta_cursor_index, state.ta_offset_index), (10, 10));
    }
}
