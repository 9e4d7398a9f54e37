use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// On-disk shape of the history file.
#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    historial: Vec<String>,
}

/// Persistent, deduplicated list of place names the user has looked up.
///
/// Entries are stored lowercase, newest first. Every successful `add`
/// rewrites the whole backing file. File I/O failures are logged and never
/// fatal; the in-memory list stays authoritative for the rest of the
/// session.
#[derive(Debug)]
pub struct SearchHistory {
    entries: Vec<String>,
    path: PathBuf,
}

impl SearchHistory {
    /// Open the history backed by `path`, loading entries if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut history = Self { entries: Vec::new(), path: path.into() };
        history.load();
        history
    }

    /// Record a search term. Terms are lowercased before comparison; a term
    /// already present is left in place rather than promoted to the front.
    pub fn add(&mut self, term: &str) {
        let term = term.to_lowercase();
        if self.entries.contains(&term) {
            return;
        }

        self.entries.insert(0, term);
        self.save();
    }

    /// Stored entries, newest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display form of the entries: each space-separated token with its
    /// first character uppercased.
    pub fn capitalized(&self) -> Vec<String> {
        self.entries.iter().map(|term| capitalize_term(term)).collect()
    }

    fn load(&mut self) {
        if !self.path.exists() {
            return;
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!("failed to read history file {}: {err}", self.path.display());
                return;
            }
        };

        match serde_json::from_str::<HistoryFile>(&contents) {
            Ok(file) => self.entries = file.historial,
            Err(err) => {
                tracing::warn!("failed to parse history file {}: {err}", self.path.display());
            }
        }
    }

    fn save(&self) {
        if let Some(parent) = self.path.parent()
            && let Err(err) = fs::create_dir_all(parent)
        {
            tracing::warn!("failed to create history directory {}: {err}", parent.display());
            return;
        }

        let payload = HistoryFile { historial: self.entries.clone() };
        let json = match serde_json::to_string(&payload) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("failed to serialize history: {err}");
                return;
            }
        };

        if let Err(err) = fs::write(&self.path, json) {
            tracing::warn!("failed to write history file {}: {err}", self.path.display());
        }
    }
}

/// Splits on single spaces, uppercases the first character of each token and
/// rejoins. Empty tokens (from doubled spaces) stay empty, preserving the
/// original spacing of stored entries.
fn capitalize_term(term: &str) -> String {
    term.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn history_in(dir: &tempfile::TempDir) -> SearchHistory {
        SearchHistory::open(dir.path().join("historial.json"))
    }

    #[test]
    fn add_stores_lowercase_and_dedups_case_insensitively() {
        let dir = tempdir().expect("tempdir");
        let mut history = history_in(&dir);

        history.add("Madrid");
        history.add("MADRID");
        history.add("madrid");

        assert_eq!(history.entries(), ["madrid"]);
    }

    #[test]
    fn newest_entry_is_first() {
        let dir = tempdir().expect("tempdir");
        let mut history = history_in(&dir);

        history.add("Madrid");
        history.add("Paris");

        assert_eq!(history.entries(), ["paris", "madrid"]);
    }

    #[test]
    fn re_adding_does_not_promote_an_existing_entry() {
        let dir = tempdir().expect("tempdir");
        let mut history = history_in(&dir);

        history.add("Madrid");
        history.add("Paris");
        history.add("Madrid");

        assert_eq!(history.entries(), ["paris", "madrid"]);
    }

    #[test]
    fn capitalized_uppercases_each_word() {
        let dir = tempdir().expect("tempdir");
        let mut history = history_in(&dir);

        history.add("new york");

        assert_eq!(history.capitalized(), ["New York"]);
    }

    #[test]
    fn capitalized_preserves_empty_tokens_from_doubled_spaces() {
        let dir = tempdir().expect("tempdir");
        let mut history = history_in(&dir);

        history.add("san  jose");

        assert_eq!(history.capitalized(), ["San  Jose"]);
    }

    #[test]
    fn entries_round_trip_through_the_backing_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("historial.json");

        {
            let mut history = SearchHistory::open(&path);
            history.add("Lima, Peru");
            history.add("Quito");
        }

        let reloaded = SearchHistory::open(&path);
        assert_eq!(reloaded.entries(), ["quito", "lima, peru"]);
    }

    #[test]
    fn backing_file_uses_the_historial_key() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("historial.json");

        let mut history = SearchHistory::open(&path);
        history.add("Madrid");

        let raw = fs::read_to_string(&path).expect("file written");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(value["historial"][0], "madrid");
    }

    #[test]
    fn missing_file_yields_an_empty_history() {
        let dir = tempdir().expect("tempdir");
        let history = SearchHistory::open(dir.path().join("nope.json"));

        assert!(history.is_empty());
    }

    #[test]
    fn malformed_file_yields_an_empty_history() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("historial.json");
        fs::write(&path, "{ not json").expect("write fixture");

        let history = SearchHistory::open(&path);
        assert!(history.is_empty());
    }

    #[test]
    fn write_failure_keeps_the_in_memory_entry() {
        let dir = tempdir().expect("tempdir");
        // Make the "parent directory" a regular file so the save fails.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").expect("write fixture");

        let mut history = SearchHistory::open(blocker.join("historial.json"));
        history.add("Madrid");

        assert_eq!(history.entries(), ["madrid"]);
    }
}
