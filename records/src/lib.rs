use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How many entries are kept per board configuration.
pub const MAX_ENTRIES: usize = 10;

/// Longest player name stored, in characters.
pub const MAX_NAME_LEN: usize = 32;

const DEFAULT_FILE_NAME: &str = ".minesweeper_highscores.json";

#[derive(Error, Debug)]
pub enum RecordsError {
    #[error("Could not write scores to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not encode scores")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RecordsError>;

/// Key under which the times of one board configuration are stored.
pub fn record_key(rows: u8, cols: u8, mines: u16) -> String {
    format!("{rows}x{cols}:{mines}")
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    /// Completion time in seconds.
    pub time: f64,
    /// Day the score was recorded, `YYYY-MM-DD`.
    pub when: String,
}

impl ScoreEntry {
    pub fn new(name: &str, time: f64, when: impl Into<String>) -> Self {
        Self {
            name: clean_name(name),
            time,
            when: when.into(),
        }
    }
}

fn clean_name(name: &str) -> String {
    let name: String = name.trim().chars().take(MAX_NAME_LEN).collect();
    if name.is_empty() {
        "anon".to_string()
    } else {
        name
    }
}

/// Best times per board configuration, keyed and serialized in sorted key order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreTable {
    records: BTreeMap<String, Vec<ScoreEntry>>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a time and keeps only the fastest [`MAX_ENTRIES`], ties in submission order.
    pub fn submit(
        &mut self,
        rows: u8,
        cols: u8,
        mines: u16,
        name: &str,
        elapsed: f64,
        when: impl Into<String>,
    ) -> &[ScoreEntry] {
        let entries = self.records.entry(record_key(rows, cols, mines)).or_default();
        entries.push(ScoreEntry::new(name, elapsed, when));
        entries.sort_by(|a, b| a.time.total_cmp(&b.time));
        entries.truncate(MAX_ENTRIES);
        entries
    }

    pub fn top10(&self, rows: u8, cols: u8, mines: u16) -> &[ScoreEntry] {
        self.records
            .get(&record_key(rows, cols, mines))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates configurations in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ScoreEntry])> {
        self.records
            .iter()
            .map(|(key, entries)| (key.as_str(), entries.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Today's local date in the format stored in [`ScoreEntry::when`].
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Score table persisted as JSON at a fixed path.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreFile {
    path: PathBuf,
}

impl ScoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.minesweeper_highscores.json`, or the working directory when no home is set.
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_default()
            .join(DEFAULT_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the table; a missing or unreadable file yields an empty one.
    pub fn load(&self) -> ScoreTable {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return ScoreTable::new(),
            Err(err) => {
                log::warn!("Could not read scores from {}: {}", self.path.display(), err);
                return ScoreTable::new();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|err| {
            log::warn!("Ignoring corrupt scores in {}: {}", self.path.display(), err);
            ScoreTable::new()
        })
    }

    pub fn save(&self, table: &ScoreTable) -> Result<()> {
        let json = table.to_json()?;
        fs::write(&self.path, json).map_err(|source| RecordsError::Write {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("Saved scores to {}", self.path.display());
        Ok(())
    }

    /// Load, submit, save; returns the updated list for the configuration.
    pub fn submit_score(
        &self,
        rows: u8,
        cols: u8,
        mines: u16,
        name: &str,
        elapsed: f64,
    ) -> Result<Vec<ScoreEntry>> {
        let mut table = self.load();
        let entries = table.submit(rows, cols, mines, name, elapsed, today()).to_vec();
        self.save(&table)?;
        Ok(entries)
    }

    pub fn top10(&self, rows: u8, cols: u8, mines: u16) -> Vec<ScoreEntry> {
        self.load().top10(rows, cols, mines).to_vec()
    }
}
