use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::models::Homework;

pub const FIELD_DELIMITER: char = ',';

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a stored line could not be turned back into a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("expected 2 fields, found {0}")]
    FieldCount(usize),
    #[error("timestamp is not an integer: {0:?}")]
    Timestamp(String),
    #[error("timestamp out of range: {0}")]
    OutOfRange(i64),
    #[error("line is not valid UTF-8")]
    Encoding,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    /// (1-based line number, reason) for every line that was skipped.
    pub skipped: Vec<(usize, LineError)>,
}

// ─── Line format ─────────────────────────────────────────────────────────────

pub fn format_line(hw: &Homework) -> String {
    format!("{}{FIELD_DELIMITER}{}", hw.name, hw.due_millis())
}

/// Parse `name,epochMillis` into a record, recomputing days left against `now`.
pub fn parse_line(line: &str, now: DateTime<Utc>) -> Result<Homework, LineError> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    let [name, millis] = fields.as_slice() else {
        return Err(LineError::FieldCount(fields.len()));
    };
    let millis: i64 = millis
        .trim()
        .parse()
        .map_err(|_| LineError::Timestamp(millis.to_string()))?;
    let due_at = DateTime::from_timestamp_millis(millis).ok_or(LineError::OutOfRange(millis))?;
    Ok(Homework::new(*name, due_at, now))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The homework collection plus the flat file it is persisted to.
///
/// The records vector is the only source of truth; views render from
/// `records()` after every mutation.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    records: Vec<Homework>,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
        }
    }

    /// Create a store for `path` and load whatever it already holds.
    ///
    /// Load errors are logged, not returned: the store keeps every record
    /// read before the failure.
    pub fn open(path: impl Into<PathBuf>, now: DateTime<Utc>) -> Self {
        let mut store = Self::new(path);
        if let Err(e) = store.load(now) {
            tracing::error!(error = %e, loaded = store.len(), "homework load aborted");
        }
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[Homework] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append and re-sort so the collection stays ascending by due date.
    pub fn add(&mut self, hw: Homework) {
        tracing::info!(name = %hw.name, due = %hw.due_at, "adding homework");
        self.records.push(hw);
        self.sort_by_due_date();
    }

    /// Remove the record at `index`. Out-of-range indices are a no-op.
    /// Remaining records keep their relative order.
    pub fn remove_at(&mut self, index: usize) -> Option<Homework> {
        if index >= self.records.len() {
            return None;
        }
        let removed = self.records.remove(index);
        tracing::info!(name = %removed.name, index, "removed homework");
        Some(removed)
    }

    /// Stable sort: records sharing a due date keep their prior order.
    pub fn sort_by_due_date(&mut self) {
        self.records.sort_by_key(|hw| hw.due_at);
    }

    /// Run `mutate`, then persist the whole collection.
    ///
    /// Save failures are logged and swallowed: the in-memory state stays
    /// authoritative for the rest of the session.
    pub fn transact<T>(&mut self, mutate: impl FnOnce(&mut Self) -> T) -> T {
        let out = mutate(self);
        if let Err(e) = self.save() {
            tracing::error!(error = %e, "failed to save homework");
        }
        out
    }

    /// Overwrite the backing file with one `name,epochMillis` line per record.
    pub fn save(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut out = String::new();
        for hw in &self.records {
            if hw.name.contains(FIELD_DELIMITER) {
                tracing::warn!(
                    name = %hw.name,
                    "homework name contains '{FIELD_DELIMITER}'; this line will not load back"
                );
            }
            out.push_str(&format_line(hw));
            out.push('\n');
        }

        let mut file = File::create(&self.path).map_err(io_err)?;
        file.write_all(out.as_bytes()).map_err(io_err)?;
        tracing::debug!(path = %self.path.display(), count = self.records.len(), "saved homework");
        Ok(())
    }

    /// Append every record stored in the backing file, in file order.
    ///
    /// A missing file is an empty store. Malformed lines are skipped and
    /// reported; a read error aborts the rest of the load but keeps what was
    /// read so far.
    pub fn load(&mut self, now: DateTime<Utc>) -> Result<LoadReport, StoreError> {
        let mut report = LoadReport::default();

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no homework file yet");
                return Ok(report);
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        self.load_from(BufReader::new(file), now, &mut report)?;

        tracing::info!(
            path = %self.path.display(),
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "loaded homework"
        );
        Ok(report)
    }

    /// Read `name,epochMillis` lines until EOF or the first read error.
    fn load_from(
        &mut self,
        mut reader: impl BufRead,
        now: DateTime<Utc>,
        report: &mut LoadReport,
    ) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let mut line_no = 0;
        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| StoreError::Io {
                    path: self.path.clone(),
                    source,
                })?;
            if n == 0 {
                return Ok(());
            }
            line_no += 1;

            let parsed = match std::str::from_utf8(&buf) {
                Ok(text) => {
                    let line = text.trim_end_matches(['\n', '\r']);
                    if line.trim().is_empty() {
                        continue;
                    }
                    parse_line(line, now)
                }
                Err(_) => Err(LineError::Encoding),
            };
            match parsed {
                Ok(hw) => {
                    self.records.push(hw);
                    report.loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(line = line_no, error = %e, "skipping malformed homework line");
                    report.skipped.push((line_no, e));
                }
            }
        }
    }
}
