//! JSONL file writer for consensus round audit records.
//!
//! Each [`AuditRecord`] is serialized as a single JSON line and appended to
//! the file via a buffered writer.

use magi_application::ports::audit_sink::{AuditRecord, AuditSink, AuditWriteError};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// Errors from replaying an audit log
#[derive(Debug, Error)]
pub enum AuditReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed audit record on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// JSONL audit sink that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Each record is written and
/// flushed while the lock is held, so concurrent rounds never interleave
/// partial lines. Flushes on `Drop`.
pub struct JsonlAuditSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditSink {
    /// Open the log at `path` for appending.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Existing records are kept.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditWriteError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!(path = %path.display(), "Opened audit log");

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlAuditSink {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditWriteError> {
        let line = record.to_line()?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| AuditWriteError::Unavailable("audit writer lock poisoned".to_string()))?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlAuditSink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

/// Read every record from a JSONL audit log, in file order.
///
/// Blank lines are skipped. The first malformed line aborts the read and is
/// reported by its 1-based line number.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<AuditRecord>, AuditReadError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = AuditRecord::parse_line(&line).map_err(|source| AuditReadError::Malformed {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use magi_domain::{Action, AgentVote, FinalDecision, Subject};
    use std::sync::Arc;

    fn decision(action: Action) -> FinalDecision {
        let votes = vec![
            AgentVote::new("Fundamental", action, 0.7, "Fundamental rule on price 1015").unwrap(),
            AgentVote::new("Technical", action, 0.654, "price above moving average").unwrap(),
            AgentVote::failed("Sentiment").unwrap(),
        ];
        let summary = format!("3 agent votes collected; final action: {}", action);
        FinalDecision::new(action, votes, summary).unwrap()
    }

    fn record(subject: &str, action: Action) -> AuditRecord {
        AuditRecord::from_decision(&Subject::new(subject).unwrap(), &decision(action))
    }

    #[test]
    fn test_jsonl_sink_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let sink = JsonlAuditSink::open(&path).unwrap();

        sink.append(&record("7203.T", Action::Buy)).unwrap();
        sink.append(&record("AAPL", Action::Sell)).unwrap();
        drop(sink);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["subject"], "7203.T");
        assert_eq!(first["final_action"], "BUY");
        assert_eq!(first["votes"][1]["confidence"], 0.65);
        assert!(first["timestamp"].as_str().unwrap().ends_with('Z'));

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["final_action"], "SELL");
    }

    #[test]
    fn test_jsonl_sink_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("nested").join("decisions.jsonl");

        let sink = JsonlAuditSink::open(&path).unwrap();
        sink.append(&record("AAPL", Action::Hold)).unwrap();

        assert_eq!(sink.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn test_jsonl_sink_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");

        JsonlAuditSink::open(&path)
            .unwrap()
            .append(&record("AAPL", Action::Buy))
            .unwrap();
        JsonlAuditSink::open(&path)
            .unwrap()
            .append(&record("MSFT", Action::Sell))
            .unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].subject.as_str(), "AAPL");
        assert_eq!(records[1].subject.as_str(), "MSFT");
    }

    #[test]
    fn test_roundtrip_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let written = record("7203.T", Action::Buy);

        JsonlAuditSink::open(&path).unwrap().append(&written).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records, vec![written]);
    }

    #[test]
    fn test_concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let sink = Arc::new(JsonlAuditSink::open(&path).unwrap());

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let sink = Arc::clone(&sink);
                scope.spawn(move || {
                    for i in 0..25 {
                        let subject = format!("T{}-{}", worker, i);
                        sink.append(&record(&subject, Action::Buy)).unwrap();
                    }
                });
            }
        });
        drop(sink);

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 200);
        assert!(records.iter().all(|r| r.votes.len() == 3));
    }

    #[test]
    fn test_read_records_reports_malformed_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let good = record("AAPL", Action::Buy).to_line().unwrap();
        std::fs::write(&path, format!("{}\n\n{{not json\n", good)).unwrap();

        let err = read_records(&path).unwrap_err();
        assert!(matches!(err, AuditReadError::Malformed { line: 3, .. }));
    }

    #[test]
    fn test_read_records_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_records(dir.path().join("missing.jsonl")).unwrap_err();
        assert!(matches!(err, AuditReadError::Io(_)));
    }
}
