//! Record Sink
//!
//! Optional persistence cho Verdict / RiskScoreRecord / Alert.
//! Engine không sở hữu durable storage - chỉ append ra sink nếu được cấu hình.
//!
//! JsonlSink: một file JSONL cho mỗi loại record mỗi ngày, e.g.
//! `scores-2026-02-20.jsonl`.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;

use crate::constants::DATA_DIR_NAME;
use crate::error::EngineResult;
use crate::logic::alerts::Alert;
use crate::logic::risk::RiskScoreRecord;
use crate::logic::severity::Verdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Verdict,
    Score,
    Alert,
}

impl RecordKind {
    pub fn file_prefix(&self) -> &'static str {
        match self {
            RecordKind::Verdict => "verdicts",
            RecordKind::Score => "scores",
            RecordKind::Alert => "alerts",
        }
    }
}

/// Where evaluated records go after scoring
pub trait RecordSink: Send + Sync {
    fn write_verdict(&self, verdict: &Verdict) -> EngineResult<()>;
    fn write_score(&self, record: &RiskScoreRecord) -> EngineResult<()>;
    /// Called on create and on every state change (later lines supersede)
    fn write_alert(&self, alert: &Alert) -> EngineResult<()>;
}

/// Sink directory for `AURALITE_SINK_DIR=default`
pub fn default_sink_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
        .join("records")
}

pub struct JsonlSink {
    base_dir: PathBuf,
    /// (kind, file date) → open handle
    files: Mutex<HashMap<RecordKind, (String, File)>>,
}

impl JsonlSink {
    pub fn from_path(base_dir: PathBuf) -> EngineResult<Self> {
        fs::create_dir_all(&base_dir)?;
        log::info!("Record sink at {}", base_dir.display());
        Ok(Self {
            base_dir,
            files: Mutex::new(HashMap::new()),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn append<T: Serialize>(&self, kind: RecordKind, record: &T) -> EngineResult<()> {
        let line = serde_json::to_string(record)?;
        let today = Utc::now().format("%Y-%m-%d").to_string();

        let mut files = self.files.lock();
        let stale = files.get(&kind).map_or(true, |(date, _)| *date != today);
        if stale {
            let path = self
                .base_dir
                .join(format!("{}-{}.jsonl", kind.file_prefix(), today));
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            files.insert(kind, (today, file));
        }

        if let Some((_, file)) = files.get_mut(&kind) {
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }
}

impl RecordSink for JsonlSink {
    fn write_verdict(&self, verdict: &Verdict) -> EngineResult<()> {
        self.append(RecordKind::Verdict, verdict)
    }

    fn write_score(&self, record: &RiskScoreRecord) -> EngineResult<()> {
        self.append(RecordKind::Score, record)
    }

    fn write_alert(&self, alert: &Alert) -> EngineResult<()> {
        self.append(RecordKind::Alert, alert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::alerts::{AlertDraft, AlertManager};
    use crate::logic::risk::{IndicatorSnapshot, RiskEngine};
    use crate::logic::severity::{aggregate, Severity};
    use tempfile::tempdir;

    fn lines_in(dir: &Path, prefix: &str) -> Vec<String> {
        let mut lines = Vec::new();
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            if name.starts_with(prefix) && name.ends_with(".jsonl") {
                let content = fs::read_to_string(&path).unwrap();
                lines.extend(content.lines().map(String::from));
            }
        }
        lines
    }

    #[test]
    fn test_one_line_per_record() {
        let dir = tempdir().unwrap();
        let sink = JsonlSink::from_path(dir.path().to_path_buf()).unwrap();

        let engine = RiskEngine::default();
        for i in 0..3 {
            let rec = engine
                .score(&IndicatorSnapshot::new("raj_001", 0.1 * i as f64, 0.2, 0.1))
                .unwrap();
            sink.write_score(&rec).unwrap();
        }
        sink.write_verdict(&aggregate("raj_001", vec![], Utc::now())).unwrap();

        let scores = lines_in(dir.path(), "scores");
        assert_eq!(scores.len(), 3);
        let back: RiskScoreRecord = serde_json::from_str(&scores[0]).unwrap();
        assert_eq!(back.location_id, "raj_001");
        assert_eq!(lines_in(dir.path(), "verdicts").len(), 1);
    }

    #[test]
    fn test_alert_lines() {
        let dir = tempdir().unwrap();
        let sink = JsonlSink::from_path(dir.path().join("nested")).unwrap();
        let mgr = AlertManager::new();
        let alert = mgr.create(AlertDraft::new("t", "m", Severity::High, "raj_001"));

        sink.write_alert(&alert).unwrap();
        mgr.acknowledge(alert.id);
        sink.write_alert(&mgr.get(alert.id).unwrap()).unwrap();

        let lines = lines_in(&dir.path().join("nested"), "alerts");
        assert_eq!(lines.len(), 2);
        let last: Alert = serde_json::from_str(&lines[1]).unwrap();
        assert!(last.acknowledged);
    }
}
