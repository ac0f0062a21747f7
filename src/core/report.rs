//! Session report assembly
//!
//! Text lines are rendered by each task; the report also keeps a structured
//! record per line for JSON output.

use crate::core::FileTask;
use crate::error::Result;
use crate::hash::AlgorithmDigest;
use serde::Serialize;

/// Outcome of one report line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// File hashed
    Completed,
    /// File could not be read
    Failed,
}

/// Structured form of one report line
#[derive(Debug, Clone, Serialize)]
pub struct ReportRecord {
    /// Path as given
    pub path: String,
    /// Outcome
    pub status: RecordStatus,
    /// File size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Digests in column order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub digests: Vec<AlgorithmDigest>,
    /// Shannon entropy in bits per byte
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entropy: Option<f64>,
    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Header plus one line per input path, in input order
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    header: String,
    #[serde(skip)]
    lines: Vec<String>,
    records: Vec<ReportRecord>,
}

impl Report {
    pub(crate) fn new(header: String) -> Self {
        Self {
            header,
            lines: Vec::new(),
            records: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, task: &FileTask) -> Result<()> {
        self.lines.push(task.render_line()?);

        let path = task.path().display().to_string();
        let record = match (task.digest(), task.error()) {
            (Some(digest), _) => ReportRecord {
                path,
                status: RecordStatus::Completed,
                size: Some(digest.size),
                digests: digest.digests.clone(),
                entropy: Some(digest.entropy),
                error: None,
            },
            (None, error) => ReportRecord {
                path,
                status: RecordStatus::Failed,
                size: None,
                digests: Vec::new(),
                entropy: None,
                error: error.map(|e| e.to_string()),
            },
        };
        self.records.push(record);
        Ok(())
    }

    /// Header line
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Report lines, header excluded
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Structured records, one per line
    pub fn records(&self) -> &[ReportRecord] {
        &self.records
    }

    /// Number of failed lines
    pub fn failures(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == RecordStatus::Failed)
            .count()
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.header)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
