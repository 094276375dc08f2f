use crate::corrector::CorruptionMap;
use crate::detect::Hypothesis;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mapping {
    pub corrupted: String,
    pub correct: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairMode {
    Table,
    Detect,
    Auto,
    /// A single asserted intermediate encoding; no fallback, failed round
    /// trips are errors.
    Forced(Hypothesis),
}

impl RepairMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "table" => Some(RepairMode::Table),
            "detect" => Some(RepairMode::Detect),
            "auto" => Some(RepairMode::Auto),
            other => Hypothesis::parse(other).map(RepairMode::Forced),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RepairMode::Table => "table",
            RepairMode::Detect => "detect",
            RepairMode::Auto => "auto",
            RepairMode::Forced(hypothesis) => hypothesis.name(),
        }
    }
}

impl std::fmt::Display for RepairMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct RepairConfig {
    pub mode: RepairMode,
    pub map: CorruptionMap,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Repaired,
    Clean,
    Skipped,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub replacements: usize,
    pub digest_before: Option<String>,
    pub digest_after: Option<String>,
    pub encoding: Option<String>,
}

impl FileReport {
    pub fn repaired(
        path: &Path,
        replacements: usize,
        digest_before: String,
        digest_after: String,
        encoding: Option<String>,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            status: FileStatus::Repaired,
            replacements,
            digest_before: Some(digest_before),
            digest_after: Some(digest_after),
            encoding,
        }
    }

    pub fn clean(path: &Path, digest: String) -> Self {
        Self {
            path: path.to_path_buf(),
            status: FileStatus::Clean,
            replacements: 0,
            digest_before: Some(digest.clone()),
            digest_after: Some(digest),
            encoding: None,
        }
    }

    pub fn skipped(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            status: FileStatus::Skipped,
            replacements: 0,
            digest_before: None,
            digest_after: None,
            encoding: None,
        }
    }

    pub fn failed(path: &Path, error: &crate::error::RepairError) -> Self {
        Self {
            path: path.to_path_buf(),
            status: FileStatus::Failed {
                message: error.to_string(),
            },
            replacements: 0,
            digest_before: None,
            digest_after: None,
            encoding: None,
        }
    }

    pub fn describe(&self) -> String {
        match &self.status {
            FileStatus::Repaired => {
                let via = self
                    .encoding
                    .as_deref()
                    .map(|e| format!(" via {}", e))
                    .unwrap_or_default();
                if self.replacements > 0 {
                    format!(
                        "{}: repaired, {} replacement(s){}",
                        self.path.display(),
                        self.replacements,
                        via
                    )
                } else {
                    format!("{}: repaired{}", self.path.display(), via)
                }
            }
            FileStatus::Clean => format!("{}: no issues", self.path.display()),
            FileStatus::Skipped => format!("{}: skipped (not found)", self.path.display()),
            FileStatus::Failed { message } => format!("{}: {}", self.path.display(), message),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RepairSummary {
    pub repaired: usize,
    pub clean: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RepairSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = RepairSummary::default();
        for report in reports {
            match report.status {
                FileStatus::Repaired => summary.repaired += 1,
                FileStatus::Clean => summary.clean += 1,
                FileStatus::Skipped => summary.skipped += 1,
                FileStatus::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

/// Truncated SHA-256 of a buffer, used to fingerprint file content in reports.
pub fn content_digest(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..8])
}
