use crate::detect::{self, Detection};
use crate::error::RepairError;
use crate::models::{FileReport, RepairConfig, RepairMode, RepairSummary, content_digest};
use crate::store;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

pub struct AppState {
    pub config: RepairConfig,
    locks: RwLock<HashMap<PathBuf, Arc<Mutex<()>>>>,
    reports: RwLock<Vec<FileReport>>,
}

impl AppState {
    pub fn new(config: RepairConfig) -> Self {
        Self {
            config,
            locks: RwLock::new(HashMap::new()),
            reports: RwLock::new(Vec::new()),
        }
    }

    async fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.write().await;
        locks
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Repair one file: read, correct fully in memory, write back only when
    /// the buffer changed. The whole read-modify-write runs under that file's
    /// exclusive lock; distinct files need no coordination.
    pub async fn repair_file(&self, path: &Path) -> FileReport {
        let lock = self.lock_for(path).await;
        let _guard = lock.lock().await;

        let text = match store::read_text(path).await {
            Ok(text) => text,
            Err(RepairError::Io { ref source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                return FileReport::skipped(path);
            }
            Err(err) => return FileReport::failed(path, &err),
        };

        let digest_before = content_digest(&text);
        let (fixed, replacements, encoding) = match self.correct(&text) {
            Ok(outcome) => outcome,
            Err(err) => return FileReport::failed(path, &err),
        };

        if fixed == text {
            return FileReport::clean(path, digest_before);
        }

        if let Err(err) = store::write_atomic(path, &fixed).await {
            return FileReport::failed(path, &err);
        }

        FileReport::repaired(
            path,
            replacements,
            digest_before,
            content_digest(&fixed),
            encoding,
        )
    }

    fn correct(&self, text: &str) -> Result<(String, usize, Option<String>), RepairError> {
        match self.config.mode {
            RepairMode::Table => {
                let (fixed, replacements) = self.config.map.apply(text);
                Ok((fixed, replacements, None))
            }
            RepairMode::Detect => match detect::detect(text)? {
                Detection::Repaired { text: fixed, via } => {
                    let names = join_names(&via);
                    Ok((fixed, 0, Some(names)))
                }
                Detection::Clean => Ok((text.to_string(), 0, None)),
            },
            RepairMode::Auto => match detect::detect(text)? {
                Detection::Repaired { text: fixed, via } => {
                    let names = join_names(&via);
                    Ok((fixed, 0, Some(names)))
                }
                // Detection found nothing; fall back to the literal table.
                Detection::Clean => {
                    let (fixed, replacements) = self.config.map.apply(text);
                    Ok((fixed, replacements, None))
                }
            },
            RepairMode::Forced(hypothesis) => {
                let fixed = detect::repair_with(text, hypothesis)?;
                Ok((fixed, 0, Some(hypothesis.name().to_string())))
            }
        }
    }

    pub async fn record(&self, report: FileReport) {
        self.reports.write().await.push(report);
    }

    pub async fn reports(&self) -> Vec<FileReport> {
        self.reports.read().await.clone()
    }

    pub async fn summary(&self) -> RepairSummary {
        RepairSummary::from_reports(&self.reports.read().await)
    }
}

fn join_names(hypotheses: &[detect::Hypothesis]) -> String {
    hypotheses
        .iter()
        .map(|h| h.name())
        .collect::<Vec<_>>()
        .join(", ")
}
