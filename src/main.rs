mod corrector;
mod detect;
mod error;
mod models;
mod report;
mod state;
mod store;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::corrector::CorruptionMap;
use crate::models::{FileStatus, Mapping, RepairConfig, RepairMode};
use crate::state::AppState;

fn load_corruption_map() -> anyhow::Result<CorruptionMap> {
    match std::env::var("REPLACEMENTS_FILE") {
        Ok(file) => {
            let raw = std::fs::read_to_string(&file)
                .map_err(|e| anyhow::anyhow!("Failed to read replacements file {}: {}", file, e))?;
            let entries: Vec<Mapping> = serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("Failed to parse replacements file {}: {}", file, e))?;
            info!("Loaded {} replacement(s) from {}", entries.len(), file);
            Ok(CorruptionMap::new(entries))
        }
        Err(_) => Ok(CorruptionMap::default_emoji_map()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        )
        .init();

    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded .env from: {:?}", path),
        Err(e) => error!("Failed to load .env: {}", e),
    }

    let targets = std::env::var("TARGET_FILES").expect("TARGET_FILES environment variable not set");
    let paths: Vec<PathBuf> = targets
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect();
    if paths.is_empty() {
        anyhow::bail!("TARGET_FILES contains no paths");
    }

    let mode = match std::env::var("REPAIR_MODE") {
        Ok(raw) => RepairMode::parse(&raw)
            .expect("REPAIR_MODE must be table, detect, auto, or a hypothesis name"),
        Err(_) => RepairMode::Auto,
    };

    let map = load_corruption_map()?;
    if map.is_empty() {
        anyhow::bail!("replacement map contains no usable entries");
    }

    let report_file = std::env::var("REPORT_FILE").ok();

    info!("Starting mojibake repair run");
    info!("Mode: {}", mode);
    info!("Files: {}", paths.len());
    info!("Replacement table entries: {}", map.len());

    let state = Arc::new(AppState::new(RepairConfig { mode, map }));

    let mut tasks = Vec::new();
    for path in paths {
        let state_clone = state.clone();
        tasks.push(tokio::spawn(async move {
            let report = state_clone.repair_file(&path).await;
            state_clone.record(report).await;
        }));
    }
    for task in tasks {
        if let Err(e) = task.await {
            error!("Repair task panicked: {}", e);
        }
    }

    let reports = state.reports().await;
    for file_report in &reports {
        match &file_report.status {
            FileStatus::Repaired | FileStatus::Clean => info!("{}", file_report.describe()),
            FileStatus::Skipped => warn!("{}", file_report.describe()),
            FileStatus::Failed { .. } => error!("{}", file_report.describe()),
        }
    }

    let summary = state.summary().await;
    info!(
        "Repaired: {}, clean: {}, skipped: {}, failed: {}",
        summary.repaired, summary.clean, summary.skipped, summary.failed
    );

    if let Some(report_path) = report_file {
        let rendered = report::generate_report(&reports);
        store::write_atomic(Path::new(&report_path), &rendered).await?;
        info!("Wrote run report to {}", report_path);
    }

    if summary.failed > 0 {
        anyhow::bail!("{} file(s) failed to repair", summary.failed);
    }

    Ok(())
}
