//! Auralite - Batch Runner
//!
//! Đọc một JSON input (locations, signals, indicators), evaluate tất cả
//! locations song song, tạo alerts cho HIGH/CRITICAL, score mọi snapshot
//! và in report JSON ra stdout.
//!
//! Usage: `auralite <input.json>`

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use auralite_core::constants::{APP_NAME, APP_VERSION};
use auralite_core::logic::risk::RiskSummary;
use auralite_core::{
    Alert, EngineConfig, EngineError, EngineResult, IndicatorSnapshot, Location,
    LocationRegistry, MonitoringEngine, RiskScoreRecord, SignalWindows, Verdict,
};

#[derive(Debug, Deserialize)]
struct BatchInput {
    #[serde(default)]
    locations: Vec<Location>,
    /// location id → signal windows
    #[serde(default)]
    signals: HashMap<String, SignalWindows>,
    #[serde(default)]
    indicators: Vec<IndicatorSnapshot>,
    /// Optional training population for the risk model
    #[serde(default)]
    population: Vec<IndicatorSnapshot>,
}

#[derive(Debug, Serialize)]
struct BatchReport {
    verdicts: Vec<Verdict>,
    scores: Vec<RiskScoreRecord>,
    alerts: Vec<Alert>,
    summary: RiskSummary,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> EngineResult<()> {
    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| EngineError::InvalidInput("usage: auralite <input.json>".into()))?;

    let input: BatchInput = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    let config = EngineConfig::from_env()?;
    let engine = Arc::new(MonitoringEngine::from_config(
        config,
        LocationRegistry::new(input.locations),
    )?);

    if !input.population.is_empty() {
        engine.train(&input.population)?;
    }

    // ========================================================================
    // RULE AGGREGATION (parallel per location)
    // ========================================================================

    let mut signals: Vec<(String, SignalWindows)> = input.signals.into_iter().collect();
    signals.sort_by(|a, b| a.0.cmp(&b.0));

    let tasks: Vec<_> = signals
        .into_iter()
        .map(|(id, windows)| {
            let engine = Arc::clone(&engine);
            tokio::task::spawn_blocking(move || {
                let result = engine.evaluate_and_alert(&id, &windows);
                (id, result)
            })
        })
        .collect();

    let mut verdicts = Vec::new();
    let mut alerts = Vec::new();
    for task in tasks {
        match task.await {
            Ok((_, Ok((verdict, alert)))) => {
                verdicts.push(verdict);
                alerts.extend(alert);
            }
            Ok((id, Err(e))) => log::warn!("Skipping location '{}': {}", id, e),
            Err(e) => log::error!("Evaluation task failed: {}", e),
        }
    }

    // ========================================================================
    // STATISTICAL SCORING
    // ========================================================================

    let mut scores = Vec::new();
    for snapshot in &input.indicators {
        match engine.score(&snapshot.location_id, snapshot) {
            Ok(record) => scores.push(record),
            Err(e) => log::warn!("Skipping snapshot for '{}': {}", snapshot.location_id, e),
        }
    }

    log::info!(
        "Evaluated {} locations, {} alerts, {} scores",
        verdicts.len(),
        alerts.len(),
        scores.len()
    );

    let report = BatchReport {
        verdicts,
        scores,
        alerts,
        summary: engine.risk_summary(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
