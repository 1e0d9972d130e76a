// SPDX-License-Identifier: MIT

//! Periodic refresh jobs.
//!
//! Two unsynchronized fire-and-forget schedules: contest refresh (short
//! period) and solution enrichment (long period). Both can also be
//! triggered on demand through the admin endpoints. The returned handles
//! are aborted on shutdown; an abandoned cycle leaves no partial state
//! because every write is a per-record atomic upsert.

use crate::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawn the background refresh jobs.
pub fn spawn_refresh_jobs(state: &Arc<AppState>) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();

    let contest_state = state.clone();
    handles.push(tokio::spawn(async move {
        let period = Duration::from_millis(contest_state.config.contest_refresh_interval_ms);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The initial refresh runs at startup; skip the immediate tick.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(err) = contest_state.aggregator.refresh_contests().await {
                tracing::error!(error = %err, "Scheduled contest refresh failed");
            }
        }
    }));

    if state.solutions.is_configured() {
        let solution_state = state.clone();
        handles.push(tokio::spawn(async move {
            let period = Duration::from_millis(solution_state.config.solution_refresh_interval_ms);
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(err) = solution_state.solutions.refresh_solutions().await {
                    tracing::error!(error = %err, "Scheduled solution refresh failed");
                }
            }
        }));
    } else {
        tracing::info!("Solution enrichment not configured, scheduling contest refresh only");
    }

    handles
}
