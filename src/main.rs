// SPDX-License-Identifier: MIT

//! Contest-Tracker API Server
//!
//! Aggregates contest schedules from Codeforces, CodeChef, and LeetCode,
//! attaches video solution links, and serves them with per-user bookmarks.

use contest_tracker::{
    config::Config,
    db::{FirestoreStore, Store},
    services::{
        self, scheduler, AggregatorService, CodeChefClient, CodeforcesClient, LeetCodeClient,
        SolutionService,
    },
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Contest-Tracker API");

    // Initialize the Firestore-backed store
    let store: Arc<dyn Store> = Arc::new(
        FirestoreStore::new(&config.gcp_project_id)
            .await
            .expect("Failed to connect to Firestore"),
    );

    // Shared HTTP client for all upstream adapters
    let http = services::build_http_client().expect("Failed to build HTTP client");

    let aggregator = AggregatorService::new(
        CodeforcesClient::new(http.clone()),
        CodeChefClient::new(http.clone()),
        LeetCodeClient::new(http.clone()),
        store.clone(),
    );
    let solutions = SolutionService::from_config(&config, http, store.clone());
    if solutions.is_configured() {
        tracing::info!("Solution enrichment configured");
    }

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        aggregator,
        solutions,
    });

    // Populate the store before the first scheduled tick; fire-and-forget
    // so a slow upstream does not delay serving traffic.
    {
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(err) = state.aggregator.refresh_contests().await {
                tracing::error!(error = %err, "Initial contest refresh failed");
            }
        });
    }

    // Start the periodic refresh jobs
    let jobs = scheduler::spawn_refresh_jobs(&state);

    // Build router
    let app = contest_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for job in jobs {
        job.abort();
    }
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received");
    }
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("contest_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
