// SPDX-License-Identifier: MIT

//! Contest-Tracker: aggregate competitive programming contests
//!
//! This crate provides the backend API that fetches contest schedules from
//! Codeforces, CodeChef, and LeetCode, enriches them with video solution
//! links mined from YouTube playlists, and serves them with per-user
//! bookmarks.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Store;
use services::{AggregatorService, SolutionService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub aggregator: AggregatorService,
    pub solutions: SolutionService,
}
