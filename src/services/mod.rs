// SPDX-License-Identifier: MIT

//! Services module - platform adapters, refresh jobs, and enrichment.

pub mod aggregator;
pub mod codechef;
pub mod codeforces;
pub mod leetcode;
pub mod scheduler;
pub mod solutions;
pub mod youtube;

pub use aggregator::AggregatorService;
pub use codechef::CodeChefClient;
pub use codeforces::CodeforcesClient;
pub use leetcode::LeetCodeClient;
pub use solutions::SolutionService;
pub use youtube::YouTubeClient;

use std::time::Duration;

/// Request timeout for every upstream call. Conservative so a hung
/// upstream cannot block a refresh cycle into the next scheduled one.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);

/// Build the shared HTTP client used by all upstream adapters.
pub fn build_http_client() -> Result<reqwest::Client, crate::error::AppError> {
    reqwest::Client::builder()
        .timeout(UPSTREAM_TIMEOUT)
        .build()
        .map_err(|e| {
            crate::error::AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e))
        })
}
