// SPDX-License-Identifier: MIT

//! Contest refresh: fetch all platforms concurrently and reconcile into
//! the store.

use crate::db::Store;
use crate::error::AppError;
use crate::models::Platform;
use crate::services::{CodeChefClient, CodeforcesClient, LeetCodeClient};
use chrono::Utc;
use futures_util::{stream, StreamExt};
use std::sync::Arc;

const MAX_CONCURRENT_UPSERTS: usize = 16;

/// Runs the fetch-normalize-upsert cycle.
#[derive(Clone)]
pub struct AggregatorService {
    codeforces: CodeforcesClient,
    codechef: CodeChefClient,
    leetcode: LeetCodeClient,
    store: Arc<dyn Store>,
}

impl AggregatorService {
    pub fn new(
        codeforces: CodeforcesClient,
        codechef: CodeChefClient,
        leetcode: LeetCodeClient,
        store: Arc<dyn Store>,
    ) -> Self {
        Self {
            codeforces,
            codechef,
            leetcode,
            store,
        }
    }

    /// Fetch contests from all platforms and upsert them. Returns the
    /// number of records successfully processed.
    ///
    /// One platform's outage never blocks the other two: fetch failures are
    /// logged and yield an empty batch for that platform. Individual upsert
    /// failures are likewise logged and skipped.
    pub async fn refresh_contests(&self) -> Result<usize, AppError> {
        // One clock snapshot for the whole cycle, threaded through the
        // adapters so status bucketing cannot flap within a batch.
        let now = Utc::now();

        let (codeforces, codechef, leetcode) = tokio::join!(
            self.codeforces.fetch_contests(now),
            self.codechef.fetch_contests(),
            self.leetcode.fetch_contests(now),
        );

        let mut batch = Vec::new();
        let results = [
            (Platform::Codeforces, codeforces),
            (Platform::Codechef, codechef),
            (Platform::Leetcode, leetcode),
        ];
        for (platform, result) in results {
            match result {
                Ok(mut contests) => {
                    tracing::debug!(platform = %platform, count = contests.len(), "Fetched contests");
                    batch.append(&mut contests);
                }
                Err(err) => {
                    tracing::warn!(platform = %platform, error = %err, "Contest fetch failed");
                }
            }
        }

        let store = &self.store;
        let processed = stream::iter(batch)
            .map(|contest| async move {
                match store.upsert_contest(&contest).await {
                    Ok(()) => 1usize,
                    Err(err) => {
                        tracing::warn!(
                            platform = %contest.platform,
                            external_id = %contest.external_id,
                            error = %err,
                            "Contest upsert failed, skipping record"
                        );
                        0
                    }
                }
            })
            .buffer_unordered(MAX_CONCURRENT_UPSERTS)
            .fold(0usize, |acc, n| async move { acc + n })
            .await;

        tracing::info!(processed, "Contest refresh complete");
        Ok(processed)
    }
}
