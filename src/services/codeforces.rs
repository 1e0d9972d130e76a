// SPDX-License-Identifier: MIT

//! Codeforces contest-list adapter.

use crate::error::AppError;
use crate::models::{ContestStatus, FetchedContest, Platform};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Codeforces API client.
#[derive(Clone)]
pub struct CodeforcesClient {
    http: reqwest::Client,
    base_url: String,
}

impl CodeforcesClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: "https://codeforces.com/api".to_string(),
        }
    }

    /// Fetch the full contest list and map it into the canonical shape.
    ///
    /// `now` is the cycle-wide snapshot used for status derivation; it is
    /// never re-sampled per contest.
    pub async fn fetch_contests(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<FetchedContest>, AppError> {
        let url = format!("{}/contest.list", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Codeforces request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Codeforces returned HTTP {}",
                response.status()
            )));
        }

        let list: CodeforcesContestList = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Codeforces JSON parse error: {}", e)))?;

        map_contests(list, now)
    }
}

/// Envelope of `GET /api/contest.list`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesContestList {
    pub status: String,
    #[serde(default)]
    pub result: Vec<CodeforcesContest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesContest {
    pub id: i64,
    pub name: String,
    /// Absent for contests with no scheduled start (e.g. permanently open
    /// training rounds); those are skipped.
    pub start_time_seconds: Option<i64>,
    pub duration_seconds: i64,
}

/// Pure mapping from the Codeforces payload to canonical contests.
pub fn map_contests(
    list: CodeforcesContestList,
    now: DateTime<Utc>,
) -> Result<Vec<FetchedContest>, AppError> {
    if list.status != "OK" {
        return Err(AppError::Upstream(format!(
            "Codeforces API status: {}",
            list.status
        )));
    }

    Ok(list
        .result
        .into_iter()
        .filter_map(|contest| {
            let start = DateTime::from_timestamp(contest.start_time_seconds?, 0)?;
            let end = start + Duration::seconds(contest.duration_seconds);
            Some(FetchedContest {
                name: contest.name,
                platform: Platform::Codeforces,
                url: format!("https://codeforces.com/contest/{}", contest.id),
                start_time: start,
                end_time: end,
                duration: (contest.duration_seconds / 60).max(0),
                status: ContestStatus::derive(start, end, now),
                external_id: contest.id.to_string(),
            })
        })
        .collect())
}
