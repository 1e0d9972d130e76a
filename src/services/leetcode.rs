// SPDX-License-Identifier: MIT

//! LeetCode GraphQL adapter.

use crate::error::AppError;
use crate::models::{ContestStatus, FetchedContest, Platform};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::HashSet;

const CONTEST_LIST_QUERY: &str = "\
query getContestList {
  allContests { title titleSlug startTime duration id }
  currentContests: allContests(status: STARTED) { title titleSlug startTime duration id }
}";

/// LeetCode GraphQL client.
#[derive(Clone)]
pub struct LeetCodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl LeetCodeClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: "https://leetcode.com".to_string(),
        }
    }

    /// Fetch all contests plus the currently-running set and map them into
    /// the canonical shape. `now` is the cycle-wide snapshot.
    pub async fn fetch_contests(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<FetchedContest>, AppError> {
        let url = format!("{}/graphql", self.base_url);
        let body = serde_json::json!({ "query": CONTEST_LIST_QUERY });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("LeetCode request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "LeetCode returned HTTP {}",
                response.status()
            )));
        }

        let envelope: GraphQlEnvelope = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("LeetCode JSON parse error: {}", e)))?;

        let data = envelope
            .data
            .ok_or_else(|| AppError::Upstream("LeetCode response has no data".to_string()))?;

        Ok(map_contests(data, now))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlEnvelope {
    pub data: Option<LeetCodeContestData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeetCodeContestData {
    #[serde(rename = "allContests", default)]
    pub all_contests: Vec<LeetCodeContest>,
    #[serde(rename = "currentContests", default)]
    pub current_contests: Vec<LeetCodeContest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeContest {
    pub title: String,
    pub title_slug: String,
    /// Unix seconds.
    pub start_time: i64,
    /// Seconds.
    pub duration: i64,
    pub id: i64,
}

/// Pure mapping. The STARTED set from the source is authoritative for
/// `ongoing`; everything else is bucketed by end time.
pub fn map_contests(data: LeetCodeContestData, now: DateTime<Utc>) -> Vec<FetchedContest> {
    let running: HashSet<i64> = data.current_contests.iter().map(|c| c.id).collect();

    data.all_contests
        .into_iter()
        .filter_map(|contest| {
            let start = DateTime::from_timestamp(contest.start_time, 0)?;
            let end = start + Duration::seconds(contest.duration);

            let status = if running.contains(&contest.id) {
                ContestStatus::Ongoing
            } else if now > end {
                ContestStatus::Past
            } else {
                ContestStatus::Upcoming
            };

            Some(FetchedContest {
                name: contest.title,
                platform: Platform::Leetcode,
                url: format!("https://leetcode.com/contest/{}", contest.title_slug),
                start_time: start,
                end_time: end,
                duration: (contest.duration / 60).max(0),
                status,
                external_id: contest.id.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contest(id: i64, start_offset_secs: i64) -> LeetCodeContest {
        LeetCodeContest {
            title: format!("Weekly Contest {}", id),
            title_slug: format!("weekly-contest-{}", id),
            start_time: 1_700_000_000 + start_offset_secs,
            duration: 5400,
            id,
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_started_set_is_authoritative_for_ongoing() {
        let data = LeetCodeContestData {
            all_contests: vec![contest(1, -600), contest(2, 3600), contest(3, -86_400)],
            current_contests: vec![contest(1, -600)],
        };

        let mapped = map_contests(data, now());
        assert_eq!(mapped[0].status, ContestStatus::Ongoing);
        assert_eq!(mapped[1].status, ContestStatus::Upcoming);
        assert_eq!(mapped[2].status, ContestStatus::Past);
        assert_eq!(mapped[0].url, "https://leetcode.com/contest/weekly-contest-1");
        assert_eq!(mapped[0].external_id, "1");
        assert_eq!(mapped[0].duration, 90);
    }

    #[test]
    fn test_parses_graphql_envelope() {
        let raw = r#"{
            "data": {
                "allContests": [
                    {"title": "Biweekly Contest 45", "titleSlug": "biweekly-contest-45",
                     "startTime": 1700000000, "duration": 5400, "id": 451}
                ],
                "currentContests": []
            }
        }"#;
        let envelope: GraphQlEnvelope = serde_json::from_str(raw).unwrap();
        let data = envelope.data.unwrap();
        assert_eq!(data.all_contests.len(), 1);
        assert_eq!(data.all_contests[0].title_slug, "biweekly-contest-45");
    }
}
