// SPDX-License-Identifier: MIT

//! CodeChef contests adapter.
//!
//! CodeChef pre-partitions contests into future/present/past buckets, and
//! those bucket assignments are trusted verbatim rather than recomputed
//! against the refresh cycle's clock. TODO: revisit against the uniform
//! timestamp rule the other adapters use.

use crate::error::AppError;
use crate::models::{ContestStatus, FetchedContest, Platform};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// CodeChef API client.
#[derive(Clone)]
pub struct CodeChefClient {
    http: reqwest::Client,
    base_url: String,
}

impl CodeChefClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: "https://www.codechef.com/api".to_string(),
        }
    }

    /// Fetch all contest buckets and map them into the canonical shape.
    pub async fn fetch_contests(&self) -> Result<Vec<FetchedContest>, AppError> {
        let url = format!("{}/contests", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("CodeChef request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "CodeChef returned HTTP {}",
                response.status()
            )));
        }

        let list: CodeChefContestList = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("CodeChef JSON parse error: {}", e)))?;

        Ok(map_contests(list))
    }
}

/// Envelope of `GET /api/contests`.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeChefContestList {
    #[serde(default)]
    pub future_contests: Vec<CodeChefContest>,
    #[serde(default)]
    pub present_contests: Vec<CodeChefContest>,
    #[serde(default)]
    pub past_contests: Vec<CodeChefContest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeChefContest {
    pub contest_name: String,
    pub contest_code: String,
    pub contest_start_date_iso: String,
    pub contest_end_date_iso: String,
}

/// Pure mapping: each bucket carries its source-declared status.
pub fn map_contests(list: CodeChefContestList) -> Vec<FetchedContest> {
    let mut contests = Vec::new();
    contests.extend(map_bucket(list.future_contests, ContestStatus::Upcoming));
    contests.extend(map_bucket(list.present_contests, ContestStatus::Ongoing));
    contests.extend(map_bucket(list.past_contests, ContestStatus::Past));
    contests
}

fn map_bucket(
    items: Vec<CodeChefContest>,
    status: ContestStatus,
) -> impl Iterator<Item = FetchedContest> {
    items.into_iter().filter_map(move |contest| {
        let start = parse_iso(&contest.contest_start_date_iso);
        let end = parse_iso(&contest.contest_end_date_iso);
        let (Some(start), Some(end)) = (start, end) else {
            tracing::warn!(
                contest_code = %contest.contest_code,
                "Skipping CodeChef contest with unparseable timestamps"
            );
            return None;
        };

        Some(FetchedContest {
            name: contest.contest_name,
            platform: Platform::Codechef,
            url: format!("https://www.codechef.com/{}", contest.contest_code),
            start_time: start,
            end_time: end,
            duration: (end - start).num_minutes().max(0),
            status,
            external_id: contest.contest_code,
        })
    })
}

fn parse_iso(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(code: &str, start: &str, end: &str) -> CodeChefContest {
        CodeChefContest {
            contest_name: format!("Contest {}", code),
            contest_code: code.to_string(),
            contest_start_date_iso: start.to_string(),
            contest_end_date_iso: end.to_string(),
        }
    }

    #[test]
    fn test_buckets_carry_source_status() {
        let list = CodeChefContestList {
            future_contests: vec![item(
                "LTIME130",
                "2026-09-03T20:00:00+05:30",
                "2026-09-03T23:00:00+05:30",
            )],
            present_contests: vec![item(
                "COOK160",
                "2026-08-24T20:00:00+05:30",
                "2026-08-24T23:00:00+05:30",
            )],
            past_contests: vec![item(
                "COOK159",
                "2026-08-10T20:00:00+05:30",
                "2026-08-10T22:30:00+05:30",
            )],
        };

        let mapped = map_contests(list);
        assert_eq!(mapped.len(), 3);
        assert_eq!(mapped[0].status, ContestStatus::Upcoming);
        assert_eq!(mapped[1].status, ContestStatus::Ongoing);
        assert_eq!(mapped[2].status, ContestStatus::Past);
        assert_eq!(mapped[0].duration, 180);
        assert_eq!(mapped[2].duration, 150);
        assert_eq!(mapped[0].url, "https://www.codechef.com/LTIME130");
        assert_eq!(mapped[0].external_id, "LTIME130");
    }

    #[test]
    fn test_unparseable_timestamps_skip_the_record() {
        let list = CodeChefContestList {
            future_contests: vec![item("BAD1", "not-a-date", "2026-09-03T23:00:00+05:30")],
            present_contests: vec![],
            past_contests: vec![],
        };
        assert!(map_contests(list).is_empty());
    }

    #[test]
    fn test_offset_timestamps_normalize_to_utc() {
        let list = CodeChefContestList {
            future_contests: vec![item(
                "LTIME130",
                "2026-09-03T20:00:00+05:30",
                "2026-09-03T23:00:00+05:30",
            )],
            present_contests: vec![],
            past_contests: vec![],
        };
        let mapped = map_contests(list);
        assert_eq!(
            mapped[0].start_time.to_rfc3339(),
            "2026-09-03T14:30:00+00:00"
        );
    }
}
