// SPDX-License-Identifier: MIT

//! Canonical contest model shared by all platform adapters.

use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported contest platforms. Closed set; adding a platform means adding
/// an adapter, so this stays an enum rather than an open registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Codeforces,
    Codechef,
    Leetcode,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Codeforces, Platform::Codechef, Platform::Leetcode];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Codeforces => "codeforces",
            Platform::Codechef => "codechef",
            Platform::Leetcode => "leetcode",
        }
    }

    /// Parse a platform token as used in query strings. Unknown tokens
    /// yield `None` and are ignored by callers.
    pub fn parse(s: &str) -> Option<Platform> {
        match s {
            "codeforces" => Some(Platform::Codeforces),
            "codechef" => Some(Platform::Codechef),
            "leetcode" => Some(Platform::Leetcode),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contest lifecycle status. Derived at fetch time against a single `now`
/// snapshot per refresh cycle; never recomputed lazily by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestStatus {
    Upcoming,
    Ongoing,
    Past,
}

impl ContestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContestStatus::Upcoming => "upcoming",
            ContestStatus::Ongoing => "ongoing",
            ContestStatus::Past => "past",
        }
    }

    pub fn parse(s: &str) -> Option<ContestStatus> {
        match s {
            "upcoming" => Some(ContestStatus::Upcoming),
            "ongoing" => Some(ContestStatus::Ongoing),
            "past" => Some(ContestStatus::Past),
            _ => None,
        }
    }

    /// Clock rule used by the Codeforces and LeetCode adapters:
    /// ongoing iff `start <= now < end`, past iff `now >= end`.
    pub fn derive(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> ContestStatus {
        if start <= now && now < end {
            ContestStatus::Ongoing
        } else if now >= end {
            ContestStatus::Past
        } else {
            ContestStatus::Upcoming
        }
    }
}

/// Stored contest document. Keyed in the store by [`contest_document_id`],
/// which encodes the natural key `(platform, external_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contest {
    pub name: String,
    pub platform: Platform,
    pub url: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Duration in minutes, `floor((end_time - start_time) / 60s)`.
    pub duration: i64,
    pub status: ContestStatus,
    /// Walkthrough video link. Null until enrichment finds a match or an
    /// admin sets it manually.
    #[serde(default)]
    pub solution_url: Option<String>,
    pub external_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Contest {
    pub fn document_id(&self) -> String {
        contest_document_id(self.platform, &self.external_id)
    }
}

/// Document ID for a contest: the natural key `(platform, externalId)`.
/// Using it as the document ID makes upserts single-record atomic
/// replace-or-insert operations.
pub fn contest_document_id(platform: Platform, external_id: &str) -> String {
    format!("{}-{}", platform.as_str(), external_id)
}

/// A contest as produced by a platform adapter: the canonical shape minus
/// the enrichment-owned and bookkeeping fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedContest {
    pub name: String,
    pub platform: Platform,
    pub url: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: i64,
    pub status: ContestStatus,
    pub external_id: String,
}

impl FetchedContest {
    pub fn document_id(&self) -> String {
        contest_document_id(self.platform, &self.external_id)
    }

    /// Merge a freshly fetched record over the stored one (if any).
    ///
    /// All platform-sourced fields are overwritten. `solution_url` and
    /// `created_at` are carried over from the existing record: a fetched
    /// record never regresses a previously attached solution link.
    pub fn merge_into(&self, existing: Option<&Contest>, now: DateTime<Utc>) -> Contest {
        let now = format_utc_rfc3339(now);
        Contest {
            name: self.name.clone(),
            platform: self.platform,
            url: self.url.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            duration: self.duration,
            status: self.status,
            solution_url: existing.and_then(|c| c.solution_url.clone()),
            external_id: self.external_id.clone(),
            created_at: existing
                .map(|c| c.created_at.clone())
                .unwrap_or_else(|| now.clone()),
            updated_at: now,
        }
    }
}
