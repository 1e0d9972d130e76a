// SPDX-License-Identifier: MIT

//! Solution enrichment: mine YouTube playlists for walkthrough videos and
//! attach them to stored contests.

use crate::config::Config;
use crate::db::Store;
use crate::error::AppError;
use crate::models::Platform;
use crate::services::YouTubeClient;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static CODEFORCES_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Codeforces Round #(\d+)|CF(\d+)").unwrap());
static CODECHEF_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(LTIME|COOK)(\d+)").unwrap());
static LEETCODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Weekly Contest (\d+)|Biweekly Contest (\d+)").unwrap());

/// Runs the playlist-mining enrichment cycle.
#[derive(Clone)]
pub struct SolutionService {
    youtube: Option<YouTubeClient>,
    playlists: Vec<(Platform, String)>,
    store: Arc<dyn Store>,
}

impl SolutionService {
    pub fn new(
        youtube: Option<YouTubeClient>,
        playlists: Vec<(Platform, String)>,
        store: Arc<dyn Store>,
    ) -> Self {
        Self {
            youtube,
            playlists,
            store,
        }
    }

    /// Build from the configured API key and per-platform playlist IDs.
    pub fn from_config(config: &Config, http: reqwest::Client, store: Arc<dyn Store>) -> Self {
        let youtube = config
            .youtube_api_key
            .clone()
            .map(|key| YouTubeClient::new(http, key));

        let playlist_ids = [
            (Platform::Codeforces, &config.codeforces_playlist_id),
            (Platform::Codechef, &config.codechef_playlist_id),
            (Platform::Leetcode, &config.leetcode_playlist_id),
        ];
        let playlists = playlist_ids
            .into_iter()
            .filter_map(|(platform, id)| id.clone().map(|id| (platform, id)))
            .collect();

        Self::new(youtube, playlists, store)
    }

    /// True when enrichment can actually run (API key + at least one
    /// playlist configured).
    pub fn is_configured(&self) -> bool {
        self.youtube.is_some() && !self.playlists.is_empty()
    }

    /// Walk every configured playlist and attach solution links to the
    /// matching stored contests. Returns the number of contests updated.
    ///
    /// Entries whose title/description yields no identifier are dropped
    /// without logging; most videos in a playlist are expected not to map
    /// to a contest. Enrichment never creates contest records.
    pub async fn refresh_solutions(&self) -> Result<usize, AppError> {
        let Some(youtube) = &self.youtube else {
            tracing::debug!("YouTube API key not configured, skipping solution refresh");
            return Ok(0);
        };

        let mut matched = 0usize;
        let mut updated = 0usize;

        for (platform, playlist_id) in &self.playlists {
            let items = match youtube.list_playlist_items(playlist_id).await {
                Ok(items) => items,
                Err(err) => {
                    tracing::warn!(platform = %platform, error = %err, "Playlist fetch failed");
                    continue;
                }
            };

            for item in items {
                let Some(external_id) = extract_contest_id(
                    &item.snippet.title,
                    &item.snippet.description,
                    *platform,
                ) else {
                    continue;
                };
                matched += 1;

                let solution_url = format!(
                    "https://www.youtube.com/watch?v={}",
                    item.snippet.resource_id.video_id
                );
                match self
                    .store
                    .attach_solution(*platform, &external_id, &solution_url)
                    .await
                {
                    Ok(true) => updated += 1,
                    // No stored contest with that identifier; best effort.
                    Ok(false) => {}
                    Err(err) => {
                        tracing::warn!(
                            platform = %platform,
                            external_id = %external_id,
                            error = %err,
                            "Solution attach failed, skipping entry"
                        );
                    }
                }
            }
        }

        tracing::info!(matched, updated, "Solution refresh complete");
        Ok(updated)
    }
}

/// Extract a platform-native contest identifier from a video title,
/// falling back to the description when the title carries no marker.
pub fn extract_contest_id(title: &str, description: &str, platform: Platform) -> Option<String> {
    extract_from_text(title, platform).or_else(|| extract_from_text(description, platform))
}

fn extract_from_text(text: &str, platform: Platform) -> Option<String> {
    match platform {
        // "Codeforces Round #123" or "CF123"; identifier is the number.
        Platform::Codeforces => CODEFORCES_PATTERN
            .captures(text)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().to_string()),

        // "LTIME123" or "COOK123". The match is case-insensitive, so the
        // captured prefix is canonicalized to the upper-case contest code.
        Platform::Codechef => CODECHEF_PATTERN
            .captures(text)
            .map(|caps| format!("{}{}", caps[1].to_uppercase(), &caps[2])),

        // "Weekly Contest 123" vs "Biweekly Contest 45". "Biweekly"
        // contains the substring "weekly" but not "Weekly"; the
        // case-sensitive check is what tells the two apart.
        Platform::Leetcode => LEETCODE_PATTERN
            .captures(text)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| {
                if text.contains("Weekly") {
                    format!("weekly-{}", m.as_str())
                } else {
                    format!("biweekly-{}", m.as_str())
                }
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codeforces_patterns() {
        assert_eq!(
            extract_contest_id("Codeforces Round #999 Solutions", "", Platform::Codeforces),
            Some("999".to_string())
        );
        assert_eq!(
            extract_contest_id("cf1881 screencast", "", Platform::Codeforces),
            Some("1881".to_string())
        );
        assert_eq!(
            extract_contest_id("Unrelated video", "", Platform::Codeforces),
            None
        );
    }

    #[test]
    fn test_codechef_prefix_is_canonicalized() {
        assert_eq!(
            extract_contest_id("CodeChef LTIME123 editorial", "", Platform::Codechef),
            Some("LTIME123".to_string())
        );
        assert_eq!(
            extract_contest_id("cook99 full solutions", "", Platform::Codechef),
            Some("COOK99".to_string())
        );
    }

    #[test]
    fn test_weekly_biweekly_disambiguation() {
        assert_eq!(
            extract_contest_id("LeetCode Weekly Contest 123", "", Platform::Leetcode),
            Some("weekly-123".to_string())
        );
        // "Biweekly" contains "weekly" but must not classify as weekly.
        assert_eq!(
            extract_contest_id("Biweekly Contest 45", "", Platform::Leetcode),
            Some("biweekly-45".to_string())
        );
    }

    #[test]
    fn test_description_fallback() {
        assert_eq!(
            extract_contest_id(
                "Epic problems explained!",
                "Solutions for Codeforces Round #777",
                Platform::Codeforces
            ),
            Some("777".to_string())
        );
    }

    #[test]
    fn test_wrong_platform_does_not_match() {
        assert_eq!(
            extract_contest_id("Weekly Contest 123", "", Platform::Codeforces),
            None
        );
    }
}
