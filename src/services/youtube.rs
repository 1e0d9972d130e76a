// SPDX-License-Identifier: MIT

//! YouTube Data API client for solution playlists.

use crate::error::AppError;
use serde::Deserialize;

/// Items fetched per playlist. 50 is the API maximum per call; only the
/// first page is fetched.
pub const PLAYLIST_PAGE_SIZE: u32 = 50;

/// YouTube playlist client.
#[derive(Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            api_key,
        }
    }

    /// List up to [`PLAYLIST_PAGE_SIZE`] items of a playlist.
    pub async fn list_playlist_items(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistItem>, AppError> {
        let url = format!("{}/playlistItems", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("maxResults", &PLAYLIST_PAGE_SIZE.to_string()),
                ("playlistId", playlist_id),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("YouTube request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "YouTube returned HTTP {}",
                response.status()
            )));
        }

        let list: PlaylistItemsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("YouTube JSON parse error: {}", e)))?;

        Ok(list.items)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemsResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub snippet: Snippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: String,
}
