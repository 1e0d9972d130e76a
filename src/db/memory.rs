//! In-memory store backend.
//!
//! Backs the test suite and local development without a Firestore
//! emulator. All operations take a single mutex, which trivially gives the
//! per-record atomicity the [`Store`] contract asks for.

use super::Store;
use crate::error::AppError;
use crate::models::{
    bookmark_document_id, contest_document_id, Bookmark, Contest, ContestStatus, FetchedContest,
    Platform, Preferences, User,
};
use crate::time_utils::format_utc_rfc3339;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
struct Data {
    users: BTreeMap<String, User>,
    contests: BTreeMap<String, Contest>,
    bookmarks: BTreeMap<String, Bookmark>,
}

#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Data>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Default::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Data>, AppError> {
        self.data
            .lock()
            .map_err(|_| AppError::Database("memory store poisoned".to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.lock()?.users.get(username).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let mut data = self.lock()?;
        if data.users.contains_key(&user.username) {
            return Err(AppError::BadRequest(
                "User with this email or username already exists".to_string(),
            ));
        }
        data.users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn update_preferences(
        &self,
        username: &str,
        preferences: &Preferences,
    ) -> Result<Option<User>, AppError> {
        let mut data = self.lock()?;
        Ok(data.users.get_mut(username).map(|user| {
            user.preferences = preferences.clone();
            user.clone()
        }))
    }

    async fn upsert_contest(&self, fetched: &FetchedContest) -> Result<(), AppError> {
        let mut data = self.lock()?;
        let doc_id = fetched.document_id();
        let merged = fetched.merge_into(data.contests.get(&doc_id), Utc::now());
        data.contests.insert(doc_id, merged);
        Ok(())
    }

    async fn get_contest(&self, contest_id: &str) -> Result<Option<Contest>, AppError> {
        Ok(self.lock()?.contests.get(contest_id).cloned())
    }

    async fn query_contests(
        &self,
        platforms: &[Platform],
        status: Option<ContestStatus>,
    ) -> Result<Vec<Contest>, AppError> {
        let data = self.lock()?;
        let mut contests: Vec<Contest> = data
            .contests
            .values()
            .filter(|c| platforms.is_empty() || platforms.contains(&c.platform))
            .filter(|c| status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();

        // Past contests list most recent first; everything else soonest first.
        if status == Some(ContestStatus::Past) {
            contests.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        } else {
            contests.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        }
        Ok(contests)
    }

    async fn attach_solution(
        &self,
        platform: Platform,
        external_id: &str,
        solution_url: &str,
    ) -> Result<bool, AppError> {
        let mut data = self.lock()?;
        let doc_id = contest_document_id(platform, external_id);
        match data.contests.get_mut(&doc_id) {
            Some(contest) => {
                contest.solution_url = Some(solution_url.to_string());
                contest.updated_at = format_utc_rfc3339(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_solution(
        &self,
        contest_id: &str,
        solution_url: &str,
    ) -> Result<Option<Contest>, AppError> {
        let mut data = self.lock()?;
        Ok(data.contests.get_mut(contest_id).map(|contest| {
            contest.solution_url = Some(solution_url.to_string());
            contest.updated_at = format_utc_rfc3339(Utc::now());
            contest.clone()
        }))
    }

    async fn create_bookmark(
        &self,
        username: &str,
        contest_id: &str,
    ) -> Result<Option<Bookmark>, AppError> {
        let mut data = self.lock()?;
        let doc_id = bookmark_document_id(username, contest_id);
        if data.bookmarks.contains_key(&doc_id) {
            return Ok(None);
        }
        let bookmark = Bookmark {
            user: username.to_string(),
            contest: contest_id.to_string(),
            created_at: format_utc_rfc3339(Utc::now()),
        };
        data.bookmarks.insert(doc_id, bookmark.clone());
        Ok(Some(bookmark))
    }

    async fn delete_bookmark(&self, username: &str, contest_id: &str) -> Result<bool, AppError> {
        let doc_id = bookmark_document_id(username, contest_id);
        Ok(self.lock()?.bookmarks.remove(&doc_id).is_some())
    }

    async fn bookmarks_for_user(&self, username: &str) -> Result<Vec<Bookmark>, AppError> {
        Ok(self
            .lock()?
            .bookmarks
            .values()
            .filter(|b| b.user == username)
            .cloned()
            .collect())
    }
}
