//! Database layer: a document-store abstraction with Firestore and
//! in-memory backends.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{Bookmark, Contest, ContestStatus, FetchedContest, Platform, Preferences, User};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const CONTESTS: &str = "contests";
    pub const BOOKMARKS: &str = "bookmarks";
}

/// Document-store operations used by the handlers and the refresh jobs.
///
/// Contests are keyed by `(platform, externalId)` via their document ID,
/// bookmarks by `(user, contest)`, users by username. Writers only touch
/// records they own by key, so implementations need per-record atomicity
/// and nothing more.
#[async_trait]
pub trait Store: Send + Sync {
    // ─── Users ───────────────────────────────────────────────────

    async fn get_user(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Insert a new user. Fails with `BadRequest` if the username is taken.
    async fn create_user(&self, user: &User) -> Result<(), AppError>;

    /// Replace a user's preferences. Returns the updated user, or `None`
    /// if the user no longer exists.
    async fn update_preferences(
        &self,
        username: &str,
        preferences: &Preferences,
    ) -> Result<Option<User>, AppError>;

    // ─── Contests ────────────────────────────────────────────────

    /// Find-or-create keyed on the natural key. Overwrites all
    /// platform-sourced fields; never regresses a non-null `solution_url`.
    async fn upsert_contest(&self, fetched: &FetchedContest) -> Result<(), AppError>;

    async fn get_contest(&self, contest_id: &str) -> Result<Option<Contest>, AppError>;

    /// Filter by platform set (empty = all) and status (None = all).
    /// Sorted ascending by start time, except `past` which sorts descending.
    async fn query_contests(
        &self,
        platforms: &[Platform],
        status: Option<ContestStatus>,
    ) -> Result<Vec<Contest>, AppError>;

    /// Attach a solution link to the contest with the given natural key.
    /// Returns `false` (and writes nothing) when no such contest is stored;
    /// enrichment never creates records.
    async fn attach_solution(
        &self,
        platform: Platform,
        external_id: &str,
        solution_url: &str,
    ) -> Result<bool, AppError>;

    /// Admin override: set the solution link on a contest by document ID.
    /// Returns the updated contest, or `None` if it does not exist.
    async fn set_solution(
        &self,
        contest_id: &str,
        solution_url: &str,
    ) -> Result<Option<Contest>, AppError>;

    // ─── Bookmarks ───────────────────────────────────────────────

    /// Create a bookmark. Returns `None` when the `(user, contest)` pair is
    /// already bookmarked; no duplicate record is created.
    async fn create_bookmark(
        &self,
        username: &str,
        contest_id: &str,
    ) -> Result<Option<Bookmark>, AppError>;

    /// Remove a bookmark. Returns `false` when it did not exist.
    async fn delete_bookmark(&self, username: &str, contest_id: &str) -> Result<bool, AppError>;

    async fn bookmarks_for_user(&self, username: &str) -> Result<Vec<Bookmark>, AppError>;
}
