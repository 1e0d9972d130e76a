//! Bookmark join model: `(user, contest)` association.

use serde::{Deserialize, Serialize};

/// A user's bookmark on a contest. At most one per `(user, contest)` pair,
/// enforced by using [`bookmark_document_id`] as the document ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    /// Username of the owner.
    pub user: String,
    /// Document ID of the bookmarked contest.
    pub contest: String,
    pub created_at: String,
}

impl Bookmark {
    pub fn document_id(&self) -> String {
        bookmark_document_id(&self.user, &self.contest)
    }
}

/// Document ID for a bookmark: combines user and contest to enforce the
/// uniqueness invariant at the store level.
pub fn bookmark_document_id(user: &str, contest_id: &str) -> String {
    format!("{}_{}", user, contest_id)
}
