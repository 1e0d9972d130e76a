// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod bookmark;
pub mod contest;
pub mod user;

pub use bookmark::{bookmark_document_id, Bookmark};
pub use contest::{contest_document_id, Contest, ContestStatus, FetchedContest, Platform};
pub use user::{hash_password, Preferences, User};
