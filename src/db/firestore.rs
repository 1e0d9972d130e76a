// SPDX-License-Identifier: MIT

//! Firestore store backend.
//!
//! Document layout:
//! - `users/{username}`
//! - `contests/{platform}-{externalId}` (natural key as document ID)
//! - `bookmarks/{username}_{contestId}`
//!
//! Keying documents by their natural keys makes every upsert a
//! single-record replace-or-insert, which is all the concurrency model
//! requires: writers never touch records they do not own.

use super::{collections, Store};
use crate::error::AppError;
use crate::models::{
    bookmark_document_id, contest_document_id, Bookmark, Contest, ContestStatus, FetchedContest,
    Platform, Preferences, User,
};
use crate::time_utils::format_utc_rfc3339;
use async_trait::async_trait;
use chrono::Utc;
use firestore::FirestoreQueryDirection;

/// Firestore-backed document store.
#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
}

impl FirestoreStore {
    /// Connect to Firestore.
    ///
    /// For local development with the emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // With the emulator env var set, use an unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Connect to the Firestore emulator with a dummy token source.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }
}

#[async_trait]
impl Store for FirestoreStore {
    // ─── Users ───────────────────────────────────────────────────

    async fn get_user(&self, username: &str) -> Result<Option<User>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(username)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let users: Vec<User> = self
            .client
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.into_iter().next())
    }

    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        // Insert (not update) so a concurrent registration of the same
        // username fails instead of silently overwriting.
        self.client
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.username)
            .object(user)
            .execute::<()>()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn update_preferences(
        &self,
        username: &str,
        preferences: &Preferences,
    ) -> Result<Option<User>, AppError> {
        let Some(mut user) = self.get_user(username).await? else {
            return Ok(None);
        };
        user.preferences = preferences.clone();

        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(username)
            .object(&user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(Some(user))
    }

    // ─── Contests ────────────────────────────────────────────────

    async fn upsert_contest(&self, fetched: &FetchedContest) -> Result<(), AppError> {
        let doc_id = fetched.document_id();

        // Read-merge-write in a transaction so a concurrent upsert of the
        // same record cannot interleave between the read and the write.
        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let existing: Option<Contest> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::CONTESTS)
            .obj()
            .one(&doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let merged = fetched.merge_into(existing.as_ref(), Utc::now());

        self.client
            .fluent()
            .update()
            .in_col(collections::CONTESTS)
            .document_id(&doc_id)
            .object(&merged)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add upsert to transaction: {}", e)))?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(())
    }

    async fn get_contest(&self, contest_id: &str) -> Result<Option<Contest>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::CONTESTS)
            .obj()
            .one(contest_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn query_contests(
        &self,
        platforms: &[Platform],
        status: Option<ContestStatus>,
    ) -> Result<Vec<Contest>, AppError> {
        let direction = if status == Some(ContestStatus::Past) {
            FirestoreQueryDirection::Descending
        } else {
            FirestoreQueryDirection::Ascending
        };

        let query = self.client.fluent().select().from(collections::CONTESTS);
        let query = if let Some(status) = status {
            let status = status.as_str().to_string();
            query.filter(move |q| q.field("status").eq(status.clone()))
        } else {
            query
        };

        let mut contests: Vec<Contest> = query
            .order_by([("start_time", direction)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Platform filtering happens client-side; the platform set is tiny
        // and this keeps the query free of composite-index requirements.
        if !platforms.is_empty() {
            contests.retain(|c| platforms.contains(&c.platform));
        }
        Ok(contests)
    }

    async fn attach_solution(
        &self,
        platform: Platform,
        external_id: &str,
        solution_url: &str,
    ) -> Result<bool, AppError> {
        let doc_id = contest_document_id(platform, external_id);
        let Some(mut contest) = self.get_contest(&doc_id).await? else {
            return Ok(false);
        };

        contest.solution_url = Some(solution_url.to_string());
        contest.updated_at = format_utc_rfc3339(Utc::now());

        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::CONTESTS)
            .document_id(&doc_id)
            .object(&contest)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(true)
    }

    async fn set_solution(
        &self,
        contest_id: &str,
        solution_url: &str,
    ) -> Result<Option<Contest>, AppError> {
        let Some(mut contest) = self.get_contest(contest_id).await? else {
            return Ok(None);
        };

        contest.solution_url = Some(solution_url.to_string());
        contest.updated_at = format_utc_rfc3339(Utc::now());

        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::CONTESTS)
            .document_id(contest_id)
            .object(&contest)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(Some(contest))
    }

    // ─── Bookmarks ───────────────────────────────────────────────

    async fn create_bookmark(
        &self,
        username: &str,
        contest_id: &str,
    ) -> Result<Option<Bookmark>, AppError> {
        let doc_id = bookmark_document_id(username, contest_id);

        let existing: Option<Bookmark> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::BOOKMARKS)
            .obj()
            .one(&doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if existing.is_some() {
            return Ok(None);
        }

        let bookmark = Bookmark {
            user: username.to_string(),
            contest: contest_id.to_string(),
            created_at: format_utc_rfc3339(Utc::now()),
        };

        // Insert semantics: if another request won the race above, this
        // fails on the existing document instead of duplicating it.
        self.client
            .fluent()
            .insert()
            .into(collections::BOOKMARKS)
            .document_id(&doc_id)
            .object(&bookmark)
            .execute::<()>()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(Some(bookmark))
    }

    async fn delete_bookmark(&self, username: &str, contest_id: &str) -> Result<bool, AppError> {
        let doc_id = bookmark_document_id(username, contest_id);

        let existing: Option<Bookmark> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::BOOKMARKS)
            .obj()
            .one(&doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if existing.is_none() {
            return Ok(false);
        }

        self.client
            .fluent()
            .delete()
            .from(collections::BOOKMARKS)
            .document_id(&doc_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(true)
    }

    async fn bookmarks_for_user(&self, username: &str) -> Result<Vec<Bookmark>, AppError> {
        let username = username.to_string();
        self.client
            .fluent()
            .select()
            .from(collections::BOOKMARKS)
            .filter(move |q| q.field("user").eq(username.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
