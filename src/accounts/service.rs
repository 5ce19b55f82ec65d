use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    accounts::AccountSummary,
    error::ServiceError,
    followers::{
        external::FollowerSource, synth::generate_profiles, FollowerBatch, FollowerPage, Profile,
        MAX_BULK_BATCH, MAX_REAL_FOLLOWERS, MAX_SYNTHETIC_BATCH,
    },
    store::{Account, Document, Store},
};

/// Owns the in-memory document and mirrors every mutation to the [`Store`].
///
/// A single lock guards each read-modify-write cycle, including the save,
/// so concurrent requests never lose each other's updates.
pub struct AccountService {
    store: Store,
    document: Mutex<Document>,
    source: Option<Arc<dyn FollowerSource>>,
    lookup_timeout: Duration,
}

impl AccountService {
    /// Load the persisted document and take ownership of it.
    pub fn open(
        store: Store,
        source: Option<Arc<dyn FollowerSource>>,
        lookup_timeout: Duration,
    ) -> Self {
        let document = store.load();
        Self {
            store,
            document: Mutex::new(document),
            source,
            lookup_timeout,
        }
    }

    pub fn has_external_session(&self) -> bool {
        self.source.is_some()
    }

    pub async fn create_account(&self, name: &str) -> Result<(), ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation(
                "Account name is required".to_string(),
            ));
        }

        let mut doc = self.document.lock().await;
        if doc.accounts.contains_key(name) {
            return Ok(());
        }

        doc.accounts.insert(name.to_string(), Account::new(name));
        self.store.save(&doc).await;
        info!(account = name, "account created");
        Ok(())
    }

    /// Every account ordered by creation time, then name.
    pub async fn list_accounts(&self) -> Vec<AccountSummary> {
        let doc = self.document.lock().await;
        let mut accounts: Vec<&Account> = doc.accounts.values().collect();
        accounts.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });

        accounts
            .into_iter()
            .map(|acc| AccountSummary {
                name: acc.name.clone(),
                count: acc.followers.len(),
                created: acc.created_at,
            })
            .collect()
    }

    pub async fn get_followers(&self, name: &str, limit: usize) -> Result<FollowerPage, ServiceError> {
        let doc = self.document.lock().await;
        let account = doc
            .accounts
            .get(name)
            .ok_or_else(|| ServiceError::NotFound("Account not found".to_string()))?;

        Ok(FollowerPage {
            followers: account.followers.iter().take(limit).cloned().collect(),
            total: account.followers.len(),
        })
    }

    pub async fn add_synthetic(&self, name: &str, count: i64) -> FollowerBatch {
        self.add_generated(name, count, MAX_SYNTHETIC_BATCH).await
    }

    pub async fn bulk_add_synthetic(&self, name: &str, count: i64) -> FollowerBatch {
        self.add_generated(name, count, MAX_BULK_BATCH).await
    }

    /// Import the followers of `external_username` from the external source.
    pub async fn add_real(
        &self,
        name: &str,
        external_username: &str,
    ) -> Result<FollowerBatch, ServiceError> {
        let source = self.source.as_ref().ok_or_else(|| {
            ServiceError::Unavailable("Instagram session is not available".to_string())
        })?;

        let external_username = external_username.trim();
        if external_username.is_empty() {
            return Err(ServiceError::Validation(
                "Instagram username is required".to_string(),
            ));
        }

        // The lookup can be slow; keep the document unlocked while it runs.
        let fetched = tokio::time::timeout(
            self.lookup_timeout,
            source.followers_of(external_username, MAX_REAL_FOLLOWERS),
        )
        .await
        .map_err(|_| {
            ServiceError::ExternalService(format!(
                "follower lookup for {} timed out after {}s",
                external_username,
                self.lookup_timeout.as_secs_f32()
            ))
        })?
        .map_err(|e| {
            warn!(username = external_username, "follower lookup failed: {:#}", e);
            ServiceError::ExternalService(format!("{:#}", e))
        })?;

        let profiles = fetched
            .into_iter()
            .take(MAX_REAL_FOLLOWERS)
            .map(|f| f.into_profile())
            .collect::<Result<Vec<_>, _>>()?;

        let batch = self.prepend(name, profiles).await;
        info!(
            account = name,
            source = external_username,
            added = batch.added,
            total = batch.total,
            "real followers imported"
        );
        Ok(batch)
    }

    pub async fn clear_followers(&self, name: &str) {
        let mut doc = self.document.lock().await;
        if let Some(account) = doc.accounts.get_mut(name) {
            account.followers.clear();
            info!(account = name, "followers cleared");
        }
        self.store.save(&doc).await;
    }

    pub async fn delete_account(&self, name: &str) {
        let mut doc = self.document.lock().await;
        if doc.accounts.remove(name).is_some() {
            info!(account = name, "account deleted");
        }
        self.store.save(&doc).await;
    }

    async fn add_generated(&self, name: &str, count: i64, ceiling: usize) -> FollowerBatch {
        let count = count.clamp(0, ceiling as i64) as usize;
        let batch = self.prepend(name, generate_profiles(count)).await;
        info!(
            account = name,
            added = batch.added,
            total = batch.total,
            "synthetic followers added"
        );
        batch
    }

    /// Put `profiles` in front of the account's followers, creating the
    /// account if needed, and persist.
    async fn prepend(&self, name: &str, profiles: Vec<Profile>) -> FollowerBatch {
        let added = profiles.len();

        let mut doc = self.document.lock().await;
        let account = doc
            .accounts
            .entry(name.to_string())
            .or_insert_with(|| Account::new(name));
        account.followers.splice(0..0, profiles);
        let total = account.followers.len();

        self.store.save(&doc).await;
        FollowerBatch { added, total }
    }
}
