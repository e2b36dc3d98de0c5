//! C3 — one collection mirror per upstream entity class: clone-from-upstream,
//! point/bulk lookup from the local store, webhook registration and event
//! application (spec §4.3). A single value-typed `Mirror<T>` parameterized by
//! the `MirrorEntity` trait stands in for the source's generic base class
//! with a virtual `CreateIndexes` override (spec §9 "Interface over
//! inheritance" redesign note) — no trait-object dispatch needed.

use crate::error::AppError;
use crate::models::{AlternativeName, ExternalGame, Game, GameLocalization, PassthroughEntity};
use crate::store::{IndexSpec, Store};
use crate::upstream::{UpstreamClient, WebhookEntry};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument};

const CLONE_PAGE_SIZE: usize = 500;
const CLONE_PROGRESS_INTERVAL: usize = 5_000;

pub trait MirrorEntity:
    DeserializeOwned + Serialize + Unpin + Send + Sync + Clone + 'static
{
    /// The upstream path segment (e.g. `"games"`), also used to derive the
    /// local collection name and the webhook callback URL.
    const UPSTREAM_PATH: &'static str;

    fn id(&self) -> u64;
    fn indexes() -> Vec<IndexSpec>;

    /// `IGDB_col_{endpoint}` (spec §6, "Persisted state").
    fn collection_name() -> String {
        format!("IGDB_col_{}", Self::UPSTREAM_PATH)
    }
}

impl MirrorEntity for Game {
    const UPSTREAM_PATH: &'static str = "games";

    fn id(&self) -> u64 {
        self.id
    }

    fn indexes() -> Vec<IndexSpec> {
        vec![IndexSpec::Text("name"), IndexSpec::Ascending("category")]
    }
}

impl MirrorEntity for AlternativeName {
    const UPSTREAM_PATH: &'static str = "alternative_names";

    fn id(&self) -> u64 {
        self.id
    }

    fn indexes() -> Vec<IndexSpec> {
        vec![IndexSpec::Text("name"), IndexSpec::Ascending("game")]
    }
}

impl MirrorEntity for ExternalGame {
    const UPSTREAM_PATH: &'static str = "external_games";

    fn id(&self) -> u64 {
        self.id
    }

    fn indexes() -> Vec<IndexSpec> {
        vec![IndexSpec::CompositeAscending(&["uid", "category"])]
    }
}

impl MirrorEntity for GameLocalization {
    const UPSTREAM_PATH: &'static str = "game_localizations";

    fn id(&self) -> u64 {
        self.id
    }

    fn indexes() -> Vec<IndexSpec> {
        vec![IndexSpec::Text("name"), IndexSpec::Ascending("game")]
    }
}

/// `Company` is the one passthrough class the spec names explicitly; other
/// passthrough classes would each need their own thin newtype around
/// `PassthroughEntity` with a distinct `UPSTREAM_PATH` (see DESIGN.md).
impl MirrorEntity for PassthroughEntity {
    const UPSTREAM_PATH: &'static str = "companies";

    fn id(&self) -> u64 {
        self.id
    }

    fn indexes() -> Vec<IndexSpec> {
        Vec::new()
    }
}

pub struct Mirror<T: MirrorEntity> {
    store: Store<T>,
    upstream: Arc<UpstreamClient>,
    webhook_root: Option<String>,
    webhook_secret: Option<String>,
    /// Cloning is not safe to run concurrently with itself on the same
    /// collection (spec §5); held for the duration of `clone_collection`.
    clone_lock: Mutex<()>,
}

impl<T: MirrorEntity> Mirror<T> {
    pub fn new(
        db: &mongodb::Database,
        upstream: Arc<UpstreamClient>,
        webhook_root: Option<String>,
        webhook_secret: Option<String>,
    ) -> Self {
        Self {
            store: Store::new(db, &T::collection_name()),
            upstream,
            webhook_root,
            webhook_secret,
            clone_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Store<T> {
        &self.store
    }

    pub async fn get_item(&self, id: u64) -> Result<Option<T>> {
        self.store.get_by_id(id).await
    }

    pub async fn get_items(&self, ids: &[u64]) -> Result<Option<Vec<T>>> {
        self.store.get_by_ids(ids).await
    }

    pub async fn add(&self, items: Vec<T>) -> Result<()> {
        self.store.bulk_upsert(items, MirrorEntity::id).await
    }

    pub async fn delete(&self, item: &T) -> Result<()> {
        self.store.delete_by_id(item.id()).await
    }

    pub async fn delete_by_id(&self, id: u64) -> Result<()> {
        self.store.delete_by_id(id).await
    }

    /// Drop, recreate indexes, then page upstream in blocks of 500 until a
    /// page returns fewer than 500 records (spec §4.3).
    #[instrument(skip(self), fields(collection = T::UPSTREAM_PATH))]
    pub async fn clone_collection(&self) -> Result<()> {
        let _guard = self.clone_lock.lock().await;
        self.store
            .drop_and_reindex(&T::indexes())
            .await
            .context("clone: drop_and_reindex")?;

        let endpoint = self.upstream.endpoint_url(T::UPSTREAM_PATH);
        let mut offset = 0usize;
        let mut total = 0usize;
        let mut next_milestone = CLONE_PROGRESS_INTERVAL;
        loop {
            let page: Vec<T> = self
                .upstream
                .fetch_page(&endpoint, CLONE_PAGE_SIZE, offset)
                .await
                .with_context(|| {
                    format!("clone {}: page at offset {offset}", T::UPSTREAM_PATH)
                })?;
            let page_len = page.len();
            if page_len == 0 {
                break;
            }
            self.store
                .bulk_upsert(page, MirrorEntity::id)
                .await
                .with_context(|| format!("clone {}: applying page", T::UPSTREAM_PATH))?;
            total += page_len;
            offset += CLONE_PAGE_SIZE;
            while total >= next_milestone {
                info!(collection = T::UPSTREAM_PATH, total, "clone progress");
                next_milestone += CLONE_PROGRESS_INTERVAL;
            }
            if page_len < CLONE_PAGE_SIZE {
                break;
            }
        }
        info!(collection = T::UPSTREAM_PATH, total, "clone complete");
        Ok(())
    }

    /// Registers `{create, update, delete}` webhooks that aren't already
    /// present in `current_webhooks` (spec §4.3).
    #[instrument(skip(self, current_webhooks), fields(collection = T::UPSTREAM_PATH))]
    pub async fn configure_webhooks(
        &self,
        current_webhooks: &[WebhookEntry],
    ) -> Result<(), AppError> {
        let root = self.webhook_root.as_deref().ok_or_else(|| {
            AppError::ConfigMissing("WebHookRootAddress not configured".to_string())
        })?;
        let secret = self.webhook_secret.as_deref().ok_or_else(|| {
            AppError::ConfigMissing("WebHookSecret not configured".to_string())
        })?;
        let endpoint = self.upstream.endpoint_url(T::UPSTREAM_PATH);

        for method in ["create", "update", "delete"] {
            let url = format!("{root}/igdb/webhooks/{}/{method}", T::UPSTREAM_PATH);
            if current_webhooks.iter().any(|hook| hook.url == url) {
                continue;
            }
            let registered = self
                .upstream
                .register_webhook(&endpoint, method, secret, &url)
                .await
                .map_err(|err| AppError::UpstreamFailure(err.to_string()))?;
            if !registered.iter().any(|hook| hook.active) {
                return Err(AppError::UpstreamFailure(format!(
                    "webhook registration for {} {method} returned no active entry",
                    T::UPSTREAM_PATH
                )));
            }
        }
        Ok(())
    }
}
