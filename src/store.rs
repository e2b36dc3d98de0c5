//! Thin adapter over a document store (spec §4.2): per-entity collections,
//! bulk upsert, text + ascending indexes, text search with score projection.

use anyhow::{Context, Result};
use bson::{doc, Document};
use futures::stream::TryStreamExt;
use mongodb::options::{IndexOptions, UpdateOptions};
use mongodb::{Collection, Database, IndexModel};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

/// A text-search hit paired with the store's relevance score. Modeled as a
/// view type rather than a mutable field bolted onto the entity (spec §9,
/// "Dynamic text-score field" design note) — the score is meaningful only
/// for ordering within one query, never persisted on `T` itself.
#[derive(Debug, Clone)]
pub struct Scored<T> {
    pub score: f64,
    pub item: T,
}

/// One text, ascending, or composite-ascending index to create on a
/// collection. A table of these stands in for the source's per-entity
/// `CreateIndexes` override (spec §9, "Interface over inheritance").
#[derive(Debug, Clone)]
pub enum IndexSpec {
    Text(&'static str),
    Ascending(&'static str),
    CompositeAscending(&'static [&'static str]),
}

impl IndexSpec {
    fn into_model(self) -> IndexModel {
        match self {
            IndexSpec::Text(field) => IndexModel::builder()
                .keys(doc! { field: "text" })
                .build(),
            IndexSpec::Ascending(field) => IndexModel::builder()
                .keys(doc! { field: 1 })
                .build(),
            IndexSpec::CompositeAscending(fields) => {
                let mut keys = Document::new();
                for field in fields {
                    keys.insert(*field, 1);
                }
                IndexModel::builder()
                    .keys(keys)
                    .options(IndexOptions::builder().build())
                    .build()
            }
        }
    }
}

/// Adapter over a single Mongo collection for entity type `T`.
#[derive(Clone)]
pub struct Store<T> {
    collection: Collection<T>,
}

impl<T> Store<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    pub fn new(db: &Database, name: &str) -> Self {
        Self {
            collection: db.collection(name),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: u64) -> Result<Option<T>> {
        if id == 0 {
            return Ok(None);
        }
        let doc = self
            .collection
            .find_one(doc! { "_id": id as i64 }, None)
            .await
            .context("store: get_by_id")?;
        Ok(doc)
    }

    #[instrument(skip(self, ids))]
    pub async fn get_by_ids(&self, ids: &[u64]) -> Result<Option<Vec<T>>> {
        if ids.is_empty() {
            return Ok(None);
        }
        let as_i64: Vec<i64> = ids.iter().map(|id| *id as i64).collect();
        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": as_i64 } }, None)
            .await
            .context("store: get_by_ids")?;
        let items: Vec<T> = cursor.try_collect().await.context("store: get_by_ids collect")?;
        Ok(Some(items))
    }

    /// Equality search on a composite field tuple (used by `ExternalGame`'s
    /// `(uid, category)` lookup).
    #[instrument(skip(self, filter))]
    pub async fn find_by_composite(&self, filter: Document) -> Result<Vec<T>> {
        let cursor = self
            .collection
            .find(filter, None)
            .await
            .context("store: find_by_composite")?;
        cursor
            .try_collect()
            .await
            .context("store: find_by_composite collect")
    }

    /// Text search with score projection, sorted score-descending.
    #[instrument(skip(self, filter))]
    pub async fn text_search(
        &self,
        term: &str,
        filter: Option<Document>,
        limit: i64,
    ) -> Result<Vec<Scored<T>>> {
        let mut query = doc! { "$text": { "$search": term } };
        if let Some(extra) = filter {
            query.extend(extra);
        }
        let options = mongodb::options::FindOptions::builder()
            .projection(doc! { "score": { "$meta": "textScore" } })
            .sort(doc! { "score": { "$meta": "textScore" } })
            .limit(limit)
            .build();
        let cursor = self
            .collection
            .clone_with_type::<Document>()
            .find(query, options)
            .await
            .context("store: text_search")?;
        let raw: Vec<Document> = cursor.try_collect().await.context("store: text_search collect")?;
        let mut hits = Vec::with_capacity(raw.len());
        for mut entry in raw {
            let score = entry.remove("score").and_then(|v| v.as_f64()).unwrap_or(0.0);
            let item: T = bson::from_document(entry).context("store: text_search decode")?;
            hits.push(Scored { score, item });
        }
        Ok(hits)
    }

    /// Bulk upsert by `id`: one replace-or-insert round trip per item.
    #[instrument(skip(self, items))]
    pub async fn bulk_upsert(&self, items: Vec<T>, id_of: impl Fn(&T) -> u64) -> Result<()> {
        for item in &items {
            let id = id_of(item) as i64;
            self.collection
                .replace_one(
                    doc! { "_id": id },
                    item,
                    UpdateOptions::builder().upsert(true).build(),
                )
                .await
                .context("store: bulk_upsert")?;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: u64) -> Result<()> {
        self.collection
            .delete_one(doc! { "_id": id as i64 }, None)
            .await
            .context("store: delete_by_id")?;
        Ok(())
    }

    /// Drops the collection and recreates its indexes synchronously. Readers
    /// never observe a collection without its indexes (spec §5).
    #[instrument(skip(self, indexes))]
    pub async fn drop_and_reindex(&self, indexes: &[IndexSpec]) -> Result<()> {
        self.collection.drop(None).await.context("store: drop")?;
        if !indexes.is_empty() {
            let models: Vec<IndexModel> = indexes.iter().cloned().map(IndexSpec::into_model).collect();
            self.collection
                .create_indexes(models, None)
                .await
                .context("store: create_indexes")?;
        }
        Ok(())
    }
}
