//! In-process document store
//!
//! Backs tests and the CLI's `--local` mode. Watches are push-based: every
//! write recomputes the affected collection snapshot and publishes it, so
//! subscribers see the same immediate-then-on-change semantics the real
//! platform provides.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::watch;

use crate::error::StoreError;
use crate::model::Reward;
use crate::store::{
    rewards_doc, CollectionPath, CollectionWatch, DocPath, Document, DocumentStore,
};

lazy_static! {
    /// Catalog seeded in local mode; real deployments curate theirs in the
    /// store directly.
    static ref DEMO_CATALOG: Vec<Reward> = vec![
        Reward {
            id: "sticker-pack".to_string(),
            title: "Sticker Pack".to_string(),
            description: "A sheet of team stickers for your laptop.".to_string(),
            icon: "🎁".to_string(),
            points: 10,
        },
        Reward {
            id: "coffee-card".to_string(),
            title: "Coffee Card".to_string(),
            description: "A $25 gift card for your local coffee shop.".to_string(),
            icon: "☕".to_string(),
            points: 50,
        },
        Reward {
            id: "team-hoodie".to_string(),
            title: "Team Hoodie".to_string(),
            description: "Limited-edition intern hoodie.".to_string(),
            icon: "🧥".to_string(),
            points: 100,
        },
        Reward {
            id: "dinner-ceo".to_string(),
            title: "Dinner with the CEO".to_string(),
            description: "An evening out with the founding team.".to_string(),
            icon: "🍽️".to_string(),
            points: 250,
        },
    ];
}

#[derive(Default)]
struct Inner {
    /// Documents keyed by full path `"{collection}/{doc_id}"`.
    docs: RwLock<BTreeMap<String, Document>>,
    /// One publisher per watched collection, kept alive so late subscribers
    /// receive the current snapshot on subscribe.
    watchers: RwLock<HashMap<String, watch::Sender<Vec<Document>>>>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populates the rewards catalog for local mode.
    pub async fn seed_demo_catalog(&self, tenant: &str) -> Result<(), StoreError> {
        for reward in DEMO_CATALOG.iter() {
            let data = serde_json::to_value(reward)?;
            self.create_doc(&rewards_doc(tenant, &reward.id), data).await?;
        }
        Ok(())
    }

    fn collection_snapshot(&self, collection: &str) -> Vec<Document> {
        let prefix = format!("{collection}/");
        self.inner
            .docs
            .read()
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| !key[prefix.len()..].contains('/'))
            .map(|(_, doc)| doc.clone())
            .collect()
    }

    fn publish(&self, collection: &str) {
        let watchers = self.inner.watchers.read();
        if let Some(tx) = watchers.get(collection) {
            tx.send_replace(self.collection_snapshot(collection));
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn get_doc(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        Ok(self.inner.docs.read().get(&path.to_string()).cloned())
    }

    async fn create_doc(&self, path: &DocPath, data: Value) -> Result<(), StoreError> {
        let doc = Document {
            id: path.doc_id.clone(),
            data,
        };
        self.inner.docs.write().insert(path.to_string(), doc);
        self.publish(path.collection.as_str());
        Ok(())
    }

    async fn update_doc(&self, path: &DocPath, fields: Value) -> Result<(), StoreError> {
        {
            let mut docs = self.inner.docs.write();
            let doc = docs
                .get_mut(&path.to_string())
                .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
            match (&mut doc.data, fields) {
                (Value::Object(existing), Value::Object(updates)) => {
                    for (key, value) in updates {
                        existing.insert(key, value);
                    }
                }
                (data, fields) => *data = fields,
            }
        }
        self.publish(path.collection.as_str());
        Ok(())
    }

    async fn watch_collection(&self, path: &CollectionPath) -> CollectionWatch {
        let mut watchers = self.inner.watchers.write();
        let tx = watchers.entry(path.as_str().to_string()).or_insert_with(|| {
            let (tx, _rx) = watch::channel(self.collection_snapshot(path.as_str()));
            tx
        });
        CollectionWatch::new(tx.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{leaderboard_collection, leaderboard_doc};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_get_update() {
        let store = MemoryStore::new();
        let path = leaderboard_doc("t", "u1");

        assert!(store.get_doc(&path).await.unwrap().is_none());

        store
            .create_doc(&path, json!({ "name": "a", "total_donations": 5.0 }))
            .await
            .unwrap();
        store.update_doc(&path, json!({ "name": "b" })).await.unwrap();

        let doc = store.get_doc(&path).await.unwrap().unwrap();
        assert_eq!(doc.data["name"], json!("b"));
        assert_eq!(doc.data["total_donations"], json!(5.0));
    }

    #[tokio::test]
    async fn test_update_missing_doc_fails() {
        let store = MemoryStore::new();
        let err = store
            .update_doc(&leaderboard_doc("t", "ghost"), json!({ "name": "x" }))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_watch_delivers_current_then_changes() {
        let store = MemoryStore::new();
        let collection = leaderboard_collection("t");

        store
            .create_doc(&collection.doc("u1"), json!({ "name": "one" }))
            .await
            .unwrap();

        let mut watch = store.watch_collection(&collection).await;
        assert_eq!(watch.snapshot().len(), 1);

        store
            .create_doc(&collection.doc("u2"), json!({ "name": "two" }))
            .await
            .unwrap();
        assert!(watch.changed().await);
        assert_eq!(watch.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_watch_does_not_cross_collections() {
        let store = MemoryStore::new();
        let mut watch = store.watch_collection(&leaderboard_collection("t")).await;

        store
            .create_doc(&rewards_doc("t", "r1"), json!({ "points": 10 }))
            .await
            .unwrap();

        // No delivery for an unrelated collection.
        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(50), watch.changed()).await;
        assert!(waited.is_err());
        assert!(watch.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_seed_demo_catalog() {
        let store = MemoryStore::new();
        store.seed_demo_catalog("t").await.unwrap();
        let watch = store.watch_collection(&crate::store::rewards_collection("t")).await;
        assert_eq!(watch.snapshot().len(), DEMO_CATALOG.len());
    }
}
