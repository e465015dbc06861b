//! Document gateway client
//!
//! Talks to the managed document platform through its JSON gateway:
//!
//! - `GET    {base}/v1/{doc path}`        -> document payload (404 = absent)
//! - `PUT    {base}/v1/{doc path}`        -> create/set payload
//! - `PATCH  {base}/v1/{doc path}`        -> merge top-level fields
//! - `GET    {base}/v1/{collection path}` -> `{"documents":[{"id","data"}]}`
//!
//! Each `watch_collection` runs its own long-lived refresh task for that one
//! resource, publishing a snapshot only when it differs from the last one.
//! Delivery failures are logged and the last known snapshot stays in place.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::{CollectionPath, CollectionWatch, DocPath, Document, DocumentStore};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct CollectionResponse {
    #[serde(default)]
    documents: Vec<GatewayDocument>,
}

#[derive(Debug, Deserialize)]
struct GatewayDocument {
    id: String,
    data: Value,
}

#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    refresh: Duration,
}

impl RestStore {
    pub fn new(base_url: &str, refresh: Duration) -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            refresh,
        }
    }

    /// Gateway URL for a document or collection path, one encoded segment
    /// per path component.
    fn url_for(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/v1/{}", self.base_url, encoded.join("/"))
    }

    async fn fetch_collection(&self, path: &CollectionPath) -> Result<Vec<Document>, StoreError> {
        let resp = self.client.get(self.url_for(path.as_str())).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Gateway(format!("{status}: {body}")));
        }

        let parsed: CollectionResponse = resp.json().await?;
        Ok(parsed
            .documents
            .into_iter()
            .map(|d| Document {
                id: d.id,
                data: d.data,
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl DocumentStore for RestStore {
    async fn get_doc(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        let resp = self
            .client
            .get(self.url_for(&path.to_string()))
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let data: Value = resp.json().await?;
                Ok(Some(Document {
                    id: path.doc_id.clone(),
                    data,
                }))
            }
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(StoreError::Gateway(format!("{status}: {body}")))
            }
        }
    }

    async fn create_doc(&self, path: &DocPath, data: Value) -> Result<(), StoreError> {
        let resp = self
            .client
            .put(self.url_for(&path.to_string()))
            .json(&data)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Gateway(format!("{status}: {body}")));
        }
        Ok(())
    }

    async fn update_doc(&self, path: &DocPath, fields: Value) -> Result<(), StoreError> {
        let resp = self
            .client
            .patch(self.url_for(&path.to_string()))
            .json(&fields)
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(path.to_string())),
            status if status.is_success() => Ok(()),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(StoreError::Gateway(format!("{status}: {body}")))
            }
        }
    }

    async fn watch_collection(&self, path: &CollectionPath) -> CollectionWatch {
        // First snapshot before handing out the watch, so subscribers start
        // from the current value when the gateway is reachable.
        let initial = match self.fetch_collection(path).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!(collection = %path, "initial snapshot failed: {e}");
                Vec::new()
            }
        };

        let (tx, rx) = watch::channel(initial);
        let store = self.clone();
        let collection = path.clone();
        let refresh = self.refresh;

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(refresh);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    _ = interval.tick() => {}
                }
                match store.fetch_collection(&collection).await {
                    Ok(docs) => {
                        if *tx.borrow() != docs {
                            debug!(collection = %collection, docs = docs.len(), "snapshot changed");
                            tx.send_replace(docs);
                        }
                    }
                    // Logged only; subscribers keep the last known snapshot.
                    Err(e) => warn!(collection = %collection, "delivery failed: {e}"),
                }
            }
        });

        CollectionWatch::with_task(rx, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{leaderboard_collection, profile_doc};

    #[test]
    fn test_url_building() {
        let store = RestStore::new("https://store.example.dev/", Duration::from_secs(2));
        assert_eq!(
            store.url_for(&profile_doc("acme", "u-42").to_string()),
            "https://store.example.dev/v1/tenant/acme/users/u-42/profile/data"
        );
        assert_eq!(
            store.url_for(leaderboard_collection("acme").as_str()),
            "https://store.example.dev/v1/tenant/acme/public/data/leaderboard"
        );
    }

    #[test]
    fn test_url_encodes_segments() {
        let store = RestStore::new("https://store.example.dev", Duration::from_secs(2));
        let path = profile_doc("acme", "user with space");
        assert_eq!(
            store.url_for(&path.to_string()),
            "https://store.example.dev/v1/tenant/acme/users/user%20with%20space/profile/data"
        );
    }
}
