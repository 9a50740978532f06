use std::sync::Arc;

use async_trait::async_trait;
use claimq_traits::{ItemCounts, ItemId, NewItem, QueueItem, QueueName, StoreAdaptor, Token};
use futures::lock::Mutex;
use thiserror::Error;

/// A local in-memory store. Every call runs under one lock, which makes the conditional claim
/// trivially atomic. Only meant for tests.
#[derive(Clone, Default)]
pub struct MockStoreAdaptor {
    inner: Arc<Mutex<InnerStore>>,
}

#[derive(Default)]
struct InnerStore {
    /// Sorted by id since ids only grow
    items: Vec<QueueItem>,
    last_id: ItemId,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("item {0} not found")]
    ItemNotFound(ItemId),
    #[error("item {0} is not claimed")]
    ItemNotClaimed(ItemId),
}

impl MockStoreAdaptor {
    pub fn new() -> Self {
        Self {
            inner: Default::default(),
        }
    }

    /// Snapshot of every stored item, oldest first
    pub async fn items(&self) -> Vec<QueueItem> {
        self.inner.lock().await.items.clone()
    }
}

#[async_trait]
impl StoreAdaptor for MockStoreAdaptor {
    type Error = Error;

    async fn insert(&self, item: NewItem) -> Result<ItemId, Self::Error> {
        let store = &mut *self.inner.lock().await;
        store.last_id += 1;
        let now = Self::now();
        store.items.push(QueueItem {
            item_id: store.last_id,
            queue_name: item.queue_name,
            data: item.data,
            processed: false,
            token: None,
            created_at: now,
            updated_at: now,
        });
        Ok(store.last_id)
    }

    async fn claim_oldest(
        &self,
        queue_name: &QueueName,
        token: &Token,
    ) -> Result<u64, Self::Error> {
        let store = &mut *self.inner.lock().await;
        Ok(
            if let Some(item) = store
                .items
                .iter_mut()
                .find(|item| &item.queue_name == queue_name && item.is_claimable())
            {
                item.token = Some(token.clone());
                item.updated_at = Self::now();
                1
            } else {
                0
            },
        )
    }

    async fn find_claimed(
        &self,
        queue_name: &QueueName,
        token: &Token,
    ) -> Result<Option<QueueItem>, Self::Error> {
        let store = &*self.inner.lock().await;
        Ok(store
            .items
            .iter()
            .find(|item| {
                &item.queue_name == queue_name
                    && !item.processed
                    && item.token.as_ref() == Some(token)
            })
            .cloned())
    }

    async fn mark_processed(&self, id: ItemId) -> Result<(), Self::Error> {
        let store = &mut *self.inner.lock().await;
        let item = store
            .items
            .iter_mut()
            .find(|item| item.item_id == id)
            .ok_or(Error::ItemNotFound(id))?;
        if !item.is_claimed() {
            return Err(Error::ItemNotClaimed(id));
        }
        item.processed = true;
        item.updated_at = Self::now();
        Ok(())
    }

    async fn delete_processed(&self, before: chrono::NaiveDateTime) -> Result<u64, Self::Error> {
        let store = &mut *self.inner.lock().await;
        let len = store.items.len();
        store
            .items
            .retain(|item| !(item.processed && item.updated_at < before));
        Ok((len - store.items.len()) as u64)
    }

    async fn release_claims(&self, before: chrono::NaiveDateTime) -> Result<u64, Self::Error> {
        let store = &mut *self.inner.lock().await;
        let mut released = 0;
        for item in store
            .items
            .iter_mut()
            .filter(|item| !item.processed && item.is_claimed() && item.updated_at < before)
        {
            item.token = None;
            item.updated_at = Self::now();
            released += 1;
        }
        Ok(released)
    }

    async fn count(&self, queue_name: &QueueName) -> Result<ItemCounts, Self::Error> {
        let store = &*self.inner.lock().await;
        Ok(store
            .items
            .iter()
            .filter(|item| &item.queue_name == queue_name)
            .fold(ItemCounts::default(), |mut counts, item| {
                if item.processed {
                    counts.processed += 1;
                } else if item.is_claimed() {
                    counts.claimed += 1;
                } else {
                    counts.unclaimed += 1;
                }
                counts
            }))
    }

    async fn find_item(&self, id: ItemId) -> Result<Option<QueueItem>, Self::Error> {
        let store = &*self.inner.lock().await;
        Ok(store.items.iter().find(|item| item.item_id == id).cloned())
    }
}

impl MockStoreAdaptor {
    fn now() -> chrono::NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }
}

#[cfg(test)]
use claimq_traits::test_store_adaptor;
#[cfg(test)]
test_store_adaptor!(MockStoreAdaptor::new());
