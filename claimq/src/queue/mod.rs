use std::sync::Arc;

use chrono::NaiveDateTime;
use claimq_traits::{IntoQueueName, ItemCounts, NewItem, QueueName, StoreAdaptor};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    claim::claim_next,
    codec::{Codec, JsonCodec},
    payload::Payload,
    token::TokenGenerator,
};

mod config;
mod error;

pub use config::QueueConfig;
pub use error::QueueError;

/// FIFO queues kept in a shared store.
///
/// Any number of producers and consumers, in this process or elsewhere, may use the same store
/// concurrently. Every item is handed to at most one consumer. Cloning is cheap and clones share
/// one token generator.
#[derive(Clone)]
pub struct Queue<TStore: StoreAdaptor, TCodec: Codec = JsonCodec> {
    config: QueueConfig,
    store: TStore,
    codec: TCodec,
    tokens: Arc<TokenGenerator>,
}

impl<TStore: StoreAdaptor> Queue<TStore, JsonCodec> {
    pub fn new(store: TStore, config: QueueConfig) -> Self {
        Self::with_codec(store, JsonCodec, config)
    }
}

impl<TStore: StoreAdaptor, TCodec: Codec> Queue<TStore, TCodec> {
    pub fn with_codec(store: TStore, codec: TCodec, config: QueueConfig) -> Self {
        Self {
            config,
            store,
            codec,
            tokens: Arc::new(TokenGenerator::new()),
        }
    }

    pub fn store(&self) -> &TStore {
        &self.store
    }

    /// Append a payload to the queue `queue_name`. Strings, string slices and anything else
    /// displaying the same text name the same queue.
    pub async fn enqueue<TPayload: Serialize + Sync + ?Sized>(
        &self,
        queue_name: impl IntoQueueName,
        payload: &TPayload,
    ) -> Result<(), QueueError<TStore::Error, TCodec::Error>> {
        let queue_name = queue_name.into_queue_name();
        let data = self
            .codec
            .encode(payload)
            .map_err(|e| QueueError::SerializationError(e))?;
        let id = self
            .store
            .insert(NewItem::new(queue_name.clone(), data))
            .await
            .map_err(|e| QueueError::StoreError(e))?;
        debug!(queue = %queue_name, id, "item enqueued");
        Ok(())
    }

    /// Take the oldest unprocessed payload of the queue `queue_name`.
    ///
    /// Returns immediately with `None` if the queue holds nothing to deliver, including when a
    /// concurrent consumer took the last item first. Never waits for new items.
    pub async fn dequeue<TPayload: Payload>(
        &self,
        queue_name: impl IntoQueueName,
    ) -> Result<Option<TPayload>, QueueError<TStore::Error, TCodec::Error>> {
        let queue_name = queue_name.into_queue_name();
        if let Some(timeout) = self.config.claim_timeout {
            self.reclaim_stale_claims(timeout).await?;
        }
        let Some(claimed) = claim_next(&self.store, &self.tokens, &queue_name)
            .await
            .map_err(|e| QueueError::StoreError(e))?
        else {
            debug!(queue = %queue_name, "nothing to dequeue");
            return Ok(None);
        };
        let item = claimed.item;
        self.store
            .mark_processed(item.item_id)
            .await
            .map_err(|e| QueueError::StoreError(e))?;
        debug!(queue = %queue_name, id = item.item_id, "item dequeued");
        Ok(Some(
            self.codec
                .decode(&item.data)
                .map_err(|e| QueueError::SerializationError(e))?,
        ))
    }

    /// Delete processed items older than the configured expiry, an hour by default
    pub async fn cleanup(&self) -> Result<u64, QueueError<TStore::Error, TCodec::Error>> {
        self.cleanup_older_than(self.config.cleanup_expiry).await
    }

    /// Delete items of every queue processed more than `expiry` ago.
    ///
    /// Unprocessed items are never touched. Repeating a failed cleanup is safe.
    pub async fn cleanup_older_than(
        &self,
        expiry: chrono::Duration,
    ) -> Result<u64, QueueError<TStore::Error, TCodec::Error>> {
        let Some(before) = Self::cutoff(expiry) else {
            return Ok(0);
        };
        let deleted = self
            .store
            .delete_processed(before)
            .await
            .map_err(|e| QueueError::StoreError(e))?;
        if deleted > 0 {
            info!(deleted, "processed items cleaned up");
        }
        Ok(deleted)
    }

    /// Release claims of every queue that were not processed within `timeout`, so their items can
    /// be claimed again
    pub async fn reclaim_stale_claims(
        &self,
        timeout: chrono::Duration,
    ) -> Result<u64, QueueError<TStore::Error, TCodec::Error>> {
        let Some(before) = Self::cutoff(timeout) else {
            return Ok(0);
        };
        let released = self
            .store
            .release_claims(before)
            .await
            .map_err(|e| QueueError::StoreError(e))?;
        if released > 0 {
            info!(released, "stale claims released");
        }
        Ok(released)
    }

    /// Number of items of the queue `queue_name` in each stage
    pub async fn stats(
        &self,
        queue_name: impl IntoQueueName,
    ) -> Result<ItemCounts, QueueError<TStore::Error, TCodec::Error>> {
        let queue_name: QueueName = queue_name.into_queue_name();
        self.store
            .count(&queue_name)
            .await
            .map_err(|e| QueueError::StoreError(e))
    }

    /// The instant `age` ago. `None` if that precedes the earliest representable time, in which
    /// case nothing is that old.
    fn cutoff(age: chrono::Duration) -> Option<NaiveDateTime> {
        match Self::now().checked_sub_signed(age) {
            Some(before) => Some(before),
            None if age < chrono::Duration::zero() => Some(NaiveDateTime::MAX),
            None => None,
        }
    }

    fn now() -> NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }
}
