use async_trait::async_trait;

use crate::{
    item::{ItemCounts, ItemId, NewItem, QueueItem},
    queue_name::QueueName,
    token::Token,
};

pub use self::error::StoreError;

mod error;

/// Persistence client backing a queue.
///
/// Every method is a single store operation. Exclusive delivery depends on
/// exactly one of them: [StoreAdaptor::claim_oldest] must set the token of a
/// row only if that row is still unclaimed at the moment of the write, so
/// that two racing callers can never both own it. Nothing else needs to be
/// atomic, and no call may hold locks beyond its own duration.
#[async_trait]
pub trait StoreAdaptor: Send + Sync + Clone {
    type Error: StoreError;

    /// Persist a new unclaimed, unprocessed item.
    ///
    /// Returns the id of the new item. Ids grow monotonically.
    async fn insert(&self, item: NewItem) -> Result<ItemId, Self::Error>;

    /// Among the rows of `queue_name` that are neither processed nor claimed,
    /// set `token` on the one with the smallest id and bump its `updated_at`.
    ///
    /// Returns the number of rows updated, either 0 or 1.
    async fn claim_oldest(
        &self,
        queue_name: &QueueName,
        token: &Token,
    ) -> Result<u64, Self::Error>;

    /// Find the unprocessed row of `queue_name` carrying `token`
    async fn find_claimed(
        &self,
        queue_name: &QueueName,
        token: &Token,
    ) -> Result<Option<QueueItem>, Self::Error>;

    /// Set `processed` on a claimed item and bump its `updated_at`. Its token is kept.
    ///
    /// Returns Err if the item does not exist or was never claimed.
    async fn mark_processed(&self, id: ItemId) -> Result<(), Self::Error>;

    /// Delete every processed item last updated before `before`.
    ///
    /// Returns the number of deleted items
    async fn delete_processed(&self, before: chrono::NaiveDateTime) -> Result<u64, Self::Error>;

    /// Clear the token of every claimed but unprocessed item last updated before `before`,
    /// making it claimable again.
    ///
    /// Returns the number of released items
    async fn release_claims(&self, before: chrono::NaiveDateTime) -> Result<u64, Self::Error>;

    /// Count the items of a queue by lifecycle stage
    async fn count(&self, queue_name: &QueueName) -> Result<ItemCounts, Self::Error>;

    /// Get an item by id, whatever its state
    async fn find_item(&self, id: ItemId) -> Result<Option<QueueItem>, Self::Error>;

    /// Claim the oldest claimable item of `queue_name` with `token`.
    ///
    /// Conditional update followed by a read-back of the row holding `token`. `None` means the
    /// queue had nothing claimable or a concurrent caller took the row first. Adaptors with a
    /// native update-returning form may override this as long as the guarantees hold.
    async fn claim(
        &self,
        queue_name: &QueueName,
        token: &Token,
    ) -> Result<Option<QueueItem>, Self::Error> {
        if self.claim_oldest(queue_name, token).await? == 0 {
            return Ok(None);
        }
        self.find_claimed(queue_name, token).await
    }
}
