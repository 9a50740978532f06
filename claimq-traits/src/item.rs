use crate::{queue_name::QueueName, token::Token};

pub type ItemId = i64;

/// A persisted queue entry
#[derive(Clone, Debug, PartialEq)]
pub struct QueueItem {
    /// Ascending within a queue; defines delivery order
    pub item_id: ItemId,
    pub queue_name: QueueName,
    /// Payload as produced by the codec
    pub data: Vec<u8>,
    pub processed: bool,
    /// Set by the claim attempt that owns this item
    pub token: Option<Token>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

/// An item about to be inserted. It always starts unclaimed and unprocessed.
#[derive(Clone, Debug)]
pub struct NewItem {
    pub queue_name: QueueName,
    pub data: Vec<u8>,
}

/// Number of items of one queue in each stage of their lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemCounts {
    /// Waiting for a consumer
    pub unclaimed: u64,
    /// Claimed but not yet processed
    pub claimed: u64,
    /// Processed and waiting for cleanup
    pub processed: u64,
}

impl QueueItem {
    pub fn is_claimed(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_claimable(&self) -> bool {
        !self.processed && self.token.is_none()
    }
}

impl NewItem {
    pub fn new(queue_name: QueueName, data: Vec<u8>) -> Self {
        Self { queue_name, data }
    }
}
