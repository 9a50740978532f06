#[derive(Clone, Debug)]
pub struct QueueConfig {
    /// How long processed items are kept before [super::Queue::cleanup] deletes them
    pub cleanup_expiry: chrono::Duration,
    /// Maximum age of a claim that was never processed. Older claims are released before every
    /// dequeue so their items can be delivered again, possibly a second time.
    ///
    /// When set to None, no claim is ever released and an item whose consumer died between
    /// claiming and processing stays claimed forever.
    pub claim_timeout: Option<chrono::Duration>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            cleanup_expiry: chrono::Duration::hours(1),
            claim_timeout: None,
        }
    }
}

impl QueueConfig {
    pub fn cleanup_expiry(mut self, expiry: chrono::Duration) -> Self {
        self.cleanup_expiry = expiry;
        self
    }

    pub fn claim_timeout(mut self, timeout: chrono::Duration) -> Self {
        self.claim_timeout = Some(timeout);
        self
    }
}
