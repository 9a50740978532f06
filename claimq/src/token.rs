use std::sync::atomic::{AtomicU64, Ordering};

use claimq_traits::Token;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Source of claim tokens.
///
/// A token digests the current time, the process id, the host name, a random instance id and a
/// counter. Two attempts in the same process and instant still differ by the counter, and
/// attempts from different hosts or processes differ by their identity, so no coordination is
/// needed between claimers.
#[derive(Debug)]
pub struct TokenGenerator {
    host: String,
    pid: u32,
    instance: Uuid,
    counter: AtomicU64,
}

impl TokenGenerator {
    pub fn new() -> Self {
        let host = hostname::get()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self::with_identity(host, std::process::id())
    }

    /// A generator claiming to run as process `pid` on `host`
    pub fn with_identity(host: impl Into<String>, pid: u32) -> Self {
        Self {
            host: host.into(),
            pid,
            instance: Uuid::new_v4(),
            counter: AtomicU64::new(0),
        }
    }

    /// Generate a fresh token. Each call yields a different 64 char hex string.
    pub fn next_token(&self) -> Token {
        let count = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let now = chrono::Utc::now();
        let mut digest = Sha256::new();
        digest.update(now.timestamp().to_be_bytes());
        digest.update(now.timestamp_subsec_nanos().to_be_bytes());
        digest.update(self.pid.to_be_bytes());
        digest.update(self.host.as_bytes());
        digest.update(self.instance.as_bytes());
        digest.update(count.to_be_bytes());
        Token::new(hex::encode(digest.finalize()))
    }

    /// Number of tokens handed out so far
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
