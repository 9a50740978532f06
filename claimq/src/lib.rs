pub mod claim;
pub mod codec;
pub mod payload;
pub mod queue;
pub mod token;

pub use claimq_traits::{
    IntoQueueName, ItemCounts, ItemId, NewItem, QueueItem, QueueName, StoreAdaptor, StoreError,
    Token,
};
pub use codec::{Codec, JsonCodec};
pub use payload::Payload;
pub use queue::{Queue, QueueConfig, QueueError};
pub use token::TokenGenerator;
