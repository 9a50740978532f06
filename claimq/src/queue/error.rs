use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError<TStoreError, TCodecError> {
    #[error("Store Error: {0}")]
    StoreError(#[source] TStoreError),
    #[error("Serialization Error: {0}")]
    SerializationError(#[source] TCodecError),
}
