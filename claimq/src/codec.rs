use serde::{de::DeserializeOwned, Serialize};

/// Turns payloads into the opaque bytes kept in the store and back.
///
/// A codec must decode what it encoded into an equal value.
pub trait Codec: Send + Sync + Clone {
    type Error: std::error::Error + Send + Sync + 'static;

    fn encode<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Vec<u8>, Self::Error>;

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, Self::Error>;
}

/// Stores payloads as JSON
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    type Error = serde_json::Error;

    fn encode<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Vec<u8>, Self::Error> {
        serde_json::to_vec(payload)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, Self::Error> {
        serde_json::from_slice(data)
    }
}
