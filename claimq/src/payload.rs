use serde::de::DeserializeOwned;

/// A value that can come out of a queue
pub trait Payload: DeserializeOwned + Send {}

impl<T: DeserializeOwned + Send> Payload for T {}
