mod store;

pub use store::{Error, MockStoreAdaptor};
