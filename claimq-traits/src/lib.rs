mod item;
mod queue_name;
mod store;
mod token;

pub use item::*;
pub use queue_name::*;
pub use store::*;
pub use token::*;

#[cfg(feature = "tests")]
pub use claimq_test_macros::test_store_adaptor;
