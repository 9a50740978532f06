//! PostgreSQL store adaptor.
//!
//! Items live in one table. A claim is a single `UPDATE` whose target row is picked with
//! `FOR UPDATE SKIP LOCKED` and re-checked for a null token, so concurrent claimers never wait
//! on each other and never share a row.

mod config;
mod error;
mod migration;
mod store;

pub use config::PostgresConfig;
pub use error::PostgresStoreError;
pub use store::PostgresStoreAdaptor;
