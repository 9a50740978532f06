use claimq_traits::ItemId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostgresStoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("item {0} not found")]
    ItemNotFound(ItemId),
    #[error("item {0} is not claimed")]
    ItemNotClaimed(ItemId),
    #[error("invalid table name {0:?}")]
    InvalidTableName(String),
}
