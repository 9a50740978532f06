use std::sync::Arc;

use async_trait::async_trait;
use claimq_traits::{ItemCounts, ItemId, NewItem, QueueItem, QueueName, StoreAdaptor, Token};
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Row};
use tracing::{debug, warn};

use crate::{
    config::{validate_table, PostgresConfig},
    error::PostgresStoreError,
    migration,
};

/// Store adaptor keeping items in a PostgreSQL table
#[derive(Clone)]
pub struct PostgresStoreAdaptor {
    pool: PgPool,
    table: Arc<str>,
    statements: Arc<Statements>,
}

/// SQL text for one table, built once
struct Statements {
    insert: String,
    claim_oldest: String,
    find_claimed: String,
    mark_processed: String,
    delete_processed: String,
    release_claims: String,
    count: String,
    find_item: String,
}

impl Statements {
    fn new(table: &str) -> Self {
        const COLUMNS: &str = "id, queue_name, data, processed, token, created_at, updated_at";
        Self {
            insert: format!(
                "INSERT INTO {table} (queue_name, data, processed, token, created_at, updated_at) \
                 VALUES ($1, $2, FALSE, NULL, $3, $3) RETURNING id"
            ),
            claim_oldest: format!(
                r#"
                UPDATE {table} SET token = $2, updated_at = $3
                WHERE id = (
                    SELECT id FROM {table}
                    WHERE queue_name = $1 AND processed = FALSE AND token IS NULL
                    ORDER BY id ASC
                    LIMIT 1
                    FOR UPDATE SKIP LOCKED
                )
                AND token IS NULL
            "#
            ),
            find_claimed: format!(
                "SELECT {COLUMNS} FROM {table} \
                 WHERE queue_name = $1 AND token = $2 AND processed = FALSE LIMIT 1"
            ),
            mark_processed: format!(
                "UPDATE {table} SET processed = TRUE, updated_at = $2 \
                 WHERE id = $1 AND token IS NOT NULL"
            ),
            delete_processed: format!(
                "DELETE FROM {table} WHERE processed = TRUE AND updated_at < $1"
            ),
            release_claims: format!(
                "UPDATE {table} SET token = NULL, updated_at = $2 \
                 WHERE processed = FALSE AND token IS NOT NULL AND updated_at < $1"
            ),
            count: format!(
                r#"
                SELECT
                    COUNT(*) FILTER (WHERE processed = FALSE AND token IS NULL) AS unclaimed,
                    COUNT(*) FILTER (WHERE processed = FALSE AND token IS NOT NULL) AS claimed,
                    COUNT(*) FILTER (WHERE processed = TRUE) AS processed
                FROM {table}
                WHERE queue_name = $1
            "#
            ),
            find_item: format!("SELECT {COLUMNS} FROM {table} WHERE id = $1"),
        }
    }
}

impl PostgresStoreAdaptor {
    /// Open a connection pool and create the item table if needed
    pub async fn connect(config: PostgresConfig) -> Result<Self, PostgresStoreError> {
        validate_table(&config.table)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        let store = Self::from_pool(pool, &config.table)?;
        store.migrate().await?;
        Ok(store)
    }

    /// Use an existing pool. The table is expected to exist, see [PostgresStoreAdaptor::migrate].
    pub fn from_pool(pool: PgPool, table: &str) -> Result<Self, PostgresStoreError> {
        validate_table(table)?;
        Ok(Self {
            pool,
            table: Arc::from(table),
            statements: Arc::new(Statements::new(table)),
        })
    }

    /// Create the item table and its indexes if they don't exist
    pub async fn migrate(&self) -> Result<(), PostgresStoreError> {
        migration::migrate(&self.pool, &self.table).await?;
        debug!(table = %self.table, "item table ready");
        Ok(())
    }

    fn now() -> chrono::NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }

    fn parse_item(row: &PgRow) -> Result<QueueItem, sqlx::Error> {
        Ok(QueueItem {
            item_id: row.try_get("id")?,
            queue_name: QueueName::new(row.try_get::<String, _>("queue_name")?),
            data: row.try_get("data")?,
            processed: row.try_get("processed")?,
            token: row.try_get::<Option<String>, _>("token")?.map(Token::new),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl StoreAdaptor for PostgresStoreAdaptor {
    type Error = PostgresStoreError;

    async fn insert(&self, item: NewItem) -> Result<ItemId, Self::Error> {
        let row = sqlx::query(&self.statements.insert)
            .bind(item.queue_name.as_str())
            .bind(item.data)
            .bind(Self::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("id")?)
    }

    async fn claim_oldest(
        &self,
        queue_name: &QueueName,
        token: &Token,
    ) -> Result<u64, Self::Error> {
        let result = sqlx::query(&self.statements.claim_oldest)
            .bind(queue_name.as_str())
            .bind(token.as_str())
            .bind(Self::now())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn find_claimed(
        &self,
        queue_name: &QueueName,
        token: &Token,
    ) -> Result<Option<QueueItem>, Self::Error> {
        let row = sqlx::query(&self.statements.find_claimed)
            .bind(queue_name.as_str())
            .bind(token.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(Self::parse_item).transpose()?)
    }

    async fn mark_processed(&self, id: ItemId) -> Result<(), Self::Error> {
        let result = sqlx::query(&self.statements.mark_processed)
            .bind(id)
            .bind(Self::now())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            return Ok(());
        }
        if self.find_item(id).await?.is_some() {
            warn!(table = %self.table, id, "unclaimed item cannot be processed");
            Err(PostgresStoreError::ItemNotClaimed(id))
        } else {
            warn!(table = %self.table, id, "processed item is missing");
            Err(PostgresStoreError::ItemNotFound(id))
        }
    }

    async fn delete_processed(&self, before: chrono::NaiveDateTime) -> Result<u64, Self::Error> {
        let result = sqlx::query(&self.statements.delete_processed)
            .bind(before)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn release_claims(&self, before: chrono::NaiveDateTime) -> Result<u64, Self::Error> {
        let result = sqlx::query(&self.statements.release_claims)
            .bind(before)
            .bind(Self::now())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self, queue_name: &QueueName) -> Result<ItemCounts, Self::Error> {
        let row = sqlx::query(&self.statements.count)
            .bind(queue_name.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(ItemCounts {
            unclaimed: row.try_get::<i64, _>("unclaimed")? as u64,
            claimed: row.try_get::<i64, _>("claimed")? as u64,
            processed: row.try_get::<i64, _>("processed")? as u64,
        })
    }

    async fn find_item(&self, id: ItemId) -> Result<Option<QueueItem>, Self::Error> {
        let row = sqlx::query(&self.statements.find_item)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(Self::parse_item).transpose()?)
    }
}
