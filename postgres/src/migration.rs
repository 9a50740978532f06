use sqlx::PgPool;

/// Create the item table and its indexes if they don't exist
pub async fn migrate(pool: &PgPool, table: &str) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            id BIGSERIAL PRIMARY KEY,
            queue_name TEXT NOT NULL,
            data BYTEA NOT NULL,
            processed BOOLEAN NOT NULL DEFAULT FALSE,
            token TEXT,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
    "#
    ))
    .execute(pool)
    .await?;

    // Claimable rows of a queue in delivery order
    sqlx::query(&format!(
        r#"
        CREATE INDEX IF NOT EXISTS {table}_claimable_idx
        ON {table} (queue_name, id)
        WHERE processed = FALSE AND token IS NULL
    "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS {table}_token_idx ON {table} (queue_name, token) WHERE token IS NOT NULL"
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS {table}_updated_idx ON {table} (processed, updated_at)"
    ))
    .execute(pool)
    .await?;

    Ok(())
}
