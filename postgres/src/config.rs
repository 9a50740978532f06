use crate::error::PostgresStoreError;

pub const DEFAULT_TABLE: &str = "claimq_items";

#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub database_url: String,
    /// Name of the item table. Letters, digits and underscores only.
    pub table: String,
    pub max_connections: u32,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/claimq".to_owned(),
            table: DEFAULT_TABLE.to_owned(),
            max_connections: 10,
        }
    }
}

impl PostgresConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

/// The table name is spliced into SQL text, so it must be a plain identifier
pub(crate) fn validate_table(table: &str) -> Result<(), PostgresStoreError> {
    let mut chars = table.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && table.len() <= 63;
    if valid {
        Ok(())
    } else {
        Err(PostgresStoreError::InvalidTableName(table.to_owned()))
    }
}
