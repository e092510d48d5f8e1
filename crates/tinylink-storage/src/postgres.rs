use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tinylink_core::store::Result;
use tinylink_core::{Alias, Link, LinkStore, StoreError};
use tracing::{debug, info};

/// Table used when none is configured.
pub const DEFAULT_TABLE: &str = "links";

const MAX_IDENTIFIER_LENGTH: usize = 63;

/// SQL text rendered once for the configured table.
#[derive(Debug, Clone)]
struct Queries {
    create_table: String,
    insert: String,
    select_by_url: String,
    select_by_alias: String,
}

impl Queries {
    fn for_table(table: &str) -> Self {
        Self {
            create_table: format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id BIGSERIAL PRIMARY KEY,
                    short_link TEXT NOT NULL UNIQUE,
                    original_url TEXT NOT NULL UNIQUE
                )
                "#
            ),
            insert: format!(
                r#"
                INSERT INTO {table} (short_link, original_url)
                VALUES ($1, $2)
                ON CONFLICT (original_url) DO NOTHING
                RETURNING short_link
                "#
            ),
            select_by_url: format!(
                r#"
                SELECT short_link
                FROM {table}
                WHERE original_url = $1
                "#
            ),
            select_by_alias: format!(
                r#"
                SELECT original_url
                FROM {table}
                WHERE short_link = $1
                "#
            ),
        }
    }
}

/// PostgreSQL implementation of the [`LinkStore`] contract.
///
/// Uniqueness of both columns is enforced by the database. An insert that
/// hits an existing `original_url` is turned into a read of the row that
/// holds it, so concurrent saves of one URL converge on a single alias.
#[derive(Debug, Clone)]
pub struct PostgresLinkStore {
    pool: PgPool,
    table: String,
    queries: Queries,
}

impl PostgresLinkStore {
    /// Creates a store over an existing pool using the default table.
    ///
    /// The table is not created; call [`migrate`](Self::migrate) if needed.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table: DEFAULT_TABLE.to_string(),
            queries: Queries::for_table(DEFAULT_TABLE),
        }
    }

    /// Creates a store over an existing pool using `table`.
    ///
    /// The name must be a plain lowercase SQL identifier.
    pub fn with_table(pool: PgPool, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table)?;

        Ok(Self {
            pool,
            queries: Queries::for_table(&table),
            table,
        })
    }

    /// Opens a connection pool and creates the default table if missing.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with_table(database_url, DEFAULT_TABLE).await
    }

    /// Opens a connection pool and creates `table` if missing.
    pub async fn connect_with_table(database_url: &str, table: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        let store = Self::with_table(pool, table)?;
        store.migrate().await?;
        Ok(store)
    }

    /// Creates the links table if it does not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(&self.queries.create_table)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        info!(table = %self.table, "links table ready");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    async fn alias_for_url(&self, original_url: &str) -> Result<Alias> {
        let row = sqlx::query(&self.queries.select_by_url)
            .bind(original_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Err(StoreError::Operation(format!(
                "insert conflicted on original url '{original_url}' but no row holds it"
            )));
        };

        let alias: String = row.try_get("short_link").map_err(map_sqlx_error)?;
        Ok(Alias::new_unchecked(alias))
    }
}

fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if !starts_well || !rest_ok || table.len() > MAX_IDENTIFIER_LENGTH {
        return Err(StoreError::Operation(format!(
            "invalid table name '{table}': expected a lowercase SQL identifier"
        )));
    }

    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StoreError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StoreError::InvalidData(message),
        _ => StoreError::Query(message),
    }
}

#[async_trait]
impl LinkStore for PostgresLinkStore {
    async fn add(&self, link: Link) -> Result<Alias> {
        let inserted = sqlx::query(&self.queries.insert)
            .bind(link.alias.as_str())
            .bind(&link.original_url)
            .fetch_optional(&self.pool)
            .await;

        match inserted {
            Ok(Some(row)) => {
                let alias: String = row.try_get("short_link").map_err(map_sqlx_error)?;
                Ok(Alias::new_unchecked(alias))
            }
            Ok(None) => {
                debug!(original_url = %link.original_url, "original url already stored");
                self.alias_for_url(&link.original_url).await
            }
            Err(err) if is_unique_violation(&err) => {
                Err(StoreError::AliasExists(link.alias.into_inner()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn get_by_alias(&self, alias: &Alias) -> Result<Link> {
        let row = sqlx::query(&self.queries.select_by_alias)
            .bind(alias.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Err(StoreError::NotFound(alias.to_string()));
        };

        let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
        Ok(Link::new(alias.clone(), original_url))
    }
}
