//! PostgreSQL implementation of the sql-map executor.

mod executor;
pub mod row;

pub use executor::PgSqlMapExecutor;

use crate::config::{mask_password, DataSourceConfig, StatementRegistry};
use crate::error::DaoError;
use crate::executor::SqlMapTemplates;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;

async fn connect_pool(url: &str, max_connections: u32) -> Result<PgPool, DaoError> {
    tracing::info!(url = %mask_password(url), max_connections, "connecting to PostgreSQL");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;
    Ok(pool)
}

/// Open the write pool and, when configured separately, the read pool, and
/// wrap both in executors sharing one statement registry.
pub async fn connect(
    config: &DataSourceConfig,
    registry: Arc<StatementRegistry>,
) -> Result<SqlMapTemplates, DaoError> {
    let write_pool = connect_pool(&config.write_url, config.max_connections).await?;
    let write = Arc::new(PgSqlMapExecutor::new(write_pool, registry.clone()));
    if !config.has_separate_read() {
        return Ok(SqlMapTemplates::single(write));
    }
    let read_pool = connect_pool(&config.read_url, config.max_connections).await?;
    let read = Arc::new(PgSqlMapExecutor::new(read_pool, registry));
    Ok(SqlMapTemplates::new(read, write))
}
