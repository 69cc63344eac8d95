//! Mapped-statement execution against PostgreSQL.

use crate::config::{MappedStatement, StatementKind, StatementRegistry};
use crate::error::DaoError;
use crate::executor::{Batch, BatchKind, Row, SqlMapExecutor};
use crate::param::Param;
use crate::pg::row::{first_column, row_to_json};
use crate::sql::{bind, windowed, PgBindValue, QueryBuf, RowWindow};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgConnection};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};
use std::sync::Arc;

/// Runs registered statements on one pool. Build one per channel.
#[derive(Clone)]
pub struct PgSqlMapExecutor {
    pool: PgPool,
    registry: Arc<StatementRegistry>,
}

impl PgSqlMapExecutor {
    pub fn new(pool: PgPool, registry: Arc<StatementRegistry>) -> Self {
        PgSqlMapExecutor { pool, registry }
    }

    fn prepare(&self, statement: &str, kind: StatementKind, param: &Param) -> Result<QueryBuf, DaoError> {
        let stmt: &MappedStatement = self.registry.get_as(statement, kind)?;
        Ok(bind(stmt, param))
    }

    async fn execute_on(conn: &mut PgConnection, q: &QueryBuf) -> Result<u64, DaoError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (batch)");
        let done = bind_params(&q.sql, &q.params).execute(&mut *conn).await?;
        Ok(done.rows_affected())
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, DaoError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let done = bind_params(&q.sql, &q.params).execute(&self.pool).await?;
        Ok(done.rows_affected())
    }
}

/// Parameter types are declared per call from the bound values (NULL leaves
/// the type to the server), so the statement must not be cached by SQL text:
/// a cached plan would pin the first call's types for every later call.
fn bind_params<'q>(sql: &'q str, params: &[Value]) -> Query<'q, Postgres, PgArguments> {
    let mut query = sqlx::query(sql).persistent(false);
    for p in params {
        query = query.bind(PgBindValue::from_json(p));
    }
    query
}

#[async_trait]
impl SqlMapExecutor for PgSqlMapExecutor {
    async fn query_for_object(&self, statement: &str, param: &Param) -> Result<Option<Row>, DaoError> {
        let q = self.prepare(statement, StatementKind::Select, param)?;
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_params(&q.sql, &q.params).fetch_optional(&self.pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    async fn query_for_list(
        &self,
        statement: &str,
        param: &Param,
        window: Option<RowWindow>,
    ) -> Result<Vec<Row>, DaoError> {
        let mut q = self.prepare(statement, StatementKind::Select, param)?;
        if let Some(w) = window {
            q = windowed(q, w);
        }
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_params(&q.sql, &q.params).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn insert(&self, statement: &str, param: &Param) -> Result<Option<Value>, DaoError> {
        let q = self.prepare(statement, StatementKind::Insert, param)?;
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_params(&q.sql, &q.params).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().and_then(first_column))
    }

    async fn update(&self, statement: &str, param: &Param) -> Result<u64, DaoError> {
        let q = self.prepare(statement, StatementKind::Update, param)?;
        self.execute(&q).await
    }

    async fn delete(&self, statement: &str, param: &Param) -> Result<u64, DaoError> {
        let q = self.prepare(statement, StatementKind::Delete, param)?;
        self.execute(&q).await
    }

    async fn execute_batch(&self, batch: Batch) -> Result<Vec<u64>, DaoError> {
        // resolve everything before opening the transaction
        let prepared = batch
            .ops()
            .iter()
            .map(|op| {
                let kind = match op.kind {
                    BatchKind::Update => StatementKind::Update,
                    BatchKind::Delete => StatementKind::Delete,
                };
                self.prepare(&op.statement, kind, &op.param)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = Vec::with_capacity(prepared.len());
        let mut tx = self.pool.begin().await?;
        for q in &prepared {
            out.push(Self::execute_on(&mut tx, q).await?);
        }
        tx.commit().await?;
        tracing::debug!(size = out.len(), "batch executed");
        Ok(out)
    }
}
