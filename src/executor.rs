//! Executor contract the DAO facade dispatches to, plus read/write channel selection.

use crate::error::DaoError;
use crate::param::Param;
use crate::sql::RowWindow;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// One result row, column name to value.
pub type Row = Map<String, Value>;

/// Which connection role handles a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Read-only target; may lag the write target.
    Read,
    /// Write-capable target; reads here see preceding writes.
    Write,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channel::Read => "read",
            Channel::Write => "write",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchKind {
    Update,
    Delete,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BatchOp {
    pub kind: BatchKind,
    pub statement: String,
    pub param: Param,
}

/// Write operations queued to run as one unit, in queue order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Batch {
    ops: Vec<BatchOp>,
}

impl Batch {
    pub fn start() -> Self {
        Batch { ops: Vec::new() }
    }

    pub fn with_capacity(n: usize) -> Self {
        Batch {
            ops: Vec::with_capacity(n),
        }
    }

    pub fn update(&mut self, statement: impl Into<String>, param: Param) {
        self.push(BatchKind::Update, statement.into(), param);
    }

    pub fn delete(&mut self, statement: impl Into<String>, param: Param) {
        self.push(BatchKind::Delete, statement.into(), param);
    }

    fn push(&mut self, kind: BatchKind, statement: String, param: Param) {
        self.ops.push(BatchOp {
            kind,
            statement,
            param,
        });
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Primitive operations of a SQL-mapping engine. Statement ids arrive fully
/// qualified; implementations resolve and run them and report failures as-is.
#[async_trait]
pub trait SqlMapExecutor: Send + Sync {
    async fn query_for_object(&self, statement: &str, param: &Param) -> Result<Option<Row>, DaoError>;

    async fn query_for_list(
        &self,
        statement: &str,
        param: &Param,
        window: Option<RowWindow>,
    ) -> Result<Vec<Row>, DaoError>;

    /// Returns the generated key when the statement yields one.
    async fn insert(&self, statement: &str, param: &Param) -> Result<Option<Value>, DaoError>;

    async fn update(&self, statement: &str, param: &Param) -> Result<u64, DaoError>;

    async fn delete(&self, statement: &str, param: &Param) -> Result<u64, DaoError>;

    /// Run every queued operation as one unit. The result holds one affected-row
    /// count per operation, in queue order.
    async fn execute_batch(&self, batch: Batch) -> Result<Vec<u64>, DaoError>;
}

/// The read and write executors a DAO dispatches between.
#[derive(Clone)]
pub struct SqlMapTemplates {
    read: Arc<dyn SqlMapExecutor>,
    write: Arc<dyn SqlMapExecutor>,
}

impl SqlMapTemplates {
    pub fn new(read: Arc<dyn SqlMapExecutor>, write: Arc<dyn SqlMapExecutor>) -> Self {
        SqlMapTemplates { read, write }
    }

    /// One executor serving both channels.
    pub fn single(executor: Arc<dyn SqlMapExecutor>) -> Self {
        SqlMapTemplates {
            read: executor.clone(),
            write: executor,
        }
    }

    pub fn template(&self, channel: Channel) -> &dyn SqlMapExecutor {
        match channel {
            Channel::Read => self.read.as_ref(),
            Channel::Write => self.write.as_ref(),
        }
    }
}

/// Map a row into the caller's type. A single-column row that does not fit
/// `T` as an object is tried as its bare column value, so id lists work.
pub fn map_row<T: DeserializeOwned>(row: Row) -> Result<T, DaoError> {
    let single = if row.len() == 1 {
        row.values().next().cloned()
    } else {
        None
    };
    match serde_json::from_value(Value::Object(row)) {
        Ok(v) => Ok(v),
        Err(e) => match single {
            Some(value) => serde_json::from_value(value).map_err(|_| DaoError::Mapping(e)),
            None => Err(DaoError::Mapping(e)),
        },
    }
}
