//! In-memory executor that records every call, for unit tests.

use crate::error::DaoError;
use crate::executor::{Batch, BatchKind, Row, SqlMapExecutor};
use crate::param::Param;
use crate::sql::RowWindow;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub op: &'static str,
    pub statement: String,
    pub param: Param,
    pub window: Option<RowWindow>,
}

/// Answers every query with canned rows and remembers what it was asked.
#[derive(Default)]
pub struct RecordingExecutor {
    pub calls: Mutex<Vec<Call>>,
    pub object: Option<Row>,
    pub list: Vec<Row>,
    pub key: Option<Value>,
    pub affected: u64,
    /// When set, every call fails with `UnknownStatement` for this id.
    pub fail_with: Option<String>,
}

impl RecordingExecutor {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str, statement: &str, param: &Param, window: Option<RowWindow>) -> Result<(), DaoError> {
        self.calls.lock().unwrap().push(Call {
            op,
            statement: statement.to_string(),
            param: param.clone(),
            window,
        });
        match &self.fail_with {
            Some(id) => Err(DaoError::UnknownStatement(id.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SqlMapExecutor for RecordingExecutor {
    async fn query_for_object(&self, statement: &str, param: &Param) -> Result<Option<Row>, DaoError> {
        self.record("query_for_object", statement, param, None)?;
        Ok(self.object.clone())
    }

    async fn query_for_list(
        &self,
        statement: &str,
        param: &Param,
        window: Option<RowWindow>,
    ) -> Result<Vec<Row>, DaoError> {
        self.record("query_for_list", statement, param, window)?;
        let rows = self.list.iter().cloned();
        Ok(match window {
            Some(w) => rows.skip(w.skip as usize).take(w.max as usize).collect(),
            None => rows.collect(),
        })
    }

    async fn insert(&self, statement: &str, param: &Param) -> Result<Option<Value>, DaoError> {
        self.record("insert", statement, param, None)?;
        Ok(self.key.clone())
    }

    async fn update(&self, statement: &str, param: &Param) -> Result<u64, DaoError> {
        self.record("update", statement, param, None)?;
        Ok(self.affected)
    }

    async fn delete(&self, statement: &str, param: &Param) -> Result<u64, DaoError> {
        self.record("delete", statement, param, None)?;
        Ok(self.affected)
    }

    async fn execute_batch(&self, batch: Batch) -> Result<Vec<u64>, DaoError> {
        let mut out = Vec::with_capacity(batch.len());
        for (i, op) in batch.into_ops().into_iter().enumerate() {
            let name = match op.kind {
                BatchKind::Update => "batch_update",
                BatchKind::Delete => "batch_delete",
            };
            self.record(name, &op.statement, &op.param, None)?;
            out.push(i as u64);
        }
        Ok(out)
    }
}
