//! Base DAO: namespaces statement ids, picks the read or write executor, and
//! forwards each call unchanged.
//!
//! Reads go to [`Channel::Read`] unless a `*_by_m` variant (or an explicit
//! channel) asks for the write executor, which is how a caller reads its own
//! preceding writes. Every write goes to [`Channel::Write`].

use crate::error::DaoError;
use crate::executor::{map_row, Batch, Channel, Row, SqlMapTemplates};
use crate::paging::PagingResult;
use crate::param::{Param, ParamBag};
use crate::search::SearchModel;
use crate::sql::RowWindow;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Hook every dispatch passes through before reaching an executor; receives
/// the qualified statement id and may replace the payload.
pub trait ParamRouter: Send + Sync {
    fn route(&self, statement: &str, param: Param) -> Param;
}

/// Router that returns the payload untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThrough;

impl ParamRouter for PassThrough {
    fn route(&self, _statement: &str, param: Param) -> Param {
        param
    }
}

#[derive(Clone)]
pub struct BaseDao {
    templates: SqlMapTemplates,
    namespace: Option<String>,
    router: Arc<dyn ParamRouter>,
}

impl BaseDao {
    pub fn new(templates: SqlMapTemplates) -> Self {
        BaseDao {
            templates,
            namespace: None,
            router: Arc::new(PassThrough),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.set_namespace(namespace);
        self
    }

    pub fn with_router(mut self, router: Arc<dyn ParamRouter>) -> Self {
        self.router = router;
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// An empty namespace clears it.
    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        let ns = namespace.into().trim().to_string();
        self.namespace = if ns.is_empty() { None } else { Some(ns) };
    }

    /// The id a statement is dispatched under: `namespace.id`, or the trimmed id
    /// when no namespace is set.
    pub fn statement_id(&self, id: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, id.trim()),
            None => id.trim().to_string(),
        }
    }

    /// Flatten a search model into parameters; later duplicates win.
    pub fn condition_map(&self, model: &SearchModel) -> ParamBag {
        model.condition_map()
    }

    fn dispatch(&self, id: &str, param: Param, channel: Channel) -> (String, Param) {
        let statement = self.statement_id(id);
        tracing::debug!(statement = %statement, channel = %channel, "dispatch");
        let param = self.router.route(&statement, param);
        (statement, param)
    }

    pub async fn find_one_on<T: DeserializeOwned>(
        &self,
        channel: Channel,
        id: &str,
        param: impl Into<Param>,
    ) -> Result<Option<T>, DaoError> {
        let (statement, param) = self.dispatch(id, param.into(), channel);
        let row = self
            .templates
            .template(channel)
            .query_for_object(&statement, &param)
            .await?;
        row.map(map_row).transpose()
    }

    pub async fn find_one<T: DeserializeOwned>(
        &self,
        id: &str,
        param: impl Into<Param>,
    ) -> Result<Option<T>, DaoError> {
        self.find_one_on(Channel::Read, id, param).await
    }

    pub async fn find_one_by_m<T: DeserializeOwned>(
        &self,
        id: &str,
        param: impl Into<Param>,
    ) -> Result<Option<T>, DaoError> {
        self.find_one_on(Channel::Write, id, param).await
    }

    pub async fn find_all_on<T: DeserializeOwned>(
        &self,
        channel: Channel,
        id: &str,
        param: impl Into<Param>,
    ) -> Result<Vec<T>, DaoError> {
        let (statement, param) = self.dispatch(id, param.into(), channel);
        let rows = self
            .templates
            .template(channel)
            .query_for_list(&statement, &param, None)
            .await?;
        rows.into_iter().map(map_row).collect()
    }

    pub async fn find_all<T: DeserializeOwned>(
        &self,
        id: &str,
        param: impl Into<Param>,
    ) -> Result<Vec<T>, DaoError> {
        self.find_all_on(Channel::Read, id, param).await
    }

    pub async fn find_all_by_m<T: DeserializeOwned>(
        &self,
        id: &str,
        param: impl Into<Param>,
    ) -> Result<Vec<T>, DaoError> {
        self.find_all_on(Channel::Write, id, param).await
    }

    pub async fn count_on(
        &self,
        channel: Channel,
        id: &str,
        param: impl Into<Param>,
    ) -> Result<i64, DaoError> {
        let (statement, param) = self.dispatch(id, param.into(), channel);
        let row = self
            .templates
            .template(channel)
            .query_for_object(&statement, &param)
            .await?;
        normalize_count(&statement, row)
    }

    pub async fn count(&self, id: &str, param: impl Into<Param>) -> Result<i64, DaoError> {
        self.count_on(Channel::Read, id, param).await
    }

    pub async fn count_by_m(&self, id: &str, param: impl Into<Param>) -> Result<i64, DaoError> {
        self.count_on(Channel::Write, id, param).await
    }

    /// Insert; returns the generated key if the statement produces one.
    pub async fn save(&self, id: &str, param: impl Into<Param>) -> Result<Option<Value>, DaoError> {
        let (statement, param) = self.dispatch(id, param.into(), Channel::Write);
        self.templates
            .template(Channel::Write)
            .insert(&statement, &param)
            .await
    }

    pub async fn update(&self, id: &str, param: impl Into<Param>) -> Result<u64, DaoError> {
        let (statement, param) = self.dispatch(id, param.into(), Channel::Write);
        self.templates
            .template(Channel::Write)
            .update(&statement, &param)
            .await
    }

    pub async fn delete(&self, id: &str, param: impl Into<Param>) -> Result<u64, DaoError> {
        let (statement, param) = self.dispatch(id, param.into(), Channel::Write);
        self.templates
            .template(Channel::Write)
            .delete(&statement, &param)
            .await
    }

    /// One update per entity, in slice order, executed as a single batch.
    /// The result is index-aligned with `entities`.
    pub async fn batch_update<E: Serialize>(&self, id: &str, entities: &[E]) -> Result<Vec<u64>, DaoError> {
        let mut batch = Batch::with_capacity(entities.len());
        for entity in entities {
            let (statement, param) = self.dispatch(id, Param::entity(entity)?, Channel::Write);
            batch.update(statement, param);
        }
        self.run_batch(batch).await
    }

    /// One delete per entity, in slice order, executed as a single batch.
    /// The result is index-aligned with `entities`.
    pub async fn batch_delete<E: Serialize>(&self, id: &str, entities: &[E]) -> Result<Vec<u64>, DaoError> {
        let mut batch = Batch::with_capacity(entities.len());
        for entity in entities {
            let (statement, param) = self.dispatch(id, Param::entity(entity)?, Channel::Write);
            batch.delete(statement, param);
        }
        self.run_batch(batch).await
    }

    async fn run_batch(&self, batch: Batch) -> Result<Vec<u64>, DaoError> {
        tracing::debug!(size = batch.len(), "batch start");
        self.templates
            .template(Channel::Write)
            .execute_batch(batch)
            .await
    }

    /// One page of `id` plus the total from `count_id`, both on the read
    /// channel with the same parameters. The two reads are not a snapshot.
    pub async fn find_for_page<T: DeserializeOwned>(
        &self,
        count_id: &str,
        id: &str,
        model: &SearchModel,
    ) -> Result<PagingResult<T>, DaoError> {
        let params = Param::Map(self.condition_map(model));
        let window = RowWindow::new(model.first_row_index(), u64::from(model.page_size));

        let (statement, param) = self.dispatch(id, params.clone(), Channel::Read);
        let rows = self
            .templates
            .template(Channel::Read)
            .query_for_list(&statement, &param, Some(window))
            .await?;
        let list = rows.into_iter().map(map_row).collect::<Result<Vec<T>, _>>()?;

        let total = self.count_on(Channel::Read, count_id, params).await?;
        Ok(PagingResult::new(total, list))
    }
}

/// Turn the first column of a count row into an `i64`. 32-bit values widen,
/// 64-bit values pass through, anything else fails.
pub fn normalize_count(statement: &str, row: Option<Row>) -> Result<i64, DaoError> {
    let value = row.and_then(|r| r.into_iter().next().map(|(_, v)| v));
    let n = match &value {
        Some(Value::Number(n)) => n.as_i64(),
        _ => None,
    };
    match n {
        Some(n) if i32::try_from(n).is_ok() => {
            tracing::debug!(statement = %statement, "count result integer");
            Ok(n)
        }
        Some(n) => {
            tracing::debug!(statement = %statement, "count result long");
            Ok(n)
        }
        None => {
            tracing::debug!(statement = %statement, "count result neither long nor integer");
            Err(DaoError::CountType {
                statement: statement.to_string(),
                found: value.map_or_else(|| "no row".to_string(), |v| v.to_string()),
            })
        }
    }
}
