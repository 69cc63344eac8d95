//! Example consumer: a separate Rust project that uses sqlmap-dao as a dependency.
//!
//! Expects a table `app_user (id SERIAL PRIMARY KEY, name TEXT, status TEXT)`.
//! Run from repo root: `SQLMAP_DIR=example_consumer/sqlmap cargo run -p example-consumer`

use serde::{Deserialize, Serialize};
use sqlmap_dao::{connect, load_sql_map_dir, resolve, BaseDao, DataSourceConfig, PagingResult, Param, SearchModel};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
struct AppUser {
    id: i64,
    name: String,
    status: String,
}

#[derive(Serialize)]
struct NewUser<'a> {
    name: &'a str,
    status: &'a str,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sqlmap_dao=info")),
        )
        .init();

    let config = DataSourceConfig::from_env()?;
    let registry = Arc::new(resolve(&load_sql_map_dir(&config.sqlmap_dir)?)?);
    tracing::info!(statements = registry.len(), "sql maps resolved");
    let templates = connect(&config, registry).await?;
    let dao = BaseDao::new(templates).with_namespace(config.namespace.as_deref().unwrap_or("user"));

    let id = dao
        .save("insert", Param::entity(&NewUser { name: "ada", status: "active" })?)
        .await?;
    tracing::info!(id = ?id, "inserted");

    let mut by_id = sqlmap_dao::ParamBag::new();
    by_id.insert("id".into(), id.unwrap_or(serde_json::Value::Null));
    let fresh: Option<AppUser> = dao.find_one_by_m("findById", by_id).await?;
    tracing::info!(user = ?fresh, "read back on write channel");

    let model = SearchModel::new(1, 20).with("status", "active");
    let page: PagingResult<AppUser> = dao.find_for_page("countByStatus", "pageByStatus", &model).await?;
    tracing::info!(total = page.total, returned = page.list.len(), "first page");

    if let Some(user) = fresh {
        let renamed = AppUser { name: format!("{} (renamed)", user.name), ..user };
        let counts = dao.batch_update("rename", &[renamed]).await?;
        tracing::info!(counts = ?counts, "batch rename");
    }
    Ok(())
}
