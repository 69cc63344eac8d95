//! PgSqlMapExecutor against a live PostgreSQL server.
//!
//! The database tests are ignored by default. Run them with
//! `DATABASE_URL=postgres://... cargo test --test postgres -- --ignored`.
//! Each test gets its own single-connection pool and works on TEMP tables,
//! so nothing outlives the test and tests do not see each other's rows.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlmap_dao::config::StatementKind;
use sqlmap_dao::{
    connect, load_sql_map_dir, parse_sql_map, resolve, BaseDao, DaoError, DataSourceConfig, PagingResult, Param,
    Row, SearchModel,
};
use std::path::PathBuf;
use std::sync::Arc;

const SCRATCH: &str = r#"{
    "namespace": "scratch",
    "statements": [
        { "id": "createUsers", "kind": "update",
          "sql": "CREATE TEMP TABLE app_user (id SERIAL PRIMARY KEY, name TEXT NOT NULL, status TEXT)" },
        { "id": "createStock", "kind": "update",
          "sql": "CREATE TEMP TABLE stock (id INT PRIMARY KEY, qty INT)" },
        { "id": "seedUsers", "kind": "update",
          "sql": "INSERT INTO app_user (name, status) SELECT 'user' || g, CASE WHEN g % 2 = 1 THEN 'odd' ELSE 'even' END FROM generate_series(1, #n#) AS g" },
        { "id": "addStock", "kind": "insert", "sql": "INSERT INTO stock (id) VALUES (#id#)" },
        { "id": "setQty", "kind": "update", "sql": "UPDATE stock SET qty = #qty# WHERE id = #id#" },
        { "id": "findStock", "kind": "select", "sql": "SELECT id, qty FROM stock WHERE id = #id#" },
        { "id": "sumIds", "kind": "select", "sql": "SELECT SUM(id::int8) AS total FROM app_user" },
        { "id": "literals", "kind": "select",
          "sql": "SELECT 2.50::numeric AS price, true AS flag, NULL::int AS missing, '{\"a\":1}'::jsonb AS doc, DATE '2024-02-29' AS day, 'f47ac10b-58cc-4372-a567-0e02b2c3d479'::uuid AS ref" }
    ]
}"#;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct AppUser {
    id: i64,
    name: String,
    status: String,
}

#[derive(Clone, Copy, Serialize)]
struct Rename<'a> {
    id: i64,
    name: Option<&'a str>,
}

fn consumer_sqlmap_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("example_consumer/sqlmap")
}

/// Consumer statements under `user.*` plus the `scratch.*` helpers above.
async fn connected() -> BaseDao {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("sqlmap_dao=debug"))
        .with_test_writer()
        .try_init();
    let mut config = DataSourceConfig::from_env().expect("DATABASE_URL must name a scratch database");
    // TEMP tables live on one connection
    config.read_url = config.write_url.clone();
    config.max_connections = 1;

    let mut maps = load_sql_map_dir(consumer_sqlmap_dir()).unwrap();
    maps.push(parse_sql_map(SCRATCH).unwrap());
    let registry = Arc::new(resolve(&maps).unwrap());
    let dao = BaseDao::new(connect(&config, registry).await.unwrap());
    dao.update("scratch.createUsers", ()).await.unwrap();
    dao.update("scratch.createStock", ()).await.unwrap();
    dao
}

async fn stock_qty(dao: &BaseDao, id: i64) -> Value {
    let row: Option<Row> = dao.find_one("scratch.findStock", id).await.unwrap();
    row.unwrap()["qty"].clone()
}

#[test]
fn consumer_sql_map_resolves() {
    let registry = resolve(&load_sql_map_dir(consumer_sqlmap_dir()).unwrap()).unwrap();
    assert_eq!(registry.len(), 6);
    assert!(registry.get_as("user.insert", StatementKind::Insert).is_ok());
    assert!(registry.get_as("user.pageByStatus", StatementKind::Select).is_ok());
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn null_then_value_on_the_same_placeholder() {
    let dao = connected().await;
    let key = dao.save("scratch.addStock", Param::Entity(json!({ "id": 1 }))).await.unwrap();
    assert_eq!(key, None);

    let set = |qty: Value| Param::Entity(json!({ "id": 1, "qty": qty }));
    assert_eq!(dao.update("scratch.setQty", Param::Entity(json!({ "id": 1 }))).await.unwrap(), 1);
    assert_eq!(stock_qty(&dao, 1).await, Value::Null);

    assert_eq!(dao.update("scratch.setQty", set(json!(7))).await.unwrap(), 1);
    assert_eq!(stock_qty(&dao, 1).await, json!(7));

    assert_eq!(dao.update("scratch.setQty", set(Value::Null)).await.unwrap(), 1);
    assert_eq!(stock_qty(&dao, 1).await, Value::Null);
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn insert_returns_the_generated_key() {
    let dao = connected().await.with_namespace("user");
    let first = dao
        .save("insert", Param::Entity(json!({ "name": "ada", "status": "odd" })))
        .await
        .unwrap();
    let second = dao
        .save("insert", Param::Entity(json!({ "name": "bob", "status": "even" })))
        .await
        .unwrap();
    assert_eq!(first, Some(json!(1)));
    assert_eq!(second, Some(json!(2)));

    let found: Option<AppUser> = dao.find_one_by_m("findById", 2).await.unwrap();
    assert_eq!(
        found,
        Some(AppUser { id: 2, name: "bob".into(), status: "even".into() })
    );
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn batch_failing_midway_rolls_back() {
    let dao = connected().await;
    assert_eq!(dao.update("scratch.seedUsers", 3).await.unwrap(), 3);
    let dao = dao.with_namespace("user");

    let renames = [
        Rename { id: 1, name: Some("x") },
        Rename { id: 2, name: None },
        Rename { id: 3, name: Some("z") },
    ];
    let err = dao.batch_update("rename", &renames).await.unwrap_err();
    assert!(matches!(err, DaoError::Db(_)), "unexpected: {:?}", err);

    let all: Vec<AppUser> = dao.find_all("pageByStatus", &SearchModel::default()).await.unwrap();
    let names: Vec<&str> = all.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["user1", "user2", "user3"]);

    let counts = dao.batch_update("rename", &[renames[0], renames[2]]).await.unwrap();
    assert_eq!(counts, vec![1, 1]);
    let renamed: Option<AppUser> = dao.find_one("findById", 3).await.unwrap();
    assert_eq!(renamed.map(|u| u.name), Some("z".to_string()));
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn windowed_page_and_count_agree() {
    let dao = connected().await;
    assert_eq!(dao.update("scratch.seedUsers", 23).await.unwrap(), 23);
    let dao = dao.with_namespace("user");

    let mut seen = Vec::new();
    for page in 1..=3 {
        let model = SearchModel::new(page, 5).with("status", "odd");
        let result: PagingResult<AppUser> = dao.find_for_page("countByStatus", "pageByStatus", &model).await.unwrap();
        assert_eq!(result.total, 12);
        assert!(result.list.len() <= 5);
        seen.extend(result.list.into_iter().map(|u| u.id));
    }
    let odd: Vec<i64> = (1..=23).filter(|i| i % 2 == 1).collect();
    assert_eq!(seen, odd);

    let past_end: PagingResult<AppUser> = dao
        .find_for_page("countByStatus", "pageByStatus", &SearchModel::new(9, 5).with("status", "odd"))
        .await
        .unwrap();
    assert!(past_end.is_empty());
    assert_eq!(past_end.total, 12);

    assert_eq!(dao.count("countByStatus", &SearchModel::default()).await.unwrap(), 23);
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn column_types_map_to_json() {
    let dao = connected().await;
    let row: Option<Row> = dao.find_one("scratch.literals", ()).await.unwrap();
    let row = row.unwrap();
    assert_eq!(row["price"], json!("2.5"));
    assert_eq!(row["flag"], json!(true));
    assert_eq!(row["missing"], Value::Null);
    assert_eq!(row["doc"], json!({ "a": 1 }));
    assert_eq!(row["day"], json!("2024-02-29"));
    assert_eq!(row["ref"], json!("f47ac10b-58cc-4372-a567-0e02b2c3d479"));

    // SUM over bigint is NUMERIC; whole values still normalize as a count
    dao.update("scratch.seedUsers", 3).await.unwrap();
    assert_eq!(dao.count("scratch.sumIds", ()).await.unwrap(), 6);
}
