//! sqlmap-dao: namespaced statement routing over read/write PostgreSQL executors.

pub mod config;
pub mod dao;
pub mod error;
pub mod executor;
pub mod paging;
pub mod param;
pub mod pg;
pub mod search;
pub mod sql;

#[cfg(test)]
mod testing;

pub use config::{load_sql_map, load_sql_map_dir, parse_sql_map, resolve, DataSourceConfig, StatementRegistry};
pub use dao::{BaseDao, ParamRouter, PassThrough};
pub use error::{ConfigError, DaoError};
pub use executor::{Batch, Channel, Row, SqlMapExecutor, SqlMapTemplates};
pub use paging::PagingResult;
pub use param::{Param, ParamBag};
pub use pg::{connect, PgSqlMapExecutor};
pub use search::{SearchCondition, SearchModel};
