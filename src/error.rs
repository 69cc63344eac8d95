//! Typed errors for sql-map loading and statement execution.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("sql map load: {0}")]
    Load(String),
    #[error("sql map parse: {0}")]
    Parse(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("duplicate statement: {0}")]
    DuplicateStatement(String),
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),
}

/// Errors surfaced by executors and the DAO facade. The facade never re-wraps
/// an executor error; what the executor returns is what the caller sees.
#[derive(Error, Debug)]
pub enum DaoError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("unknown statement: {0}")]
    UnknownStatement(String),
    #[error("statement {id} is a {actual} statement, cannot run as {expected}")]
    StatementKind {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("count statement {statement} returned {found}, expected a 32 or 64 bit integer")]
    CountType { statement: String, found: String },
    #[error("row mapping: {0}")]
    Mapping(#[from] serde_json::Error),
}
