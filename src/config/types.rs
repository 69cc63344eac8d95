//! Raw sql-map file types (one JSON file per namespace).

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a mapped statement does; decides which executor primitive may run it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatementConfig {
    pub id: String,
    pub kind: StatementKind,
    /// SQL with `#name#` placeholders; `##` is a literal `#`.
    pub sql: String,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SqlMapConfig {
    pub namespace: String,
    #[serde(default)]
    pub statements: Vec<StatementConfig>,
}
