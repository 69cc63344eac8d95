//! Sql-map validation: required fields, unique qualified ids, well-formed placeholders.

use crate::config::SqlMapConfig;
use crate::error::ConfigError;
use crate::sql::compile;
use std::collections::HashSet;

/// Qualified statement id as the registry and the DAO facade spell it.
pub fn qualified_id(namespace: &str, id: &str) -> String {
    format!("{}.{}", namespace.trim(), id.trim())
}

pub fn validate(maps: &[SqlMapConfig]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for map in maps {
        if map.namespace.trim().is_empty() {
            return Err(ConfigError::Validation("sql map namespace must not be empty".into()));
        }
        for stmt in &map.statements {
            if stmt.id.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "statement in namespace '{}' has an empty id",
                    map.namespace
                )));
            }
            let qid = qualified_id(&map.namespace, &stmt.id);
            if stmt.sql.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{}: sql must not be empty", qid)));
            }
            compile(&qid, &stmt.sql)?;
            if !seen.insert(qid.clone()) {
                return Err(ConfigError::DuplicateStatement(qid));
            }
        }
    }
    Ok(())
}
