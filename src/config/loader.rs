//! Load sql maps from JSON text, files, or a directory, and resolve them into a registry.

use crate::config::resolved::{MappedStatement, StatementRegistry};
use crate::config::{qualified_id, validate, SqlMapConfig};
use crate::error::ConfigError;
use crate::sql::compile;
use std::collections::HashMap;
use std::path::Path;

/// Build the statement registry (call with every sql map the application uses).
pub fn resolve(maps: &[SqlMapConfig]) -> Result<StatementRegistry, ConfigError> {
    validate(maps)?;
    let mut by_id = HashMap::new();
    for map in maps {
        for stmt in &map.statements {
            let id = qualified_id(&map.namespace, &stmt.id);
            let compiled = compile(&id, &stmt.sql)?;
            by_id.insert(
                id.clone(),
                MappedStatement {
                    id,
                    kind: stmt.kind,
                    sql: compiled.sql,
                    placeholders: compiled.placeholders,
                },
            );
        }
    }
    Ok(StatementRegistry { by_id })
}

pub fn parse_sql_map(json: &str) -> Result<SqlMapConfig, ConfigError> {
    serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
}

pub fn load_sql_map(path: impl AsRef<Path>) -> Result<SqlMapConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    parse_sql_map(&text).map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))
}

/// Load every `*.json` file in `dir`, ordered by file name.
pub fn load_sql_map_dir(dir: impl AsRef<Path>) -> Result<Vec<SqlMapConfig>, ConfigError> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir)
        .map_err(|e| ConfigError::Load(format!("{}: {}", dir.display(), e)))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::Load(e.to_string()))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    let mut maps = Vec::with_capacity(paths.len());
    for path in paths {
        let map = load_sql_map(&path)?;
        tracing::info!(
            file = %path.display(),
            namespace = %map.namespace,
            statements = map.statements.len(),
            "loaded sql map"
        );
        maps.push(map);
    }
    Ok(maps)
}
