//! Compiles `#name#` placeholders to positional parameters and binds payloads.

use crate::config::MappedStatement;
use crate::error::ConfigError;
use crate::param::Param;
use regex::Regex;
use serde_json::Value;

/// Placeholder names: identifiers, optionally dotted for nested fields.
const PLACEHOLDER_NAME: &str = r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$";

/// SQL rewritten to `$n` form plus the placeholder path for each position.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledSql {
    pub sql: String,
    pub placeholders: Vec<String>,
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Row window for paged list queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowWindow {
    pub skip: u64,
    pub max: u64,
}

impl RowWindow {
    pub fn new(skip: u64, max: u64) -> Self {
        RowWindow { skip, max }
    }
}

/// Rewrite `#name#` placeholders in order of appearance. Each occurrence gets
/// its own position, so a name used twice binds twice.
pub fn compile(statement_id: &str, sql: &str) -> Result<CompiledSql, ConfigError> {
    let name_re = Regex::new(PLACEHOLDER_NAME).map_err(|e| ConfigError::Validation(e.to_string()))?;
    let mut out = String::with_capacity(sql.len());
    let mut placeholders = Vec::new();
    let mut rest = sql;
    while let Some(start) = rest.find('#') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        if let Some(tail) = after.strip_prefix('#') {
            out.push('#');
            rest = tail;
            continue;
        }
        let end = after.find('#').ok_or_else(|| {
            ConfigError::Validation(format!("{}: unterminated placeholder", statement_id))
        })?;
        let name = after[..end].trim();
        if !name_re.is_match(name) {
            return Err(ConfigError::Validation(format!(
                "{}: invalid placeholder '#{}#'",
                statement_id, name
            )));
        }
        placeholders.push(name.to_string());
        out.push_str(&format!("${}", placeholders.len()));
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(CompiledSql {
        sql: out,
        placeholders,
    })
}

/// Bind a payload to a compiled statement. Paths the payload does not carry bind as NULL.
pub fn bind(statement: &MappedStatement, param: &Param) -> QueryBuf {
    let params = statement
        .placeholders
        .iter()
        .map(|path| param.lookup(path).cloned().unwrap_or(Value::Null))
        .collect();
    QueryBuf {
        sql: statement.sql.clone(),
        params,
    }
}

/// Wrap a select so only `window.max` rows starting at `window.skip` come back.
pub fn windowed(q: QueryBuf, window: RowWindow) -> QueryBuf {
    let inner = q.sql.trim_end().trim_end_matches(';');
    QueryBuf {
        sql: format!(
            "SELECT * FROM ({}) AS windowed LIMIT {} OFFSET {}",
            inner, window.max, window.skip
        ),
        params: q.params,
    }
}
