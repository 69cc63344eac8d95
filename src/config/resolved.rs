//! Resolved statement registry: sql maps validated and compiled for runtime use.

use crate::config::StatementKind;
use crate::error::DaoError;
use std::collections::HashMap;

/// A registered statement with its SQL already rewritten to positional form.
#[derive(Clone, Debug)]
pub struct MappedStatement {
    /// Qualified id, `namespace.id`.
    pub id: String,
    pub kind: StatementKind,
    pub sql: String,
    /// Placeholder path bound at each position (`$1` is index 0).
    pub placeholders: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct StatementRegistry {
    pub(crate) by_id: HashMap<String, MappedStatement>,
}

impl StatementRegistry {
    pub fn get(&self, id: &str) -> Result<&MappedStatement, DaoError> {
        self.by_id
            .get(id)
            .ok_or_else(|| DaoError::UnknownStatement(id.to_string()))
    }

    /// Look up a statement and check it may run through the given primitive.
    pub fn get_as(&self, id: &str, expected: StatementKind) -> Result<&MappedStatement, DaoError> {
        let stmt = self.get(id)?;
        if stmt.kind != expected {
            return Err(DaoError::StatementKind {
                id: id.to_string(),
                expected: expected.as_str(),
                actual: stmt.kind.as_str(),
            });
        }
        Ok(stmt)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
