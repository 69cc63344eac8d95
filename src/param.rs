//! Statement parameter payloads.

use crate::search::SearchModel;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Named parameters handed to a mapped statement.
pub type ParamBag = HashMap<String, Value>;

/// Payload for a single statement execution.
///
/// Callers normally pass anything that converts into a `Param`: `()` for no
/// parameters, a [`ParamBag`], a [`SearchModel`] reference, an integer or
/// string scalar, or an entity wrapped with [`Param::entity`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Param {
    #[default]
    None,
    Map(ParamBag),
    Scalar(Value),
    /// Serialized entity, passed through without inspection.
    Entity(Value),
}

impl Param {
    /// Wrap an entity. Serialization failures surface as mapping errors.
    pub fn entity<T: Serialize>(entity: &T) -> Result<Self, serde_json::Error> {
        Ok(Param::Entity(serde_json::to_value(entity)?))
    }

    /// Resolve a placeholder path (`name` or `a.b`) against this payload.
    /// Missing keys resolve to `None`; the caller binds them as SQL NULL.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        match self {
            Param::None => None,
            Param::Scalar(v) => Some(v),
            Param::Map(bag) => {
                let mut parts = path.split('.');
                let first = bag.get(parts.next()?)?;
                walk(first, parts)
            }
            Param::Entity(v) => walk(v, path.split('.')),
        }
    }
}

fn walk<'a, 'p>(mut current: &'a Value, parts: impl Iterator<Item = &'p str>) -> Option<&'a Value> {
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

impl From<()> for Param {
    fn from(_: ()) -> Self {
        Param::None
    }
}

impl From<ParamBag> for Param {
    fn from(bag: ParamBag) -> Self {
        Param::Map(bag)
    }
}

impl From<&SearchModel> for Param {
    fn from(model: &SearchModel) -> Self {
        Param::Map(model.condition_map())
    }
}

impl From<i32> for Param {
    fn from(v: i32) -> Self {
        Param::Scalar(Value::from(v))
    }
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::Scalar(Value::from(v))
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Scalar(Value::String(v.to_string()))
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Scalar(Value::String(v))
    }
}

impl From<uuid::Uuid> for Param {
    fn from(v: uuid::Uuid) -> Self {
        Param::Scalar(Value::String(v.to_string()))
    }
}
