//! Paged query results.

use serde::Serialize;

/// Total row count paired with one page of rows. The total comes from a
/// separate count statement; it is not a snapshot of the same read.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PagingResult<T> {
    pub total: i64,
    pub list: Vec<T>,
}

impl<T> PagingResult<T> {
    pub fn new(total: i64, list: Vec<T>) -> Self {
        PagingResult { total, list }
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
