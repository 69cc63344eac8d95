//! Search model: ordered name/value conditions plus a page request.

use crate::param::ParamBag;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchCondition {
    pub name: String,
    pub value: Value,
}

impl SearchCondition {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        SearchCondition {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Caller-supplied filters and paging bounds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchModel {
    #[serde(default)]
    pub conditions: Vec<SearchCondition>,
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for SearchModel {
    fn default() -> Self {
        SearchModel {
            conditions: Vec::new(),
            page: default_page(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchModel {
    pub fn new(page: u32, page_size: u32) -> Self {
        SearchModel {
            conditions: Vec::new(),
            page: page.max(1),
            page_size,
        }
    }

    /// Append a condition; builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_condition(SearchCondition::new(name, value));
        self
    }

    pub fn add_condition(&mut self, condition: SearchCondition) {
        self.conditions.push(condition);
    }

    /// Offset of the first row of the current page.
    pub fn first_row_index(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Flatten the condition list into a parameter bag. A name that appears
    /// more than once keeps the value of its last occurrence.
    pub fn condition_map(&self) -> ParamBag {
        let mut map = ParamBag::with_capacity(self.conditions.len());
        for c in &self.conditions {
            map.insert(c.name.clone(), c.value.clone());
        }
        map
    }
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
