//! Free-text queries over the file index
//!
//! A [`MultiMatchQuery`] is the store-level form of a search request. It is
//! translated into an engine query by [`build_query`], which analyzes the term
//! separately for every searchable field.

mod builder;

pub use builder::build_query;

use serde::{Deserialize, Serialize};

/// Match a single free-text term against every indexed text field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiMatchQuery {
    pub term: String,
}

impl MultiMatchQuery {
    #[must_use]
    pub fn new(term: impl Into<String>) -> Self {
        Self { term: term.into() }
    }

    /// Term parsed as an integer, for matching the numeric fields
    #[must_use]
    pub fn numeric_term(&self) -> Option<i64> {
        self.term.trim().parse().ok()
    }
}
