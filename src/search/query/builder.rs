//! Translation of [`MultiMatchQuery`] into a Tantivy boolean query
//!
//! Query text is tokenized through each field's search analyzer, so stemmed
//! and normalized terms line up with what the indexing analyzers produced.

use std::collections::HashSet;

use tantivy::Term;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::IndexRecordOption;
use tantivy::tokenizer::TokenizerManager;

use super::MultiMatchQuery;
use crate::search::analyzers::analyze;
use crate::search::errors::{StoreError, StoreResult};
use crate::search::schema::IndexSchema;

/// Build the engine query for `query`
///
/// Returns `Ok(None)` when the term yields no tokens for any field (blank or
/// stop-word-only input), which callers treat as an empty result.
pub fn build_query(
    schema: &IndexSchema,
    tokenizers: &TokenizerManager,
    query: &MultiMatchQuery,
) -> StoreResult<Option<Box<dyn Query>>> {
    let mut seen: HashSet<Term> = HashSet::new();
    let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

    for search_field in schema.text_search_fields() {
        let mut analyzer = tokenizers
            .get(search_field.search_analyzer)
            .ok_or_else(|| StoreError::MissingAnalyzer(search_field.search_analyzer.to_string()))?;

        for token in analyze(&mut analyzer, &query.term) {
            let term = Term::from_field_text(search_field.field, &token);
            if seen.insert(term.clone()) {
                clauses.push((
                    Occur::Should,
                    Box::new(TermQuery::new(term, IndexRecordOption::Basic)),
                ));
            }
        }
    }

    if let Some(value) = query.numeric_term() {
        for field in schema.numeric_search_fields() {
            let term = Term::from_field_i64(field, value);
            clauses.push((
                Occur::Should,
                Box::new(TermQuery::new(term, IndexRecordOption::Basic)),
            ));
        }
    }

    if clauses.is_empty() {
        tracing::debug!(term = %query.term, "Query produced no terms after analysis");
        return Ok(None);
    }

    Ok(Some(Box::new(BooleanQuery::new(clauses))))
}
