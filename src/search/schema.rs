//! Index schema: field mappings and the analyzers they reference
//!
//! Each text field of a [`FileRecord`] is indexed twice: once analyzed with
//! the standard analyzer and once as an exact keyword (`<field>_keyword`).
//! `name` carries a third copy, `name_text`, indexed with edge n-grams but
//! searched with the standard analyzer so that prefixes match without the
//! query itself being n-grammed.

use tantivy::schema::{
    Field, FieldType, IndexRecordOption, NumericOptions, STORED, STRING, Schema,
    TextFieldIndexing, TextOptions, Value,
};
use tantivy::tokenizer::TokenizerManager;
use tantivy::TantivyDocument;

use super::analyzers::{
    KEYWORD_ANALYZER, NAME_AUTOCOMPLETE_ANALYZER, STANDARD_ANALYZER, build_analyzers,
};
use super::types::FileRecord;
use crate::utils::KEYWORD_IGNORE_ABOVE;

/// Internal document key field (the engine-level identifier)
pub const KEY_FIELD: &str = "doc_key";

pub const ID_FIELD: &str = "id";
pub const NAME_FIELD: &str = "name";
pub const OWNER_ID_FIELD: &str = "ownerID";
pub const TYPE_FIELD: &str = "type";
pub const SIZE_FIELD: &str = "size";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Schema validation and analyzer registration errors
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Analyzer '{name}' registration failed: {reason}")]
    AnalyzerRegistration { name: String, reason: String },

    #[error("Field '{field}' not found in schema")]
    FieldNotFound { field: String },

    #[error("Incompatible field type for '{field}': expected {expected}, found {found}")]
    IncompatibleFieldType {
        field: String,
        expected: String,
        found: String,
    },

    #[error("Incompatible indexing for '{field}': expected {expected}, found {found}")]
    IncompatibleIndexing {
        field: String,
        expected: String,
        found: String,
    },

    #[error("Unexpected field '{field}' in existing index")]
    UnexpectedField { field: String },
}

/// A searchable field and the analyzer applied to query text for it
#[derive(Debug, Clone, Copy)]
pub struct SearchField {
    pub field: Field,
    pub search_analyzer: &'static str,
}

/// File index schema with resolved field handles
#[derive(Debug, Clone)]
pub struct IndexSchema {
    pub schema: Schema,
    pub key: Field,
    pub id: Field,
    pub id_keyword: Field,
    pub name: Field,
    pub name_keyword: Field,
    pub name_text: Field,
    pub owner_id: Field,
    pub owner_id_keyword: Field,
    pub file_type: Field,
    pub file_type_keyword: Field,
    pub size: Field,
    pub created_at: Field,
    pub updated_at: Field,
}

fn analyzed_text(analyzer: &str, stored: bool) -> TextOptions {
    let options = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(analyzer)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    );
    if stored { options.set_stored() } else { options }
}

fn keyword_text() -> TextOptions {
    TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(KEYWORD_ANALYZER)
            .set_index_option(IndexRecordOption::Basic),
    )
}

/// Analyzer and record option of a text field, `None` for other field types
fn text_indexing(field_type: &FieldType) -> Option<String> {
    match field_type {
        FieldType::Str(options) => Some(match options.get_indexing_options() {
            Some(indexing) => format!("{}/{:?}", indexing.tokenizer(), indexing.index_option()),
            None => "unindexed".to_string(),
        }),
        _ => None,
    }
}

fn stored_long() -> NumericOptions {
    NumericOptions::default().set_stored().set_indexed()
}

impl IndexSchema {
    /// Declare the file index schema
    #[must_use]
    pub fn new() -> Self {
        let mut builder = Schema::builder();

        let key = builder.add_text_field(KEY_FIELD, STRING | STORED);

        let id = builder.add_text_field(ID_FIELD, analyzed_text(STANDARD_ANALYZER, true));
        let id_keyword = builder.add_text_field("id_keyword", keyword_text());

        let name = builder.add_text_field(NAME_FIELD, analyzed_text(STANDARD_ANALYZER, true));
        let name_keyword = builder.add_text_field("name_keyword", keyword_text());
        let name_text =
            builder.add_text_field("name_text", analyzed_text(NAME_AUTOCOMPLETE_ANALYZER, false));

        let owner_id =
            builder.add_text_field(OWNER_ID_FIELD, analyzed_text(STANDARD_ANALYZER, true));
        let owner_id_keyword = builder.add_text_field("ownerID_keyword", keyword_text());

        let file_type = builder.add_text_field(TYPE_FIELD, analyzed_text(STANDARD_ANALYZER, true));
        let file_type_keyword = builder.add_text_field("type_keyword", keyword_text());

        let size = builder.add_i64_field(SIZE_FIELD, stored_long());
        let created_at = builder.add_i64_field(CREATED_AT_FIELD, stored_long());
        let updated_at = builder.add_i64_field(UPDATED_AT_FIELD, stored_long());

        Self {
            schema: builder.build(),
            key,
            id,
            id_keyword,
            name,
            name_keyword,
            name_text,
            owner_id,
            owner_id_keyword,
            file_type,
            file_type_keyword,
            size,
            created_at,
            updated_at,
        }
    }

    /// Register every analyzer the field mappings reference
    ///
    /// Tantivy does not persist analyzers with the index, so this runs on
    /// every open, not only on creation.
    pub fn register_analyzers(&self, manager: &TokenizerManager) -> Result<(), SchemaError> {
        for (name, analyzer) in build_analyzers()? {
            manager.register(name, analyzer);
        }
        Ok(())
    }

    /// Check that an existing index was created with this schema
    pub fn ensure_compatible(&self, existing: &Schema) -> Result<(), SchemaError> {
        for (_, entry) in self.schema.fields() {
            let field = existing
                .get_field(entry.name())
                .map_err(|_| SchemaError::FieldNotFound {
                    field: entry.name().to_string(),
                })?;
            let existing_type = existing.get_field_entry(field).field_type();
            let expected = entry.field_type().value_type();
            let found = existing_type.value_type();
            if expected != found {
                return Err(SchemaError::IncompatibleFieldType {
                    field: entry.name().to_string(),
                    expected: format!("{expected:?}"),
                    found: format!("{found:?}"),
                });
            }

            // Prefix and keyword matching depend on the analyzer the terms were written with
            match (text_indexing(entry.field_type()), text_indexing(existing_type)) {
                (Some(expected), Some(found)) if expected != found => {
                    return Err(SchemaError::IncompatibleIndexing {
                        field: entry.name().to_string(),
                        expected,
                        found,
                    });
                }
                _ => {}
            }
        }

        if let Some((_, extra)) = existing
            .fields()
            .find(|(_, entry)| self.schema.get_field(entry.name()).is_err())
        {
            return Err(SchemaError::UnexpectedField {
                field: extra.name().to_string(),
            });
        }

        Ok(())
    }

    /// Fields a free-text query is matched against
    #[must_use]
    pub fn text_search_fields(&self) -> Vec<SearchField> {
        let analyzed = |field| SearchField {
            field,
            search_analyzer: STANDARD_ANALYZER,
        };
        let keyword = |field| SearchField {
            field,
            search_analyzer: KEYWORD_ANALYZER,
        };

        vec![
            analyzed(self.id),
            keyword(self.id_keyword),
            analyzed(self.name),
            keyword(self.name_keyword),
            analyzed(self.name_text),
            analyzed(self.owner_id),
            keyword(self.owner_id_keyword),
            analyzed(self.file_type),
            keyword(self.file_type_keyword),
        ]
    }

    /// Integer fields matched when the query text parses as a number
    #[must_use]
    pub fn numeric_search_fields(&self) -> [Field; 3] {
        [self.size, self.created_at, self.updated_at]
    }

    /// Build the engine document for `record` stored under `key`
    #[must_use]
    pub fn to_document(&self, key: &str, record: &FileRecord) -> TantivyDocument {
        let mut doc = TantivyDocument::default();
        doc.add_text(self.key, key);

        let text_fields = [
            (self.id, self.id_keyword, &record.id),
            (self.name, self.name_keyword, &record.name),
            (self.owner_id, self.owner_id_keyword, &record.owner_id),
            (self.file_type, self.file_type_keyword, &record.file_type),
        ];
        for (analyzed, keyword, value) in text_fields {
            doc.add_text(analyzed, value);
            if value.chars().count() <= KEYWORD_IGNORE_ABOVE {
                doc.add_text(keyword, value);
            }
        }
        doc.add_text(self.name_text, &record.name);

        doc.add_i64(self.size, record.size);
        doc.add_i64(self.created_at, record.created_at);
        doc.add_i64(self.updated_at, record.updated_at);
        doc
    }

    /// Document key of a stored document
    #[must_use]
    pub fn key_of(&self, doc: &TantivyDocument) -> Option<String> {
        doc.get_first(self.key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }

    /// Rebuild the record from a stored document's fields
    #[must_use]
    pub fn to_record(&self, doc: &TantivyDocument) -> FileRecord {
        let text = |field| {
            doc.get_first(field)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let long = |field| doc.get_first(field).and_then(|v| v.as_i64()).unwrap_or_default();

        FileRecord {
            id: text(self.id),
            name: text(self.name),
            owner_id: text(self.owner_id),
            size: long(self.size),
            file_type: text(self.file_type),
            created_at: long(self.created_at),
            updated_at: long(self.updated_at),
        }
    }

    /// Names of every declared field, for diagnostics
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.schema
            .fields()
            .map(|(_, entry)| entry.name())
            .collect()
    }
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tantivy::schema::TEXT;

    #[test]
    fn test_declares_every_record_field() {
        let schema = IndexSchema::new();
        let names = schema.field_names();
        for expected in [
            KEY_FIELD,
            ID_FIELD,
            "id_keyword",
            NAME_FIELD,
            "name_keyword",
            "name_text",
            OWNER_ID_FIELD,
            "ownerID_keyword",
            TYPE_FIELD,
            "type_keyword",
            SIZE_FIELD,
            CREATED_AT_FIELD,
            UPDATED_AT_FIELD,
        ] {
            assert!(names.contains(&expected), "missing field {expected}");
        }
    }

    #[test]
    fn test_name_text_is_indexed_with_autocomplete_analyzer() {
        let schema = IndexSchema::new();
        let entry = schema.schema.get_field_entry(schema.name_text);
        let FieldType::Str(options) = entry.field_type() else {
            panic!("name_text must be a text field");
        };
        let indexing = options.get_indexing_options().expect("name_text is indexed");
        assert_eq!(indexing.tokenizer(), NAME_AUTOCOMPLETE_ANALYZER);

        let search = schema
            .text_search_fields()
            .into_iter()
            .find(|f| f.field == schema.name_text)
            .expect("name_text is searchable");
        assert_eq!(search.search_analyzer, STANDARD_ANALYZER);
    }

    #[test]
    fn test_keyword_copy_is_skipped_above_limit() {
        let schema = IndexSchema::new();
        let record = FileRecord {
            id: "f1".into(),
            name: "n".repeat(KEYWORD_IGNORE_ABOVE + 1),
            ..FileRecord::default()
        };
        let doc = schema.to_document("f1", &record);

        assert!(doc.get_first(schema.name_keyword).is_none());
        assert!(doc.get_first(schema.id_keyword).is_some());
        assert!(doc.get_first(schema.name).is_some());
    }

    #[test]
    fn test_stored_fields_rebuild_the_record() {
        let schema = IndexSchema::new();
        let record = FileRecord {
            id: "f1".into(),
            name: "Invoice Q1".into(),
            owner_id: "u1".into(),
            size: 2048,
            file_type: "pdf".into(),
            created_at: 1_700_000_000,
            updated_at: 1_700_000_100,
        };
        let doc = schema.to_document("f1", &record);

        assert_eq!(schema.key_of(&doc).as_deref(), Some("f1"));
        assert_eq!(schema.to_record(&doc), record);
    }

    #[test]
    fn test_compatible_with_itself() {
        let schema = IndexSchema::new();
        schema
            .ensure_compatible(&IndexSchema::new().schema)
            .expect("identical schemas are compatible");
    }

    #[test]
    fn test_rejects_schema_missing_fields() {
        let mut builder = Schema::builder();
        builder.add_text_field(KEY_FIELD, STRING | STORED);
        let other = builder.build();

        let err = IndexSchema::new()
            .ensure_compatible(&other)
            .expect_err("missing fields are incompatible");
        assert!(matches!(err, SchemaError::FieldNotFound { .. }));
    }

    #[test]
    fn test_rejects_text_field_with_other_analyzer() {
        let ours = IndexSchema::new();
        let mut builder = Schema::builder();
        for (_, entry) in ours.schema.fields() {
            if entry.name() == "name_text" {
                builder.add_text_field("name_text", TEXT);
            } else {
                builder.add_field(entry.clone());
            }
        }
        let other = builder.build();

        let err = ours
            .ensure_compatible(&other)
            .expect_err("analyzer drift is incompatible");
        match err {
            SchemaError::IncompatibleIndexing { field, expected, found } => {
                assert_eq!(field, "name_text");
                assert!(expected.starts_with(NAME_AUTOCOMPLETE_ANALYZER));
                assert!(found.starts_with("default"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
