//! Common types used across the search module
//!
//! `FileRecord` is both the wire shape of a file-metadata record and the
//! document shape stored in the index.

use serde::{Deserialize, Serialize};

/// File metadata record indexed by the service
///
/// Every field is optional on input; missing strings decode as empty and
/// missing numbers as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "ownerID")]
    pub owner_id: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub file_type: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

impl FileRecord {
    /// Record with only an identifier set
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Apply a partial update on top of this record
    ///
    /// Non-empty strings and non-zero integers in `patch` overwrite the
    /// current values; empty and zero values leave them untouched.
    #[must_use]
    pub fn merged_with(mut self, patch: &FileRecord) -> FileRecord {
        fn take_str(target: &mut String, value: &str) {
            if !value.is_empty() {
                value.clone_into(target);
            }
        }
        fn take_num(target: &mut i64, value: i64) {
            if value != 0 {
                *target = value;
            }
        }

        take_str(&mut self.id, &patch.id);
        take_str(&mut self.name, &patch.name);
        take_str(&mut self.owner_id, &patch.owner_id);
        take_str(&mut self.file_type, &patch.file_type);
        take_num(&mut self.size, patch.size);
        take_num(&mut self.created_at, patch.created_at);
        take_num(&mut self.updated_at, patch.updated_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_wire_field_names() {
        let record: FileRecord = serde_json::from_str(
            r#"{"id":"f1","name":"Invoice Q1","ownerID":"u7","size":42,"type":"application/pdf","createdAt":10,"updatedAt":11}"#,
        )
        .expect("valid record");

        assert_eq!(record.owner_id, "u7");
        assert_eq!(record.file_type, "application/pdf");
        assert_eq!(record.created_at, 10);
        assert_eq!(record.updated_at, 11);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let record: FileRecord = serde_json::from_str(r#"{"name":"notes.txt"}"#).expect("valid record");
        assert_eq!(record.id, "");
        assert_eq!(record.size, 0);
        assert_eq!(record.name, "notes.txt");
    }

    #[test]
    fn test_merge_only_overwrites_set_fields() {
        let stored = FileRecord {
            id: "f1".into(),
            name: "Invoice Q1".into(),
            owner_id: "u7".into(),
            size: 100,
            file_type: "pdf".into(),
            created_at: 1,
            updated_at: 1,
        };
        let patch = FileRecord {
            id: "f1".into(),
            name: "Invoice Q1 Final".into(),
            updated_at: 2,
            ..FileRecord::default()
        };

        let merged = stored.merged_with(&patch);
        assert_eq!(merged.name, "Invoice Q1 Final");
        assert_eq!(merged.updated_at, 2);
        assert_eq!(merged.owner_id, "u7");
        assert_eq!(merged.size, 100);
        assert_eq!(merged.created_at, 1);
    }
}
