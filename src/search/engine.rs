//! Tantivy-backed document store
//!
//! `TantivyStore` owns the on-disk index for one index name, its single
//! writer and a manually reloaded reader. Every mutation commits before it
//! returns and reloads the reader under the writer lock, so a search issued
//! after a write completes always observes it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Weak};
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::TermQuery;
use tantivy::schema::IndexRecordOption;
use tantivy::{Index, IndexReader, IndexSettings, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use uuid::Uuid;

use super::errors::{InitError, StoreError, StoreResult};
use super::query::{MultiMatchQuery, build_query};
use super::schema::IndexSchema;
use super::store::Store;
use super::types::FileRecord;
use crate::utils::{DEFAULT_MAX_RESULTS, DEFAULT_WRITER_MEMORY_BYTES, MAX_DOCUMENT_KEY_BYTES};

/// Where and how the store opens its index
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Directory holding one sub-directory per index name
    pub data_dir: PathBuf,
    /// Memory budget handed to the index writer
    pub writer_memory_bytes: usize,
    /// Maximum keys returned by a search
    pub max_results: usize,
}

impl StoreOptions {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            writer_memory_bytes: DEFAULT_WRITER_MEMORY_BYTES,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Embedded document store over a single Tantivy index
#[derive(Clone)]
pub struct TantivyStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    index: Index,
    schema: IndexSchema,
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
    data_dir: PathBuf,
    index_path: PathBuf,
    index_name: String,
    max_results: usize,
}

/// Stores open in this process, keyed by canonical index path
///
/// Tantivy allows one writer per index directory, so a second
/// `initialize` for a live index shares the existing store.
static OPEN_STORES: LazyLock<Mutex<HashMap<PathBuf, Weak<StoreInner>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Index names become directory names, so only a conservative alphabet is accepted
fn validate_index_name(name: &str) -> Result<(), InitError> {
    let valid = !name.is_empty()
        && name.len() <= 255
        && !name.starts_with(['-', '_', '+', '.'])
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(InitError::InvalidIndexName(name.to_string()))
    }
}

fn index_exists(path: &Path) -> StoreResult<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    let directory = MmapDirectory::open(path)?;
    Ok(Index::exists(&directory)?)
}

impl TantivyStore {
    /// Open the index named `index_name`, creating it with the file schema if absent
    ///
    /// Creation is skipped when the index already exists, so repeated
    /// initialization against the same directory is idempotent. While a store
    /// for the index is alive in this process, later calls return a handle to
    /// it. An existing index built with different mappings is rejected, never
    /// rebuilt.
    pub fn initialize(options: StoreOptions, index_name: &str) -> Result<Self, InitError> {
        validate_index_name(index_name)?;

        let index_path = options.data_dir.join(index_name);
        std::fs::create_dir_all(&index_path).map_err(|source| InitError::Directory {
            path: index_path.clone(),
            source,
        })?;
        let registry_key =
            std::fs::canonicalize(&index_path).map_err(|source| InitError::Directory {
                path: index_path.clone(),
                source,
            })?;

        let mut open_stores = OPEN_STORES.lock();
        open_stores.retain(|_, store| store.strong_count() > 0);
        if let Some(inner) = open_stores.get(&registry_key).and_then(Weak::upgrade) {
            tracing::info!(index = %index_name, path = ?index_path, "Reusing open index");
            return Ok(Self { inner });
        }

        let inner = Arc::new(StoreInner::open(options, index_name, index_path)?);
        open_stores.insert(registry_key, Arc::downgrade(&inner));
        Ok(Self { inner })
    }

    #[must_use]
    pub fn index_path(&self) -> &Path {
        &self.inner.index_path
    }

    /// Number of live documents visible to searches
    #[must_use]
    pub fn num_docs(&self) -> u64 {
        self.inner.reader.searcher().num_docs()
    }

    async fn run_blocking<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&StoreInner) -> StoreResult<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(&inner)).await?
    }
}

impl StoreInner {
    fn open(
        options: StoreOptions,
        index_name: &str,
        index_path: PathBuf,
    ) -> Result<Self, InitError> {
        let schema = IndexSchema::new();
        let directory =
            MmapDirectory::open(&index_path).map_err(|e| InitError::ExistenceCheck {
                path: index_path.clone(),
                message: e.to_string(),
            })?;
        let exists = Index::exists(&directory).map_err(|e| InitError::ExistenceCheck {
            path: index_path.clone(),
            message: e.to_string(),
        })?;

        let index = if exists {
            let index = Index::open(directory).map_err(|source| InitError::Open {
                path: index_path.clone(),
                source,
            })?;
            schema
                .ensure_compatible(&index.schema())
                .map_err(|source| InitError::SchemaMismatch {
                    path: index_path.clone(),
                    source,
                })?;
            tracing::info!(index = %index_name, path = ?index_path, "Using existing index");
            index
        } else {
            let index = Index::create(directory, schema.schema.clone(), IndexSettings::default())
                .map_err(|source| InitError::Creation {
                    path: index_path.clone(),
                    source,
                })?;
            tracing::info!(
                index = %index_name,
                path = ?index_path,
                fields = schema.schema.num_fields(),
                "Created index"
            );
            index
        };

        // Analyzers are not persisted with the index
        schema.register_analyzers(index.tokenizers())?;

        let writer: IndexWriter = index
            .writer_with_num_threads(1, options.writer_memory_bytes)
            .map_err(InitError::Writer)?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(InitError::Reader)?;

        Ok(Self {
            index,
            schema,
            reader,
            writer: Mutex::new(writer),
            data_dir: options.data_dir,
            index_path,
            index_name: index_name.to_string(),
            max_results: options.max_results.max(1),
        })
    }

    fn key_term(&self, key: &str) -> Term {
        Term::from_field_text(self.schema.key, key)
    }

    fn find(&self, key: &str) -> StoreResult<Option<TantivyDocument>> {
        let searcher = self.reader.searcher();
        let query = TermQuery::new(self.key_term(key), IndexRecordOption::Basic);
        let hits = searcher.search(&query, &TopDocs::with_limit(1))?;

        match hits.first() {
            Some((_, address)) => Ok(Some(searcher.doc::<TantivyDocument>(*address)?)),
            None => Ok(None),
        }
    }

    /// Run `op` against the writer and commit, rolling back on any failure
    fn write<T>(&self, op: impl FnOnce(&mut IndexWriter) -> StoreResult<T>) -> StoreResult<T> {
        let start = Instant::now();
        let mut writer = self.writer.lock();

        let result = op(&mut writer).and_then(|value| {
            writer.commit()?;
            Ok(value)
        });

        match result {
            Ok(value) => {
                self.reader.reload()?;
                tracing::debug!(
                    index = %self.index_name,
                    duration_ms = start.elapsed().as_millis(),
                    "Index commit completed"
                );
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = writer.rollback() {
                    tracing::error!(
                        index = %self.index_name,
                        error = %rollback,
                        "Rollback after failed write also failed"
                    );
                }
                Err(e)
            }
        }
    }

    fn create(&self, record: FileRecord) -> StoreResult<String> {
        let key = if record.id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            record.id.clone()
        };
        if key.len() > MAX_DOCUMENT_KEY_BYTES {
            return Err(StoreError::InvalidDocument {
                key: key.chars().take(32).collect(),
                message: format!("id is longer than {MAX_DOCUMENT_KEY_BYTES} bytes"),
            });
        }

        let doc = self.schema.to_document(&key, &record);
        let term = self.key_term(&key);
        self.write(|writer| {
            writer.delete_term(term);
            writer.add_document(doc)?;
            Ok(())
        })?;

        tracing::info!(index = %self.index_name, key = %key, "Indexed file record");
        Ok(key)
    }

    fn get_all(&self, query: &MultiMatchQuery) -> StoreResult<Vec<String>> {
        let Some(engine_query) = build_query(&self.schema, self.index.tokenizers(), query)? else {
            return Ok(Vec::new());
        };

        let searcher = self.reader.searcher();
        let hits = searcher.search(&*engine_query, &TopDocs::with_limit(self.max_results))?;

        let mut keys = Vec::with_capacity(hits.len());
        for (_score, address) in hits {
            let doc = searcher.doc::<TantivyDocument>(address)?;
            if let Some(key) = self.schema.key_of(&doc) {
                keys.push(key);
            }
        }

        tracing::debug!(
            index = %self.index_name,
            term = %query.term,
            hits = keys.len(),
            "Search completed"
        );
        Ok(keys)
    }

    fn update(&self, patch: FileRecord) -> StoreResult<String> {
        let key = patch.id.clone();
        let term = self.key_term(&key);

        // Lookup and replace happen under the writer lock so concurrent
        // updates to the same key cannot drop each other's fields
        self.write(|writer| {
            let current = self
                .find(&key)?
                .ok_or_else(|| StoreError::NotFound(key.clone()))?;
            let merged = self.schema.to_record(&current).merged_with(&patch);

            writer.delete_term(term);
            writer.add_document(self.schema.to_document(&key, &merged))?;
            Ok(())
        })?;

        tracing::info!(index = %self.index_name, key = %key, "Updated file record");
        Ok(key)
    }

    fn delete(&self, key: String) -> StoreResult<String> {
        let term = self.key_term(&key);
        self.write(|writer| {
            if self.find(&key)?.is_none() {
                return Err(StoreError::NotFound(key.clone()));
            }
            writer.delete_term(term);
            Ok(())
        })?;

        tracing::info!(index = %self.index_name, key = %key, "Deleted file record");
        Ok(key)
    }

    fn health_check(&self) -> StoreResult<bool> {
        // Engine probe: the data directory must still be reachable
        let metadata = std::fs::metadata(&self.data_dir)?;
        if !metadata.is_dir() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                format!("{} is not a directory", self.data_dir.display()),
            )));
        }

        let exists = index_exists(&self.index_path)?;
        if !exists {
            tracing::warn!(index = %self.index_name, path = ?self.index_path, "Index is missing");
        }
        Ok(exists)
    }
}

#[async_trait]
impl Store for TantivyStore {
    async fn create(&self, record: FileRecord) -> StoreResult<String> {
        self.run_blocking(move |inner| inner.create(record)).await
    }

    async fn get_all(&self, query: MultiMatchQuery) -> StoreResult<Vec<String>> {
        self.run_blocking(move |inner| inner.get_all(&query)).await
    }

    async fn update(&self, record: FileRecord) -> StoreResult<String> {
        self.run_blocking(move |inner| inner.update(record)).await
    }

    async fn delete(&self, id: String) -> StoreResult<String> {
        self.run_blocking(move |inner| inner.delete(id)).await
    }

    async fn health_check(&self) -> StoreResult<bool> {
        self.run_blocking(|inner| inner.health_check()).await
    }
}
