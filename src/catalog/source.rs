use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The two static documents backing the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFile {
    Universities,
    Scholarships,
}

impl DataFile {
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Universities => "universities.json",
            Self::Scholarships => "scholarships.json",
        }
    }
}

impl fmt::Display for DataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Failure to fetch the raw bytes of a data file.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not available from this source")]
    Missing(DataFile),
}

/// Where catalog documents come from. Fetches are independent and may run concurrently.
pub trait CatalogSource: Send + Sync {
    fn fetch(
        &self,
        file: DataFile,
    ) -> impl std::future::Future<Output = Result<String, SourceError>> + Send;
}

/// Reads both documents from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CatalogSource for DirectorySource {
    async fn fetch(&self, file: DataFile) -> Result<String, SourceError> {
        let path = self.root.join(file.file_name());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| SourceError::Io { path, source })
    }
}

/// Serves documents held in memory; useful for embedding fixtures.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: HashMap<DataFile, String>,
}

impl StaticSource {
    pub fn new(universities: impl Into<String>, scholarships: impl Into<String>) -> Self {
        let mut documents = HashMap::new();
        documents.insert(DataFile::Universities, universities.into());
        documents.insert(DataFile::Scholarships, scholarships.into());
        Self { documents }
    }

    pub fn with_document(mut self, file: DataFile, body: impl Into<String>) -> Self {
        self.documents.insert(file, body.into());
        self
    }
}

impl CatalogSource for StaticSource {
    async fn fetch(&self, file: DataFile) -> Result<String, SourceError> {
        self.documents
            .get(&file)
            .cloned()
            .ok_or(SourceError::Missing(file))
    }
}
