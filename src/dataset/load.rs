use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::dataset::model::Dataset;
use crate::foundation::error::{DramaError, DramaResult};

/// Where the corpus document comes from.
///
/// Implementations only acquire bytes; parsing and error classification happen in
/// [`load_dataset`]. A failed acquisition must be reported as [`DramaError::Load`].
pub trait DatasetSource {
    /// Fetch the raw document.
    fn fetch(&self) -> DramaResult<Vec<u8>>;

    /// Short description used in logs and error messages.
    fn describe(&self) -> String;
}

/// Document stored on the local filesystem.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for FileSource {
    fn fetch(&self) -> DramaResult<Vec<u8>> {
        let f = File::open(&self.path).map_err(|e| {
            DramaError::load(format!("open dataset '{}': {e}", self.path.display()))
        })?;
        let mut buf = Vec::new();
        BufReader::new(f).read_to_end(&mut buf).map_err(|e| {
            DramaError::load(format!("read dataset '{}': {e}", self.path.display()))
        })?;
        Ok(buf)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Document already held in memory (embedded fixtures, bytes fetched by a host).
#[derive(Clone, Debug)]
pub struct BytesSource {
    label: String,
    bytes: Vec<u8>,
}

impl BytesSource {
    /// Wrap `bytes` under a descriptive `label`.
    pub fn new(label: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            bytes: bytes.into(),
        }
    }
}

impl DatasetSource for BytesSource {
    fn fetch(&self) -> DramaResult<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Fetch and parse the corpus document.
#[tracing::instrument(skip(source), fields(source = %source.describe()))]
pub fn load_dataset(source: &dyn DatasetSource) -> DramaResult<Dataset> {
    let bytes = source.fetch()?;
    let dataset = Dataset::from_slice(&bytes)
        .map_err(|e| DramaError::parse(format!("{}: {e}", source.describe())))?;
    tracing::debug!(
        plays = dataset.plays.len(),
        female_entries = dataset.female_characters.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

impl Dataset {
    /// Parse a document from a JSON reader.
    pub fn from_reader<R: Read>(r: R) -> DramaResult<Self> {
        serde_json::from_reader(r).map_err(|e| DramaError::parse(format!("parse dataset JSON: {e}")))
    }

    /// Parse a document from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> DramaResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| DramaError::parse(format!("parse dataset JSON: {e}")))
    }

    /// Parse a document from a JSON string.
    pub fn from_json_str(s: &str) -> DramaResult<Self> {
        Self::from_slice(s.as_bytes())
    }

    /// Read and parse a document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> DramaResult<Self> {
        load_dataset(&FileSource::new(path.as_ref()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/load.rs"]
mod tests;
