//! Filesystem-backed source

use std::path::{Path, PathBuf};

use crate::{DataSource, LoadError, LoadResult};

/// Reads a CSV file without blocking the runtime
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl DataSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_text(&self) -> LoadResult<String> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|error| LoadError::Unreadable {
                source_name: self.name.clone(),
                error,
            })?;
        tracing::debug!(path = %self.name, bytes = text.len(), "Read source file");
        Ok(text)
    }
}
