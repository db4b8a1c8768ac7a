// Local filesystem adapter - File system operations through tokio::fs

use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::ports::*;

/// Local filesystem adapter
#[derive(Debug, Clone, Default)]
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn file_exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }

    async fn check_readable_file(&self, path: &Path) -> io::Result<()> {
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        // Opening proves read permission
        tokio::fs::File::open(path).await?;
        Ok(())
    }

    async fn create_directory(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }
}
