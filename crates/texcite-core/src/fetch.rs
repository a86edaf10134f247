//! File retrieval seam.
//!
//! The analyzer only needs the text of a file at a given ref. Remote
//! implementations live in other crates; [`LocalFetcher`] reads a working
//! tree from disk.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors returned by a [`FileFetcher`].
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Retrieves the raw text of a file at a repository ref.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    async fn fetch(&self, git_ref: &str, path: &str) -> Result<String, FetchError>;
}

/// Reads files relative to a root directory. The ref is ignored.
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    root: PathBuf,
}

impl LocalFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || path.is_empty() {
            return Err(FetchError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileFetcher for LocalFetcher {
    async fn fetch(&self, _git_ref: &str, path: &str) -> Result<String, FetchError> {
        let full_path = self.resolve(path)?;
        debug!(path = %full_path.display(), "Reading local file");

        let bytes = match tokio::fs::read(&full_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FetchError::NotFound(path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        String::from_utf8(bytes).map_err(|e| FetchError::Decode(format!("{}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_fetch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("chapters")).unwrap();
        std::fs::write(dir.path().join("chapters/intro.tex"), "\\section{Intro}").unwrap();

        let fetcher = LocalFetcher::new(dir.path());
        let text = fetcher.fetch("main", "chapters/intro.tex").await.unwrap();
        assert_eq!(text, "\\section{Intro}");
    }

    #[tokio::test]
    async fn test_local_fetch_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = LocalFetcher::new(dir.path());
        let err = fetcher.fetch("main", "missing.tex").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(p) if p == "missing.tex"));
    }

    #[tokio::test]
    async fn test_local_fetch_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = LocalFetcher::new(dir.path());
        for path in ["../secret.tex", "/etc/passwd", ""] {
            let err = fetcher.fetch("main", path).await.unwrap_err();
            assert!(matches!(err, FetchError::InvalidPath(_)), "{}", path);
        }
    }

    #[tokio::test]
    async fn test_local_fetch_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.tex"), [0xff, 0xfe, 0x00]).unwrap();
        let fetcher = LocalFetcher::new(dir.path());
        let err = fetcher.fetch("main", "bad.tex").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
