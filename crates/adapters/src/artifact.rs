//! Local digest artifact written next to each run

use async_trait::async_trait;
use defence_digest_domain::{ArtifactError, DigestSink, RenderedDigest};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Overwrites a single HTML file with the latest digest
#[derive(Debug, Clone)]
pub struct FileDigestSink {
    path: PathBuf,
}

impl FileDigestSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DigestSink for FileDigestSink {
    async fn write(&self, digest: &RenderedDigest) -> Result<(), ArtifactError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        fs::write(&self.path, digest.html.as_bytes()).await?;

        tracing::info!(path = %self.path.display(), "Digest saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn digest(html: &str) -> RenderedDigest {
        RenderedDigest {
            subject: "Defence Intelligence Digest - 19 October 2026".to_string(),
            html: html.to_string(),
            item_count: 0,
            source_count: 0,
        }
    }

    #[tokio::test]
    async fn test_write_replaces_previous_digest() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("out").join("latest_digest.html");
        let sink = FileDigestSink::new(&path);

        sink.write(&digest("<p>first</p>")).await.expect("first write");
        sink.write(&digest("<p>second</p>")).await.expect("second write");

        let contents = tokio::fs::read_to_string(&path).await.expect("read digest");
        assert_eq!(contents, "<p>second</p>");
    }

    #[tokio::test]
    async fn test_write_into_missing_location_fails() {
        let dir = TempDir::new().expect("temp dir");
        // A regular file cannot act as a parent directory
        let blocker = dir.path().join("blocker");
        tokio::fs::write(&blocker, b"x").await.expect("blocker");
        let sink = FileDigestSink::new(blocker.join("latest_digest.html"));

        let result = sink.write(&digest("<p>x</p>")).await;
        assert!(matches!(result, Err(ArtifactError::Io(_))));
    }
}
