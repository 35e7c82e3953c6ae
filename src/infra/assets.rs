//! Remote media assets (avatars, featured images).
//!
//! Uploads happen client-side against the media host; the API only stores
//! the resulting URLs and releases the remote asset when its owner replaces
//! or deletes it.

use async_trait::async_trait;

use crate::config::ASSET_UPLOAD_SEGMENT;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Releases stored assets by public id.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn remove(&self, public_id: &str) -> AppResult<()>;
}

/// Asset store used when no media host is configured: removals are only logged.
#[derive(Debug, Clone, Default)]
pub struct LoggingAssetStore {
    base_url: Option<String>,
}

impl LoggingAssetStore {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[async_trait]
impl AssetStore for LoggingAssetStore {
    async fn remove(&self, public_id: &str) -> AppResult<()> {
        tracing::info!(
            public_id = %public_id,
            host = self.base_url.as_deref().unwrap_or("unconfigured"),
            "Releasing asset"
        );
        Ok(())
    }
}

/// Extract the public id from an asset URL.
///
/// The id is every path segment after `upload/<version>/`, with the file
/// extension stripped from the last one:
/// `.../upload/v123/blog/avatars/abc.png` -> `blog/avatars/abc`.
pub fn public_id_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segments: Vec<&str> = path.split('/').collect();
    let upload = segments.iter().position(|s| *s == ASSET_UPLOAD_SEGMENT)?;
    let rest = segments.get(upload + 2..)?;
    let (file, dirs) = rest.split_last()?;

    let stem = match file.rfind('.') {
        Some(idx) if idx > 0 => &file[..idx],
        _ => file,
    };
    if stem.is_empty() {
        return None;
    }

    let mut parts: Vec<&str> = dirs.iter().copied().filter(|s| !s.is_empty()).collect();
    parts.push(stem);
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_id_with_folders() {
        let url = "https://res.example.com/demo/image/upload/v1700000000/blog/avatars/abc123.png";
        assert_eq!(public_id_from_url(url).as_deref(), Some("blog/avatars/abc123"));
    }

    #[test]
    fn test_public_id_without_folders() {
        let url = "https://res.example.com/demo/image/upload/v1/photo.jpg";
        assert_eq!(public_id_from_url(url).as_deref(), Some("photo"));
    }

    #[test]
    fn test_public_id_ignores_query() {
        let url = "https://res.example.com/demo/image/upload/v1/a/b.webp?x=1";
        assert_eq!(public_id_from_url(url).as_deref(), Some("a/b"));
    }

    #[test]
    fn test_public_id_rejects_foreign_urls() {
        assert_eq!(public_id_from_url("https://example.com/img/a.png"), None);
        assert_eq!(public_id_from_url("https://res.example.com/upload/v1"), None);
    }

    #[tokio::test]
    async fn test_logging_store_accepts_removal() {
        let store = LoggingAssetStore::new(None);
        assert!(store.remove("blog/a").await.is_ok());
    }
}
