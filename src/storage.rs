use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;

/// Persistence boundary for uploaded profile pictures. Names are the derived
/// storage names produced at signup; the store does not interpret them.
#[async_trait]
pub trait UploadStore: Send + Sync {
    async fn put(&self, name: &str, body: Bytes) -> anyhow::Result<()>;
    /// Returns `Ok(None)` when no upload exists under `name`.
    async fn get(&self, name: &str) -> anyhow::Result<Option<Bytes>>;
}

/// Local-filesystem store rooted at the configured upload directory.
pub struct LocalUploads {
    root: PathBuf,
}

impl LocalUploads {
    pub async fn new(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("create upload dir {}", root.display()))?;
        Ok(Self { root })
    }
}

#[async_trait]
impl UploadStore for LocalUploads {
    async fn put(&self, name: &str, body: Bytes) -> anyhow::Result<()> {
        let path = self.root.join(name);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;
        Ok(())
    }

    async fn get(&self, name: &str) -> anyhow::Result<Option<Bytes>> {
        let path = self.root.join(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(Bytes::from(bytes))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read upload {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store(tag: &str) -> LocalUploads {
        let dir = std::env::temp_dir().join(format!(
            "snapbook-uploads-{tag}-{}",
            time::OffsetDateTime::now_utc().unix_timestamp_nanos()
        ));
        LocalUploads::new(&dir).await.expect("create temp store")
    }

    #[tokio::test]
    async fn put_then_get_returns_the_bytes() {
        let store = temp_store("roundtrip").await;
        store
            .put("alice_1.png", Bytes::from_static(b"png-bytes"))
            .await
            .unwrap();
        let got = store.get("alice_1.png").await.unwrap();
        assert_eq!(got, Some(Bytes::from_static(b"png-bytes")));
    }

    #[tokio::test]
    async fn get_missing_is_none_not_error() {
        let store = temp_store("missing").await;
        assert!(store.get("nobody.jpg").await.unwrap().is_none());
    }
}
