//! File-backed storage for rendered invoice artifacts
//!
//! One file per order under the invoice directory, written once and never
//! replaced: the artifact is a point-in-time proof of purchase and must not
//! drift after later status changes.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type InvoiceStoreResult<T> = Result<T, InvoiceStoreError>;

/// Invoice artifact store
#[derive(Debug, Clone)]
pub struct InvoiceStore {
    dir: PathBuf,
}

impl InvoiceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn artifact_path(&self, order_id: i64) -> PathBuf {
        self.dir.join(format!("{order_id}.pdf"))
    }

    /// Fetch a previously persisted artifact
    pub async fn get(&self, order_id: i64) -> InvoiceStoreResult<Option<Vec<u8>>> {
        match tokio::fs::read(self.artifact_path(order_id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist an artifact, write-once
    ///
    /// A concurrent first render may race here; both writers produce the
    /// same bytes (rendering is deterministic), so last-write-wins is safe.
    pub async fn put(&self, order_id: i64, bytes: &[u8]) -> InvoiceStoreResult<()> {
        let path = self.artifact_path(order_id);
        if Path::new(&path).exists() {
            return Ok(());
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }
}
