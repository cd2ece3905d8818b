//! Record store
//!
//! Writes each `RequestLog` to its own file named by a random UUID under
//! a fixed directory. Names never repeat, so concurrent writers need no
//! coordination.

use super::{PersistError, RequestLog};
use crate::logger;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RequestLogStore {
    dir: PathBuf,
}

impl RequestLogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist one record, returning the path of the file written.
    ///
    /// A file that was created but not fully written is removed.
    pub async fn persist(&self, record: &RequestLog) -> Result<PathBuf, PersistError> {
        let path = self.dir.join(Uuid::new_v4().to_string());

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|source| PersistError::Create {
                path: path.clone(),
                source,
            })?;

        fill(file, path, record).await
    }
}

/// Serialize `record` into the freshly created file at `path`.
///
/// `out` is closed before returning; on error the file is removed.
async fn fill<W>(mut out: W, path: PathBuf, record: &RequestLog) -> Result<PathBuf, PersistError>
where
    W: AsyncWrite + Unpin,
{
    let written = match serde_json::to_vec(record) {
        Ok(payload) => write_payload(&mut out, &payload)
            .await
            .map_err(|source| PersistError::Write {
                path: path.clone(),
                source,
            }),
        Err(e) => Err(PersistError::from(e)),
    };
    drop(out);

    if written.is_err() {
        remove_partial(&path).await;
    }
    written.map(|()| path)
}

async fn write_payload<W>(out: &mut W, payload: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(payload).await?;
    out.flush().await
}

async fn remove_partial(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => logger::log_warning(&format!(
            "Failed to remove partial record {}: {e}",
            path.display()
        )),
    }
}
