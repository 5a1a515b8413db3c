//! Atomic file writes.
//!
//! Bytes go to a `<name>.part` sibling which is renamed over the final name
//! only once everything was written and flushed. A failed write removes the
//! part file, so a final name on disk always holds a complete download.

use crate::error::{Error, Result};

use futures::stream::{self, Stream, StreamExt};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

/// Buffer size of the file writer.
pub const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// The `.part` sibling of `path`.
pub fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

/// Size of the file at `path` when it is a complete earlier download, that
/// is a regular file with a nonzero size.
pub async fn existing_size(path: &Path) -> Option<u64> {
    let metadata = fs::metadata(path).await.ok()?;
    (metadata.is_file() && metadata.len() > 0).then(|| metadata.len())
}

/// Write `bytes` to `path` atomically. Returns the size written.
pub async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<u64> {
    write_stream(path, stream::iter([Ok::<_, Error>(bytes)])).await
}

/// Write every chunk of `chunks` to `path` atomically. Returns the size
/// written.
///
/// The parent directory is created if needed. A chunk error aborts the
/// write and is reported as [`Error::Download`].
pub async fn write_stream<S, B, E>(path: &Path, chunks: S) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await?;
    }

    let part = part_path(path);
    let written = async {
        let file = fs::File::create(&part).await?;
        let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
        let mut size = 0u64;

        let mut chunks = std::pin::pin!(chunks);
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| Error::Download(e.to_string()))?;
            let chunk = chunk.as_ref();
            writer.write_all(chunk).await?;
            size += chunk.len() as u64;
        }
        writer.flush().await?;
        drop(writer);

        fs::rename(&part, path).await?;
        Ok::<_, Error>(size)
    }
    .await;

    if written.is_err() {
        debug!("Removing partial file {:?}", &part);
        let _ = fs::remove_file(&part).await;
    }
    written
}
