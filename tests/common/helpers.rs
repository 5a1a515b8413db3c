#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use imgrab::candidate::RawResult;
use imgrab::downloader::DownloaderBuilder;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// The 8-byte PNG signature followed by a few payload bytes.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR-imgrab-test";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a temporary file with the given content
pub fn create_temp_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// `data:image/png;base64,...` wrapping [`PNG_BYTES`]
pub fn png_data_uri() -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(PNG_BYTES))
}

/// A normalized discovery record
pub fn image_result(url: &str, width: u32, height: u32) -> RawResult {
    RawResult::from_image(url, width, height)
}

/// Sorted names of the files in `dir` (empty if `dir` is missing)
pub fn file_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Asserts that a file has the expected content
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let content = fs::read(path).expect("Failed to read file");
    assert_eq!(content, expected, "File content mismatch at path: {:?}", path);
}

/// A downloader without progress bar and with short retry pauses
pub fn quiet_downloader(dir: &Path) -> DownloaderBuilder {
    DownloaderBuilder::hidden()
        .directory(dir.to_path_buf())
        .timeout(Duration::from_secs(5))
        .retry_delay(Duration::from_millis(10))
}

/// A bare HTTP/1.1 server answering every request with [`PNG_BYTES`] after
/// `delay`, recording how many requests were being served at once.
pub struct CountingServer {
    addr: SocketAddr,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    requests: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl CountingServer {
    pub async fn start(delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Test server has no address");

        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(AtomicUsize::new(0));

        let counters = (in_flight.clone(), max_in_flight.clone(), requests.clone());
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let (in_flight, max_in_flight, requests) = counters.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, delay, in_flight, max_in_flight, requests).await;
                });
            }
        });

        Self {
            addr,
            in_flight,
            max_in_flight,
            requests,
            task,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}/{}", self.addr, path.trim_start_matches('/'))
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Drop for CountingServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(
    mut stream: TcpStream,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    requests: Arc<AtomicUsize>,
) -> std::io::Result<()> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        request.extend_from_slice(&buf[..n]);
    }

    requests.fetch_add(1, Ordering::SeqCst);
    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    max_in_flight.fetch_max(now, Ordering::SeqCst);
    tokio::time::sleep(delay).await;
    in_flight.fetch_sub(1, Ordering::SeqCst);

    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        PNG_BYTES.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(PNG_BYTES).await?;
    stream.shutdown().await
}
