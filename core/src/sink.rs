//! # Result Sink
//!
//! Owns the result log and is its only writer. Every producer goes through
//! [`ResultSink::record`], which holds a single mutex for the whole
//! echo-write-flush sequence, so each finding lands as one complete line.

use std::io;
use std::mem;
use std::path::{Path, PathBuf};

use sweepr_common::error::{SetupError, WriteError};
use sweepr_common::finding::Finding;
use tokio::fs::{self, File};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, error};

/// Immediate-feedback channel for findings, called once per finding at
/// discovery time.
pub type Echo = Box<dyn Fn(&Finding) + Send + Sync>;

pub struct ResultSink<W> {
    state: Mutex<SinkState<W>>,
    echo: Echo,
    path: Option<PathBuf>,
}

struct SinkState<W> {
    writer: W,
    recorded: Vec<Finding>,
    write_errors: usize,
    closed: bool,
    /// A failed append left part of a line behind.
    mid_line: bool,
}

/// Everything the sink accepted over its lifetime.
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub findings: Vec<Finding>,
    pub write_errors: usize,
}

impl ResultSink<File> {
    /// Creates the log directory if needed and truncates the log file.
    ///
    /// Nothing has been probed yet when this fails, so the error aborts the
    /// session with no partial log.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path: &Path = path.as_ref();

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|source| SetupError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        let file: File = File::create(path)
            .await
            .map_err(|source| SetupError::CreateFile {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("result log opened at {}", path.display());

        let mut sink = Self::from_writer(file);
        sink.path = Some(path.to_path_buf());
        Ok(sink)
    }
}

impl<W> ResultSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Wraps an arbitrary writer. Findings are echoed to stdout until
    /// [`ResultSink::with_echo`] says otherwise.
    pub fn from_writer(writer: W) -> Self {
        Self {
            state: Mutex::new(SinkState {
                writer,
                recorded: Vec::new(),
                write_errors: 0,
                closed: false,
                mid_line: false,
            }),
            echo: Box::new(|finding: &Finding| println!("{finding}")),
            path: None,
        }
    }

    pub fn with_echo<F>(mut self, echo: F) -> Self
    where
        F: Fn(&Finding) + Send + Sync + 'static,
    {
        self.echo = Box::new(echo);
        self
    }

    /// Disables the echo channel; only the log receives findings.
    pub fn silent(self) -> Self {
        self.with_echo(|_| {})
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Echoes and appends one finding.
    ///
    /// A failed append is returned to the caller and counted; the sink stays
    /// usable for the next finding. If the failure cut a line short, the next
    /// append terminates the fragment first so it cannot fuse with a finding.
    pub async fn record(&self, finding: Finding) -> Result<(), WriteError> {
        let mut guard = self.state.lock().await;
        let state: &mut SinkState<W> = &mut guard;

        (self.echo)(&finding);

        let mut bytes: Vec<u8> = Vec::new();
        if state.mid_line {
            bytes.push(b'\n');
        }
        bytes.extend_from_slice(format!("{finding}\n").as_bytes());

        let written: io::Result<()> = if state.closed {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "result log already closed"))
        } else {
            let mut count: usize = 0;
            let result = append(&mut state.writer, &bytes, &mut count).await;
            state.mid_line = match count {
                0 => state.mid_line,
                n if n == bytes.len() => false,
                n => bytes[n - 1] != b'\n',
            };
            result
        };

        match written {
            Ok(()) => {
                state.recorded.push(finding);
                Ok(())
            }
            Err(source) => {
                state.write_errors += 1;
                Err(WriteError {
                    line: finding.to_string(),
                    source,
                })
            }
        }
    }

    /// Flushes and shuts the writer down, handing back what was recorded.
    /// Later calls to [`ResultSink::record`] fail.
    pub async fn close(&self) -> Recorded {
        let mut state = self.state.lock().await;

        if !state.closed {
            state.closed = true;
            if let Err(e) = state.writer.shutdown().await {
                error!("Failed to close result log: {e}");
            }
        }

        Recorded {
            findings: mem::take(&mut state.recorded),
            write_errors: state.write_errors,
        }
    }
}

/// Writes `bytes` in full, keeping `written` current so a failure reports
/// exactly how far it got.
async fn append<W>(writer: &mut W, bytes: &[u8], written: &mut usize) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while *written < bytes.len() {
        match writer.write(&bytes[*written..]).await {
            Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
            Ok(n) => *written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    writer.flush().await
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
