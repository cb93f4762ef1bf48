//! Streaming gzip compression of the dump while it is being uploaded.
//!
//! A background task reads the source, gzips it and writes into a bounded in-memory pipe; the
//! HTTP body reads from the other end. Neither side holds more than the pipe's capacity (plus
//! encoder state), whatever the size of the dump.
//!
//! The task reports how it finished on a one-shot [`CompletionSignal`]. Callers must await it
//! after the exchange: when reading the source fails halfway, the pipe is simply closed and the
//! server sees a short body, which it may well accept.

use std::io;

use async_compression::tokio::write::GzipEncoder;
use tokio::io::{AsyncRead, AsyncWriteExt, BufReader, DuplexStream};
use tokio::sync::oneshot;
use tracing::{debug, error};

/// Bytes buffered between the compressor and the HTTP body.
pub const PIPE_CAPACITY: usize = 64 * 1024;

/// One-shot report of how the compression task finished.
#[derive(Debug)]
pub struct CompletionSignal {
    rx: oneshot::Receiver<io::Result<u64>>,
}

impl CompletionSignal {
    /// Waits for the compression task and returns the number of uncompressed bytes it consumed,
    /// or the first error it hit.
    pub async fn wait(self) -> io::Result<u64> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(io::Error::other(
                "compression task exited without reporting a result",
            )),
        }
    }
}

/// Starts compressing `source` on a background task and returns the read half of the pipe the
/// compressed bytes are written to. Must be called within a Tokio runtime.
pub fn gzip_stream<R>(source: R) -> (DuplexStream, CompletionSignal)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (reader, writer) = tokio::io::duplex(PIPE_CAPACITY);
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = compress_into(source, writer).await;
        match &result {
            Ok(bytes) => debug!(bytes, "[UPLOAD] Compression finished"),
            Err(e) => error!(error = %e, "[UPLOAD][ERROR] Compression failed"),
        }
        // The receiver is gone only if the caller gave up on the upload.
        let _ = tx.send(result);
    });

    (reader, CompletionSignal { rx })
}

async fn compress_into<R>(source: R, pipe: DuplexStream) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut source = BufReader::new(source);
    let mut encoder = GzipEncoder::new(pipe);
    let copied = tokio::io::copy_buf(&mut source, &mut encoder).await?;
    // Writes the gzip trailer, then closes the pipe's write half.
    encoder.shutdown().await?;
    Ok(copied)
}
