#![allow(dead_code)]

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_compression::tokio::bufread::GzipDecoder;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader, ReadBuf};

/// Deterministic, poorly compressible bytes (xorshift).
pub fn noise(len: usize) -> Vec<u8> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

/// A small LSIF dump, one JSON object per line.
pub fn sample_dump() -> Vec<u8> {
    let mut dump = String::new();
    dump.push_str(r#"{"id":1,"type":"vertex","label":"metaData","version":"0.4.3","projectRoot":"file:///repo","toolInfo":{"name":"lsif-go"}}"#);
    dump.push('\n');
    for id in 2..500 {
        dump.push_str(&format!(
            r#"{{"id":{id},"type":"vertex","label":"range","start":{{"line":{id},"character":0}},"end":{{"line":{id},"character":8}}}}"#
        ));
        dump.push('\n');
    }
    dump.into_bytes()
}

pub async fn gunzip(bytes: &[u8]) -> Vec<u8> {
    let mut decoder = GzipDecoder::new(BufReader::new(bytes));
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .await
        .expect("body should be valid gzip");
    out
}

/// Yields `ok_bytes` bytes of `x`, then fails every read.
pub struct FailingReader {
    pub ok_bytes: usize,
}

impl AsyncRead for FailingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.ok_bytes == 0 {
            return Poll::Ready(Err(io::Error::other("disk on fire")));
        }
        let n = self.ok_bytes.min(buf.remaining());
        buf.put_slice(&vec![b'x'; n]);
        self.ok_bytes -= n;
        Poll::Ready(Ok(()))
    }
}
