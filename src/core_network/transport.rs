//! Byte-exact framing primitives shared by the server sessions and the client.
//!
//! A connection carries two kinds of frames on the same byte stream: text
//! lines terminated by `\n`, and binary blocks made of an 8-byte big-endian
//! signed length followed by exactly that many bytes. Nothing in here may
//! read past the end of the frame it was asked for, which is why lines are
//! read one byte at a time and no `BufReader` ever wraps the socket.

use crate::constants::{COPY_CHUNK_SIZE, LENGTH_FIELD_SIZE};
use std::io;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("stream closed during binary transfer ({received} of {expected} bytes)")]
    Truncated { expected: u64, received: u64 },
}

/// Reads one text line, discarding every `\r`.
///
/// Returns `Ok(None)` only when the stream ends before any byte of the line
/// was kept. An empty line (`"\n"`) is `Some("")`, and a last line without a
/// terminator is still returned.
pub async fn read_line<R>(reader: &mut R) -> io::Result<Option<String>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        if reader.read(&mut byte).await? == 0 {
            if bytes.is_empty() {
                return Ok(None);
            }
            break;
        }
        match byte[0] {
            b'\n' => break,
            b'\r' => continue,
            b => bytes.push(b),
        }
    }

    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Writes `line` followed by `\n` and flushes immediately.
pub async fn write_line<W>(writer: &mut W, line: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut frame = Vec::with_capacity(line.len() + 1);
    frame.extend_from_slice(line.as_bytes());
    frame.push(b'\n');
    writer.write_all(&frame).await?;
    writer.flush().await
}

/// Writes the length field that announces a binary block.
pub async fn write_length<W>(writer: &mut W, length: i64) -> io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(&length.to_be_bytes()).await?;
    writer.flush().await
}

/// Reads the length field of a binary block. The value is returned as sent;
/// rejecting negative lengths is up to the caller.
pub async fn read_length<R>(reader: &mut R) -> Result<i64, TransportError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut field = [0u8; LENGTH_FIELD_SIZE];
    let mut filled = 0;
    while filled < LENGTH_FIELD_SIZE {
        let read = reader.read(&mut field[filled..]).await?;
        if read == 0 {
            return Err(TransportError::Truncated {
                expected: LENGTH_FIELD_SIZE as u64,
                received: filled as u64,
            });
        }
        filled += read;
    }
    Ok(i64::from_be_bytes(field))
}

/// Moves exactly `count` bytes from `source` to `destination` in bounded
/// chunks, then flushes `destination`.
///
/// Used for socket to file, file to socket and socket to socket copies
/// alike. Never reads more than `count` bytes from `source`.
pub async fn copy_exactly<R, W>(
    source: &mut R,
    destination: &mut W,
    count: u64,
) -> Result<(), TransportError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buffer = [0u8; COPY_CHUNK_SIZE];
    let mut remaining = count;

    while remaining > 0 {
        let wanted = remaining.min(COPY_CHUNK_SIZE as u64) as usize;
        let read = source.read(&mut buffer[..wanted]).await?;
        if read == 0 {
            return Err(TransportError::Truncated {
                expected: count,
                received: count - remaining,
            });
        }
        destination.write_all(&buffer[..read]).await?;
        remaining -= read as u64;
    }

    destination.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_line_strips_carriage_returns() {
        let mut input: &[u8] = b"li\rst docs\r\n";
        let line = read_line(&mut input).await.unwrap();
        assert_eq!(line.as_deref(), Some("list docs"));
        assert!(input.is_empty());
    }

    #[tokio::test]
    async fn test_read_line_distinguishes_empty_line_from_eof() {
        let mut input: &[u8] = b"\n";
        assert_eq!(read_line(&mut input).await.unwrap(), Some(String::new()));
        assert_eq!(read_line(&mut input).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_line_returns_partial_line_at_eof() {
        let mut input: &[u8] = b"ping";
        assert_eq!(read_line(&mut input).await.unwrap().as_deref(), Some("ping"));
        assert_eq!(read_line(&mut input).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_line_lone_carriage_return_is_eof() {
        let mut input: &[u8] = b"\r";
        assert_eq!(read_line(&mut input).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_line_stops_at_the_delimiter() {
        let mut input: &[u8] = b"OK\n\x00\x01rest";
        assert_eq!(read_line(&mut input).await.unwrap().as_deref(), Some("OK"));
        assert_eq!(input, b"\x00\x01rest");
    }

    #[tokio::test]
    async fn test_write_line_appends_newline() {
        let mut out = Vec::new();
        write_line(&mut out, "pong").await.unwrap();
        write_line(&mut out, "").await.unwrap();
        assert_eq!(out, b"pong\n\n");
    }

    #[tokio::test]
    async fn test_line_then_binary_block_stays_in_sync() {
        let payloads: Vec<Vec<u8>> = vec![
            Vec::new(),
            b"\n".to_vec(),
            b"\r\n\r\n".to_vec(),
            b"line one\nline two\r\n".to_vec(),
            (0..=255u8).cycle().take(COPY_CHUNK_SIZE * 3 + 17).collect(),
        ];

        for payload in payloads {
            let mut wire = Vec::new();
            write_line(&mut wire, "OK").await.unwrap();
            write_length(&mut wire, payload.len() as i64).await.unwrap();
            wire.extend_from_slice(&payload);
            write_line(&mut wire, "next").await.unwrap();

            let mut input: &[u8] = &wire;
            assert_eq!(read_line(&mut input).await.unwrap().as_deref(), Some("OK"));
            let length = read_length(&mut input).await.unwrap();
            assert_eq!(length, payload.len() as i64);

            let mut received = Vec::new();
            copy_exactly(&mut input, &mut received, length as u64)
                .await
                .unwrap();
            assert_eq!(received, payload);
            assert_eq!(read_line(&mut input).await.unwrap().as_deref(), Some("next"));
        }
    }

    #[tokio::test]
    async fn test_length_field_is_big_endian() {
        let mut out = Vec::new();
        write_length(&mut out, 37).await.unwrap();
        assert_eq!(out, vec![0, 0, 0, 0, 0, 0, 0, 37]);

        let mut input: &[u8] = &(-1i64).to_be_bytes();
        assert_eq!(read_length(&mut input).await.unwrap(), -1);
    }

    #[tokio::test]
    async fn test_read_length_truncated() {
        let mut input: &[u8] = &[0, 0, 0];
        match read_length(&mut input).await {
            Err(TransportError::Truncated { expected, received }) => {
                assert_eq!(expected, 8);
                assert_eq!(received, 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_copy_exactly_reports_truncation() {
        let mut input: &[u8] = b"0123456789";
        let mut out = Vec::new();
        match copy_exactly(&mut input, &mut out, 20).await {
            Err(TransportError::Truncated { expected, received }) => {
                assert_eq!(expected, 20);
                assert_eq!(received, 10);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(out, b"0123456789");
    }

    #[tokio::test]
    async fn test_copy_exactly_leaves_trailing_bytes() {
        let mut input: &[u8] = b"abcdef";
        let mut out = Vec::new();
        copy_exactly(&mut input, &mut out, 4).await.unwrap();
        assert_eq!(out, b"abcd");
        assert_eq!(input, b"ef");
    }
}
