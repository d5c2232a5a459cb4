//! Newline-delimited JSON adapters for the inbound and outbound channels.
//!
//! The binary wires these to stdin and stdout, which lets the node sit behind
//! any broker bridge that speaks JSON lines.

use async_trait::async_trait;
use futures::Stream;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{error, warn};

use crate::adapters::registry::AnalysisDto;
use crate::domain::analysis::AnalysisNotification;
use crate::domain::foundation::{DomainError, ErrorCode, OutboundMessage, ValidationError};
use crate::domain::inbound::{InboundMode, InboundPayload};
use crate::ports::EventPublisher;

/// Why an inbound line was skipped.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid analysis: {0}")]
    Invalid(#[from] ValidationError),

    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl From<DecodeError> for DomainError {
    fn from(err: DecodeError) -> Self {
        DomainError::new(ErrorCode::InvalidPayload, err.to_string())
    }
}

/// Decodes one inbound document according to `mode`.
pub fn decode_payload(line: &str, mode: InboundMode) -> Result<InboundPayload, DecodeError> {
    match mode {
        InboundMode::Resolve => {
            let notification: AnalysisNotification = serde_json::from_str(line)?;
            Ok(notification.into())
        }
        InboundMode::Hydrated => {
            let dto: AnalysisDto = serde_json::from_str(line)?;
            Ok(dto.into_record()?.into())
        }
    }
}

/// Decodes one raw inbound line, which may not be valid UTF-8.
pub fn decode_line(line: &[u8], mode: InboundMode) -> Result<InboundPayload, DecodeError> {
    decode_payload(std::str::from_utf8(line)?, mode)
}

/// Reads inbound payloads, one JSON document per line.
///
/// Blank lines are ignored. Undecodable lines are logged and skipped; a read
/// error ends the stream.
pub struct JsonLinesSource<R> {
    reader: BufReader<R>,
    mode: InboundMode,
}

impl<R> JsonLinesSource<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R, mode: InboundMode) -> Self {
        Self {
            reader: BufReader::new(reader),
            mode,
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = InboundPayload> {
        let mode = self.mode;
        let state = (self.reader, Vec::new(), 0u64);
        futures::stream::unfold(state, move |(mut reader, mut buf, mut line_no)| async move {
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf).await {
                    Ok(0) => return None,
                    Ok(_) => {}
                    Err(e) => {
                        error!(error = %e, "Failed to read inbound channel");
                        return None;
                    }
                }
                line_no += 1;

                if buf.iter().all(u8::is_ascii_whitespace) {
                    continue;
                }

                match decode_line(&buf, mode) {
                    Ok(payload) => return Some((payload, (reader, buf, line_no))),
                    Err(e) => warn!(line = line_no, mode = %mode, error = %e, "Skipping undecodable inbound line"),
                }
            }
        })
    }
}

/// Writes each outbound message as a single JSON line.
pub struct JsonLinesPublisher<W> {
    writer: Mutex<W>,
}

impl<W> JsonLinesPublisher<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> EventPublisher for JsonLinesPublisher<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn publish(&self, message: OutboundMessage) -> Result<(), DomainError> {
        let mut line = serde_json::to_vec(&message).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize outbound message: {}", e),
            )
        })?;
        line.push(b'\n');

        // One lock per message keeps concurrent lines from interleaving.
        let mut writer = self.writer.lock().await;
        let written = async {
            writer.write_all(&line).await?;
            writer.flush().await
        }
        .await;

        written.map_err(|e| {
            DomainError::new(ErrorCode::PublishFailed, format!("Failed to write message: {}", e))
                .with_detail("event_id", message.event_id.to_string())
        })
    }
}
