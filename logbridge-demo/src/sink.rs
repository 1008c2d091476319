//! JSON-lines sink.
//!
//! Pulls records from any [`RecordReader`] and writes one JSON object per
//! line. Stops at end-of-stream or when the cancellation token fires.

use std::io::Write;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use logbridge_core::pipeline::RecordReader;

/// Writes converted records as JSON lines.
pub struct JsonLineSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Drain `reader` until it reports end-of-stream or `cancel` fires.
    ///
    /// Returns the number of records written. Cancellation is a normal stop,
    /// not an error.
    pub async fn run<R: RecordReader>(
        &mut self,
        reader: &R,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        info!("sink started");
        let mut written = 0u64;

        loop {
            let record = match reader.read(cancel).await {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(e) => {
                    if let Some(reason) = e.cancel_reason() {
                        debug!(%reason, "sink stopped by cancellation");
                        break;
                    }
                    return Err(e).context("failed to read record");
                }
            };

            serde_json::to_writer(&mut self.writer, &record.to_json())
                .context("failed to encode record")?;
            self.writer
                .write_all(b"\n")
                .context("failed to write record")?;
            written += 1;
        }

        self.writer.flush().context("failed to flush sink")?;
        info!(written, "sink finished");
        Ok(written)
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
