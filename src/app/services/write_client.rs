//! Write clients for encoded line-protocol batches
//!
//! The pipeline core never talks to the network directly: it hands ordered
//! batches to a [`LineSink`]. Two implementations exist, a real HTTP client
//! for the InfluxDB v2 write API and a dry-run sink that prints lines to
//! standard output.
//!
//! No retries: a failed batch aborts the run and reports its index, so the
//! operator can resume from that point. Idempotent re-import relies on the
//! target system's upsert-by-identity semantics, not on retry logic here.

use crate::config::ImportConfig;
use crate::constants::{MEASUREMENT, START_OF_TIME, WRITE_PRECISION};
use crate::{Error, Result};
use chrono::{SecondsFormat, Utc};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

/// Destination for encoded line-protocol batches
///
/// Implementations must submit batches strictly in the order received and
/// never in parallel; the ingestion endpoint's per-series performance
/// guarantee depends on monotonic arrival order.
#[allow(async_fn_in_trait)]
pub trait LineSink {
    /// Deliver one batch; `batch_index` is zero-based and reported in
    /// write-time errors
    async fn write_batch(&mut self, batch_index: usize, lines: &[String]) -> Result<()>;
}

// =============================================================================
// HTTP Client
// =============================================================================

/// HTTP write client for the InfluxDB v2 API
pub struct HttpLineSink {
    client: reqwest::Client,
    base: String,
    org: String,
    bucket: String,
    token: String,
}

impl HttpLineSink {
    /// Build a client with a bounded per-request timeout
    pub fn new(endpoint: &str, token: impl Into<String>, config: &ImportConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.write_timeout_ms))
            .build()
            .map_err(|e| Error::transport("client construction", e))?;

        Ok(Self {
            client,
            base: endpoint.trim_end_matches('/').to_string(),
            org: config.org.clone(),
            bucket: config.bucket.clone(),
            token: token.into(),
        })
    }

    /// Endpoint base URL with any trailing slash removed
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Delete previously imported points for the measurement so a re-import
    /// replaces rather than duplicates them
    pub async fn truncate_measurement(&self) -> Result<()> {
        let context = "measurement truncation";
        let stop = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let body = serde_json::json!({
            "start": START_OF_TIME,
            "stop": stop,
            "predicate": format!("_measurement=\"{}\"", MEASUREMENT),
        });

        info!(
            "Truncating measurement '{}' in bucket '{}'",
            MEASUREMENT, self.bucket
        );

        let response = self
            .client
            .post(format!("{}/api/v2/delete", self.base))
            .query(&[("org", self.org.as_str()), ("bucket", self.bucket.as_str())])
            .header("Authorization", format!("Token {}", self.token))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| Error::transport(context, e))?;

        Self::check_response(context, response).await
    }

    async fn check_response(context: &str, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::auth(context, status.as_u16()));
        }

        if !status.is_success() {
            let diagnostic = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("no diagnostic available"));
            return Err(Error::server_rejected(context, status.as_u16(), diagnostic));
        }

        Ok(())
    }
}

impl LineSink for HttpLineSink {
    async fn write_batch(&mut self, batch_index: usize, lines: &[String]) -> Result<()> {
        let context = format!("batch {}", batch_index);

        let response = self
            .client
            .post(format!("{}/api/v2/write", self.base))
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", self.bucket.as_str()),
                ("precision", WRITE_PRECISION),
            ])
            .header("Authorization", format!("Token {}", self.token))
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(lines.join("\n"))
            .send()
            .await
            .map_err(|e| Error::transport(context.clone(), e))?;

        Self::check_response(&context, response).await?;

        debug!("Wrote batch {} ({} lines)", batch_index, lines.len());
        Ok(())
    }
}

// =============================================================================
// Dry-Run Sink
// =============================================================================

/// Prints encoded batches instead of writing them; performs zero network
/// calls
pub struct DryRunSink<W: Write> {
    out: W,
}

impl DryRunSink<std::io::Stdout> {
    /// Dry-run sink writing to standard output
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> DryRunSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the sink and return its writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> LineSink for DryRunSink<W> {
    async fn write_batch(&mut self, batch_index: usize, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{}", line)
                .map_err(|e| Error::io("cannot write dry-run output", e))?;
        }
        debug!("Dry run: batch {} ({} lines)", batch_index, lines.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dry_run_emits_lines_in_submission_order() {
        let mut sink = DryRunSink::new(Vec::new());

        sink.write_batch(0, &["first".to_string(), "second".to_string()])
            .await
            .unwrap();
        sink.write_batch(1, &["third".to_string()]).await.unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "first\nsecond\nthird\n");
    }

    #[test]
    fn http_sink_trims_trailing_slash_from_endpoint() {
        let config = ImportConfig::default();
        let sink = HttpLineSink::new("http://localhost:8086/", "token", &config).unwrap();
        assert_eq!(sink.base(), "http://localhost:8086");
    }
}
