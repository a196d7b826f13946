//! PostgREST-style sink implementation

use super::schema::ContentRow;
use super::traits::{BatchFailure, Sink, SinkError, SinkOutcome, SinkReport, SinkResult};
use crate::config::SinkConfig;
use crate::record::CandidateRecord;
use reqwest::{Client, Request};
use url::Url;

/// Conflict handling requested from the endpoint
const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=minimal";

/// Sink writing to `{base}/rest/v1/{table}` with upsert semantics
pub struct RestSink {
    client: Client,
    endpoint: Option<Url>,
    credential: Option<String>,
    batch_size: usize,
}

impl RestSink {
    /// Creates a sink from configuration
    ///
    /// A missing credential yields a sink that reports
    /// [`SinkOutcome::Skipped`] and never sends a request.
    ///
    /// # Arguments
    ///
    /// * `config` - Remote table settings
    /// * `client` - HTTP client carrying the sink request timeout
    ///
    /// # Returns
    ///
    /// * `Ok(RestSink)` - Ready to write
    /// * `Err(SinkError::Endpoint)` - The base URL and table do not form a valid URL
    pub fn new(config: &SinkConfig, client: Client) -> SinkResult<Self> {
        let endpoint = match (&config.base_url, &config.credential) {
            (Some(base), Some(_)) => Some(build_endpoint(base, &config.table)?),
            _ => None,
        };

        Ok(Self {
            client,
            endpoint,
            credential: config.credential.clone(),
            batch_size: config.batch_size.max(1),
        })
    }

    /// Whether this sink will actually send anything
    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some() && self.credential.is_some()
    }

    fn batch_request(
        &self,
        endpoint: &Url,
        key: &str,
        rows: &[ContentRow],
    ) -> Result<Request, reqwest::Error> {
        self.client
            .post(endpoint.clone())
            .header("apikey", key)
            .header("Authorization", format!("Bearer {}", key))
            .header("Prefer", PREFER_UPSERT)
            .json(rows)
            .build()
    }

    async fn send_batch(&self, endpoint: &Url, key: &str, rows: &[ContentRow]) -> SinkResult<()> {
        let request = self.batch_request(endpoint, key, rows)?;
        let response = self.client.execute(request).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(SinkError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

impl Sink for RestSink {
    async fn write(&self, records: &[CandidateRecord]) -> SinkOutcome {
        let (endpoint, key) = match (&self.endpoint, &self.credential) {
            (Some(endpoint), Some(key)) => (endpoint, key),
            _ => {
                tracing::info!("No sink credential configured, skipping upload");
                return SinkOutcome::Skipped;
            }
        };

        let mut report = SinkReport::default();
        let batch_count = records.len().div_ceil(self.batch_size);

        for (index, chunk) in records.chunks(self.batch_size).enumerate() {
            let rows: Vec<ContentRow> = chunk.iter().map(ContentRow::from).collect();

            match self.send_batch(endpoint, key, &rows).await {
                Ok(()) => {
                    report.batches_ok += 1;
                    report.rows_written += rows.len();
                    tracing::info!(
                        "Uploaded batch {}/{} ({} records)",
                        index + 1,
                        batch_count,
                        rows.len()
                    );
                }
                Err(e) => {
                    tracing::warn!("Batch {}/{} failed: {}", index + 1, batch_count, e);
                    report.batches_failed += 1;
                    report.failures.push(BatchFailure {
                        batch: index,
                        rows: rows.len(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Sink finished: {} rows written, {} batches failed",
            report.rows_written,
            report.batches_failed
        );

        SinkOutcome::Written(report)
    }
}

/// Builds `{base}/rest/v1/{table}?on_conflict=source_url`
fn build_endpoint(base: &Url, table: &str) -> SinkResult<Url> {
    let raw = format!("{}/rest/v1/{}", base.as_str().trim_end_matches('/'), table);
    let mut endpoint = Url::parse(&raw).map_err(|e| SinkError::Endpoint(format!("{}: {}", raw, e)))?;
    endpoint
        .query_pairs_mut()
        .append_pair("on_conflict", "source_url");
    Ok(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sink_config(base: Option<&str>, credential: Option<&str>) -> SinkConfig {
        SinkConfig {
            base_url: base.map(|b| Url::parse(b).unwrap()),
            credential: credential.map(str::to_string),
            table: "content".to_string(),
            batch_size: 50,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_build_endpoint() {
        let base = Url::parse("https://project.example.co/").unwrap();
        let endpoint = build_endpoint(&base, "content").unwrap();
        assert_eq!(
            endpoint.as_str(),
            "https://project.example.co/rest/v1/content?on_conflict=source_url"
        );
    }

    #[test]
    fn test_build_endpoint_keeps_base_path() {
        let base = Url::parse("https://gateway.example/project").unwrap();
        let endpoint = build_endpoint(&base, "content").unwrap();
        assert_eq!(endpoint.path(), "/project/rest/v1/content");
    }

    #[test]
    fn test_sink_disabled_without_credential() {
        let sink = RestSink::new(
            &sink_config(Some("https://project.example.co"), None),
            Client::new(),
        )
        .unwrap();
        assert!(!sink.is_enabled());
    }

    #[test]
    fn test_sink_enabled_with_credential() {
        let sink = RestSink::new(
            &sink_config(Some("https://project.example.co"), Some("key")),
            Client::new(),
        )
        .unwrap();
        assert!(sink.is_enabled());
    }

    #[test]
    fn test_batch_request_headers() {
        let sink = RestSink::new(
            &sink_config(Some("https://project.example.co"), Some("key")),
            Client::new(),
        )
        .unwrap();
        let endpoint = sink.endpoint.clone().unwrap();

        let request = sink.batch_request(&endpoint, "key", &[]).unwrap();
        let headers = request.headers();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(headers.get("apikey").unwrap(), "key");
        assert_eq!(headers.get("Authorization").unwrap(), "Bearer key");
        assert_eq!(headers.get("Prefer").unwrap(), PREFER_UPSERT);
        assert_eq!(request.url().query(), Some("on_conflict=source_url"));
        // the client's timeout applies; requests carry no override
        assert!(request.timeout().is_none());
    }

    #[tokio::test]
    async fn test_write_without_credential_is_skipped() {
        let sink = RestSink::new(&sink_config(None, None), Client::new()).unwrap();
        assert_eq!(sink.write(&[]).await, SinkOutcome::Skipped);
    }
}
