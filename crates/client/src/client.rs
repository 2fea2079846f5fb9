use async_trait::async_trait;
use sysmon_config::EndpointConfig;
use sysmon_core::{parse_payload, MetricsPayload, MetricsSource, MonitorError, Result};
use tracing::debug;

/// Metrics client that issues a `GET` against the server's metrics endpoint.
///
/// Every call is stateless; the caller decides how often to poll.
#[derive(Debug, Clone)]
pub struct HttpMetricsSource {
    client: reqwest::Client,
    url:    String,
}

impl HttpMetricsSource {
    /// Build a client for the endpoint described by `config`.
    pub fn new(config: &EndpointConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| MonitorError::Config(format!("http client: {e}")))?;
        Ok(Self::with_client(client, config.url()))
    }

    /// Use a preconfigured `reqwest` client.
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MetricsSource for HttpMetricsSource {
    async fn fetch(&self) -> Result<Option<MetricsPayload>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| MonitorError::Fetch(format!("GET {}: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            debug!("Metrics endpoint answered {status}");
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| MonitorError::Fetch(format!("read body: {e}")))?;

        parse_payload(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a loopback port.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        });

        format!("http://{addr}/api/metrics/v1")
    }

    fn source(url: String) -> HttpMetricsSource {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpMetricsSource::with_client(client, url)
    }

    #[tokio::test]
    async fn ok_response_is_parsed() {
        let url = serve_once("200 OK", r#"{"rss": 1024, "limits": {}}"#).await;
        let payload = source(url).fetch().await.unwrap().expect("payload");
        assert_eq!(payload.rss, Some(1024));
    }

    #[tokio::test]
    async fn non_ok_status_is_no_data() {
        let url = serve_once("503 Service Unavailable", "{}").await;
        assert_eq!(source(url).fetch().await.unwrap(), None);
    }

    #[tokio::test]
    async fn null_body_is_no_data() {
        let url = serve_once("200 OK", "null").await;
        assert_eq!(source(url).fetch().await.unwrap(), None);
    }

    #[tokio::test]
    async fn connection_refused_is_fetch_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = source(format!("http://{addr}/metrics")).fetch().await.unwrap_err();
        assert!(matches!(err, MonitorError::Fetch(_)));
    }

    #[tokio::test]
    async fn url_comes_from_endpoint_config() {
        let source = HttpMetricsSource::new(&EndpointConfig::default()).unwrap();
        assert_eq!(source.url(), "http://localhost:8888/api/metrics/v1");
    }
}
