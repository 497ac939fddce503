//! HTTP fetcher using wreq for TLS fingerprint emulation.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use wreq::Client;
use wreq_util::Emulation;

/// Trait for page fetching - enables stubbing in tests.
///
/// A single GET per call. The body comes back only for HTTP 200; any other
/// status or transport failure is one undistinguished error. No retries.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches a URL with optional query parameters and returns the body text.
    async fn fetch(&self, url: &str, params: &[(String, String)]) -> Result<String>;
}

/// HTTP client with browser impersonation.
pub struct HttpFetcher {
    client: Client,
    accept_language: &'static str,
}

impl HttpFetcher {
    /// Creates a new fetcher with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        // Configure proxy if specified
        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self { client, accept_language: config.market.accept_language() })
    }
}

/// Appends query parameters to a URL, percent-encoded.
fn with_params(url: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, sep, query)
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str, params: &[(String, String)]) -> Result<String> {
        let url = with_params(url, params);

        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", self.accept_language)
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status.as_u16() != 200 {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config() -> Config {
        Config { delay_ms: 0, delay_jitter_ms: 0, ..Config::default() }
    }

    #[test]
    fn test_with_params_empty() {
        assert_eq!(with_params("http://example.com/page", &[]), "http://example.com/page");
    }

    #[test]
    fn test_with_params_encoding() {
        let params =
            vec![("q".to_string(), "night cream site:boots.com".to_string())];
        let url = with_params("http://example.com/html/", &params);
        assert_eq!(url, "http://example.com/html/?q=night%20cream%20site%3Aboots.com");
    }

    #[test]
    fn test_with_params_existing_query() {
        let params = vec![("kl".to_string(), "uk".to_string())];
        let url = with_params("http://example.com/html/?a=1", &params);
        assert_eq!(url, "http://example.com/html/?a=1&kl=uk");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;

        let html = r#"
            <html><body>
                <span data-e2e="product-price">£12.99</span>
            </body></html>
        "#;

        Mock::given(method("GET"))
            .and(path("/product/test"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(&make_test_config()).unwrap();
        let result = fetcher.fetch(&format!("{}/product/test", mock_server.uri()), &[]).await;
        assert!(result.is_ok());
        assert!(result.unwrap().contains("£12.99"));
    }

    #[tokio::test]
    async fn test_fetch_with_query_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/html/"))
            .and(query_param("q", "serum site:spacenk.com"))
            .and(query_param("kl", "uk"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>results</html>"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(&make_test_config()).unwrap();
        let params = vec![
            ("q".to_string(), "serum site:spacenk.com".to_string()),
            ("kl".to_string(), "uk".to_string()),
        ];

        let result = fetcher.fetch(&format!("{}/html/", mock_server.uri()), &params).await;
        assert!(result.is_ok());
        assert!(result.unwrap().contains("results"));
    }

    #[tokio::test]
    async fn test_fetch_error_404() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(&make_test_config()).unwrap();
        let result = fetcher.fetch(&format!("{}/missing", mock_server.uri()), &[]).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_error_500() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(&make_test_config()).unwrap();
        let result = fetcher.fetch(&format!("{}/broken", mock_server.uri()), &[]).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_non_200_redirectish_status() {
        let mock_server = MockServer::start().await;

        // Only an exact 200 counts as success
        Mock::given(method("GET"))
            .and(path("/nocontent"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(&make_test_config()).unwrap();
        let result = fetcher.fetch(&format!("{}/nocontent", mock_server.uri()), &[]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_empty_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(&make_test_config()).unwrap();
        let result = fetcher.fetch(&format!("{}/empty", mock_server.uri()), &[]).await;
        assert!(result.is_ok());
        assert!(result.unwrap().is_empty());
    }
}
