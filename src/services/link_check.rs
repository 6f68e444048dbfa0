use std::collections::HashMap;
use std::time::Duration;

use reqwest::{redirect::Policy, Client as HttpClient, StatusCode};
use tokio::sync::RwLock;

use crate::error::AppResult;

const LINK_TIMEOUT: Duration = Duration::from_secs(5);

/// Checks whether a book's download link answers, remembering each answer
/// for the lifetime of the process
pub struct LinkChecker {
    http_client: HttpClient,
    results: RwLock<HashMap<i64, bool>>,
}

impl LinkChecker {
    /// Redirects are not followed: a moved link does not count as available
    pub fn new() -> AppResult<Self> {
        let http_client = HttpClient::builder().redirect(Policy::none()).build()?;
        Ok(Self {
            http_client,
            results: RwLock::new(HashMap::new()),
        })
    }

    /// Availability of `url` for `book_id`, probing only on the first call
    pub async fn is_available(&self, book_id: i64, url: &str) -> bool {
        if let Some(available) = self.results.read().await.get(&book_id) {
            return *available;
        }

        let available = self.probe(url).await;
        tracing::debug!(book_id, url = %url, available, "Checked book link");
        self.results.write().await.insert(book_id, available);
        available
    }

    /// A link is available when a HEAD request answers exactly 200
    async fn probe(&self, url: &str) -> bool {
        match self
            .http_client
            .head(url)
            .timeout(LINK_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Link probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_ok_link_is_available() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/anush.pdf"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let checker = LinkChecker::new().unwrap();
        let url = format!("{}/anush.pdf", server.uri());
        assert!(checker.is_available(1, &url).await);
        // Answer is remembered; the mock expects a single request
        assert!(checker.is_available(1, &url).await);
    }

    #[tokio::test]
    async fn test_non_200_success_is_not_available() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let checker = LinkChecker::new().unwrap();
        assert!(!checker.is_available(2, &format!("{}/x", server.uri())).await);
    }

    #[tokio::test]
    async fn test_missing_link_is_not_available() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let checker = LinkChecker::new().unwrap();
        assert!(!checker.is_available(3, &format!("{}/gone.pdf", server.uri())).await);
    }

    #[tokio::test]
    async fn test_redirected_link_is_not_available() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/old.pdf"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/new.pdf", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/new.pdf"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let checker = LinkChecker::new().unwrap();
        assert!(!checker.is_available(5, &format!("{}/old.pdf", server.uri())).await);
    }

    #[tokio::test]
    async fn test_malformed_url_is_not_available() {
        let checker = LinkChecker::new().unwrap();
        assert!(!checker.is_available(4, "not a url").await);
    }
}
