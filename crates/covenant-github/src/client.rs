//! HTTP client for the GitHub REST API.
//!
//! Requests are authenticated with a bearer token and are never retried:
//! a failed fetch ends the evaluation.

use std::time::Duration;

use async_trait::async_trait;
use covenant_core::CommitAuthorship;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::content;
use crate::error::GitHubError;
use crate::repo::{PullRequestRef, RegistryLocation};
use crate::source::{CommitSource, RegistrySource};
use crate::types::{ApiErrorBody, ContentResponse, PullCommit};

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size for paginated listings; the API maximum.
const PER_PAGE: usize = 100;

const API_VERSION: &str = "2022-11-28";

/// Authenticated GitHub REST client.
pub struct GitHubClient {
    api_url: Url,
    client: Client,
}

impl GitHubClient {
    /// Create a client for `api_url` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::InvalidApiUrl`] if `api_url` is not an
    /// absolute http(s) URL, [`GitHubError::InvalidToken`] if the token
    /// cannot be sent as a header, and [`GitHubError::Transport`] if the
    /// HTTP client cannot be built.
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Result<Self, GitHubError> {
        let api_url = parse_api_url(api_url)?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| GitHubError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("covenant/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { api_url, client })
    }

    /// List every commit of a pull request, following pagination.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Transport`] or [`GitHubError::Api`] if any
    /// page cannot be fetched.
    pub async fn pull_request_commits(
        &self,
        pull_request: &PullRequestRef,
    ) -> Result<Vec<CommitAuthorship>, GitHubError> {
        let pages = collect_pages(|page| async move {
            let url = self.commits_url(pull_request, page);
            let batch: Vec<PullCommit> = self.get_json(url).await?;
            debug!(
                page,
                count = batch.len(),
                pull_request = %pull_request,
                "fetched commit page"
            );
            Ok(batch)
        })
        .await?;

        Ok(pages.into_iter().map(PullCommit::into_authorship).collect())
    }

    /// Fetch the raw bytes of a file at a git reference.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Transport`] or [`GitHubError::Api`] if the
    /// request fails, and the errors of [`content::decode_file`] if the
    /// response is not an inline base64 file.
    pub async fn file_contents(&self, location: &RegistryLocation) -> Result<Vec<u8>, GitHubError> {
        let response: ContentResponse = self.get_json(self.contents_url(location)).await?;
        let bytes = content::decode_file(response, &location.path)?;
        debug!(location = %location, size = bytes.len(), "fetched registry file");
        Ok(bytes)
    }

    fn commits_url(&self, pull_request: &PullRequestRef, page: u32) -> Url {
        let number = pull_request.number.to_string();
        let mut url = self.endpoint(&[
            "repos",
            &pull_request.repo.owner,
            &pull_request.repo.name,
            "pulls",
            &number,
            "commits",
        ]);
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string())
            .append_pair("page", &page.to_string());
        url
    }

    fn contents_url(&self, location: &RegistryLocation) -> Url {
        let mut segments = vec![
            "repos",
            location.repo.owner.as_str(),
            location.repo.name.as_str(),
            "contents",
        ];
        segments.extend(location.path.split('/').filter(|s| !s.is_empty()));

        let mut url = self.endpoint(&segments);
        url.query_pairs_mut().append_pair("ref", &location.reference);
        url
    }

    /// Build an endpoint URL below the API root.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        // The base URL was validated as hierarchical in `parse_api_url`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, GitHubError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(api_error(status, &url, &body))
    }
}

/// Fetch pages numbered from 1 until one comes back short of [`PER_PAGE`].
async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>, GitHubError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, GitHubError>>,
{
    let mut items = Vec::new();
    for page in 1.. {
        let batch = fetch(page).await?;
        let full = batch.len() >= PER_PAGE;
        items.extend(batch);
        if !full {
            break;
        }
    }
    Ok(items)
}

/// Map a non-success response to [`GitHubError::Api`], preferring the
/// `message` field of a JSON error body over the status text.
fn api_error(status: StatusCode, url: &Url, body: &[u8]) -> GitHubError {
    let body: ApiErrorBody = serde_json::from_slice(body).unwrap_or_default();
    GitHubError::Api {
        status: status.as_u16(),
        url: url.to_string(),
        message: body.message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        }),
    }
}

#[async_trait]
impl CommitSource for GitHubClient {
    async fn list_commits(
        &self,
        pull_request: &PullRequestRef,
    ) -> Result<Vec<CommitAuthorship>, GitHubError> {
        self.pull_request_commits(pull_request).await
    }
}

#[async_trait]
impl RegistrySource for GitHubClient {
    async fn fetch_registry(&self, location: &RegistryLocation) -> Result<Vec<u8>, GitHubError> {
        self.file_contents(location).await
    }
}

fn parse_api_url(raw: &str) -> Result<Url, GitHubError> {
    let url = Url::parse(raw.trim()).map_err(|_| GitHubError::InvalidApiUrl(raw.to_owned()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(GitHubError::InvalidApiUrl(raw.to_owned()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::RepoRef;

    fn client(api_url: &str) -> GitHubClient {
        GitHubClient::new(api_url, "ghp_test", Duration::from_secs(5)).expect("client")
    }

    #[test]
    fn endpoint_joins_segments() {
        let c = client(DEFAULT_API_URL);
        let url = c.endpoint(&["repos", "octo-org", "widgets", "pulls", "7", "commits"]);
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octo-org/widgets/pulls/7/commits"
        );
    }

    #[test]
    fn endpoint_keeps_enterprise_prefix() {
        for base in ["https://ghe.example.com/api/v3", "https://ghe.example.com/api/v3/"] {
            let url = client(base).endpoint(&["repos", "o", "r"]);
            assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/repos/o/r");
        }
    }

    #[test]
    fn endpoint_escapes_segments() {
        let url = client(DEFAULT_API_URL).endpoint(&["repos", "o", "r", "contents", "my file.yml"]);
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/o/r/contents/my%20file.yml"
        );
    }

    #[test]
    fn rejects_unusable_api_urls() {
        for bad in ["not a url", "mailto:someone@example.com", "ftp://example.com"] {
            let result = GitHubClient::new(bad, "t", Duration::from_secs(1));
            assert!(
                matches!(result, Err(GitHubError::InvalidApiUrl(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_token_with_newline() {
        let result = GitHubClient::new(DEFAULT_API_URL, "abc\ndef", Duration::from_secs(1));
        assert!(matches!(result, Err(GitHubError::InvalidToken)));
    }

    #[test]
    fn commits_url_requests_full_pages() {
        let pr = PullRequestRef {
            repo: RepoRef::new("octo-org", "widgets"),
            number: 7,
        };
        let url = client(DEFAULT_API_URL).commits_url(&pr, 3);
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octo-org/widgets/pulls/7/commits?per_page=100&page=3"
        );
    }

    #[test]
    fn contents_url_pins_registry_ref() {
        let location = RegistryLocation::resolve(
            &RepoRef::new("octo-org", "widgets"),
            None,
            None,
            ".github/contributors.yml",
        );
        let url = client(DEFAULT_API_URL).contents_url(&location);
        assert_eq!(url.path(), "/repos/octo-org/widgets/contents/.github/contributors.yml");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(query, [("ref".to_owned(), "refs/heads/main".to_owned())]);
    }

    /// Serve canned page sizes and record which pages were requested.
    async fn paginate(sizes: &[usize]) -> (Vec<usize>, Vec<u32>) {
        let mut requested = Vec::new();
        let items = collect_pages(|page| {
            requested.push(page);
            let size = sizes.get(page as usize - 1).copied().unwrap_or(0);
            async move { Ok::<_, GitHubError>(vec![page as usize; size]) }
        })
        .await
        .expect("pages");
        (items, requested)
    }

    #[tokio::test]
    async fn pagination_stops_on_empty_page() {
        let (items, requested) = paginate(&[100, 100, 0]).await;
        assert_eq!(items.len(), 200);
        assert_eq!(requested, [1, 2, 3]);
    }

    #[tokio::test]
    async fn pagination_stops_on_short_page() {
        let (items, requested) = paginate(&[100, 37, 100]).await;
        assert_eq!(items.len(), 137);
        assert_eq!(requested, [1, 2]);
        assert!(items[..100].iter().all(|&p| p == 1));
        assert!(items[100..].iter().all(|&p| p == 2));
    }

    #[tokio::test]
    async fn pagination_propagates_page_errors() {
        let err = collect_pages(|page| async move {
            if page == 2 {
                Err(api_error(
                    StatusCode::BAD_GATEWAY,
                    &Url::parse("https://api.github.com/x").expect("url"),
                    b"",
                ))
            } else {
                Ok(vec![0u8; PER_PAGE])
            }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, GitHubError::Api { status: 502, .. }), "{err:?}");
    }

    #[test]
    fn api_error_uses_message_from_body() {
        let url = Url::parse("https://api.github.com/repos/o/r/contents/cla.yml").expect("url");
        let err = api_error(
            StatusCode::NOT_FOUND,
            &url,
            br#"{"message": "Not Found", "documentation_url": "https://docs.github.com"}"#,
        );
        match err {
            GitHubError::Api {
                status,
                url: reported,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(reported, url.as_str());
                assert_eq!(message, "Not Found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn api_error_falls_back_to_status_text() {
        let url = Url::parse("https://api.github.com/x").expect("url");
        let err = api_error(StatusCode::BAD_GATEWAY, &url, b"<html>upstream down</html>");
        assert!(
            matches!(&err, GitHubError::Api { message, .. } if message == "Bad Gateway"),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn unreachable_api_is_a_transport_error() {
        // Port 9 (discard) is closed on test hosts; the connection is refused.
        let c = client("http://127.0.0.1:9");
        let pr = PullRequestRef {
            repo: RepoRef::new("o", "r"),
            number: 1,
        };
        let err = c.pull_request_commits(&pr).await.unwrap_err();
        assert!(matches!(err, GitHubError::Transport(_)), "{err:?}");
    }
}
