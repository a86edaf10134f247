//! # texcite GitHub
//!
//! Reads LaTeX sources from a GitHub repository through the contents API
//! (`/repos/{owner}/{repo}/contents/{path}?ref={ref}`).

use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use reqwest::{header, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use texcite_core::config::{GithubSettings, TexciteConfig};
use texcite_core::{FetchError, FileFetcher, RepoRef};

/// User agent sent with every request; GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("texcite/", env!("CARGO_PKG_VERSION"));

/// GitHub file fetcher bound to one repository.
#[derive(Clone)]
pub struct GitHubFetcher {
    base_url: String,
    owner: String,
    repo: String,
    token: Option<String>,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ContentsResponse {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

impl GitHubFetcher {
    /// Create a fetcher for `owner/repo` against the given API URL.
    pub fn new(base_url: &str, owner: &str, repo: &str, token: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token,
            client,
        }
    }

    /// Create a fetcher from GitHub settings and a repository reference.
    pub fn from_settings(settings: &GithubSettings, repo: &RepoRef) -> Self {
        Self::new(
            &settings.api_url,
            &repo.owner,
            &repo.name,
            settings.token(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// Create a fetcher for the repository configured in `texcite.toml`.
    pub fn from_config(config: &TexciteConfig) -> anyhow::Result<Self> {
        let repo = config
            .repository
            .as_ref()
            .context("No [repository] section in configuration")?;
        Ok(Self::from_settings(&config.github, repo))
    }

    /// Contents API URL for a file at a ref. Path segments are percent-encoded.
    pub fn contents_url(&self, git_ref: &str, path: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::Transport(format!("invalid API URL {}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("invalid API URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"])
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        url.query_pairs_mut().append_pair("ref", git_ref);

        Ok(url)
    }

    /// Check that the repository is reachable with the configured credentials.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/repos/{}/{}", self.base_url, self.owner, self.repo);
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        matches!(request.send().await, Ok(resp) if resp.status().is_success())
    }
}

/// Decode a contents API payload into file text.
fn decode_contents(path: &str, body: ContentsResponse) -> Result<String, FetchError> {
    if body.kind != "file" {
        return Err(FetchError::Decode(format!("{} is a {}, not a file", path, body.kind)));
    }
    if body.encoding.as_deref() != Some("base64") {
        return Err(FetchError::Decode(format!(
            "{}: unsupported encoding {:?}",
            path, body.encoding
        )));
    }

    let content = body.content.unwrap_or_default();
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| FetchError::Decode(format!("{}: {}", path, e)))?;

    String::from_utf8(bytes).map_err(|e| FetchError::Decode(format!("{}: {}", path, e)))
}

#[async_trait]
impl FileFetcher for GitHubFetcher {
    async fn fetch(&self, git_ref: &str, path: &str) -> Result<String, FetchError> {
        if path.split('/').any(|segment| segment == "..") {
            return Err(FetchError::InvalidPath(path.to_string()));
        }
        let url = self.contents_url(git_ref, path)?;
        debug!(%url, "Fetching file from GitHub");

        let mut request = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: ContentsResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(format!("{}: {}", path, e)))?;

        decode_contents(path, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode as AxumStatus, routing::get, Json, Router};
    use std::collections::HashMap;

    fn fetcher(base_url: &str) -> GitHubFetcher {
        GitHubFetcher::new(base_url, "ada", "thesis", None, Duration::from_secs(5))
    }

    #[test]
    fn test_contents_url() {
        let url = fetcher("https://api.github.com/")
            .contents_url("draft", "chapters/my intro.tex")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/ada/thesis/contents/chapters/my%20intro.tex?ref=draft"
        );
    }

    #[test]
    fn test_contents_url_with_enterprise_prefix() {
        let url = fetcher("https://ghe.example.com/api/v3")
            .contents_url("main", "main.tex")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/ada/thesis/contents/main.tex?ref=main"
        );
    }

    #[test]
    fn test_decode_wrapped_base64() {
        let body = ContentsResponse {
            kind: "file".to_string(),
            encoding: Some("base64".to_string()),
            // "\section{Intro}" split across lines as GitHub does.
            content: Some("XHNlY3Rp\nb257SW50\ncm99\n".to_string()),
        };
        assert_eq!(decode_contents("main.tex", body).unwrap(), "\\section{Intro}");
    }

    #[test]
    fn test_decode_rejects_directories() {
        let body = ContentsResponse {
            kind: "dir".to_string(),
            encoding: None,
            content: None,
        };
        assert!(matches!(decode_contents("chapters", body), Err(FetchError::Decode(_))));
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_against_mock_api() {
        let app = Router::new()
            .route(
                "/repos/ada/thesis/contents/main.tex",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    assert_eq!(params.get("ref").map(String::as_str), Some("draft"));
                    Json(serde_json::json!({
                        "type": "file",
                        "encoding": "base64",
                        "content": "XGNpdGV7a30="
                    }))
                }),
            )
            .route(
                "/repos/ada/thesis/contents/private.tex",
                get(|| async { (AxumStatus::FORBIDDEN, "rate limited") }),
            )
            .route(
                "/repos/ada/thesis",
                get(|| async { Json(serde_json::json!({ "full_name": "ada/thesis" })) }),
            );
        let base = serve(app).await;
        let fetcher = fetcher(&base);

        assert_eq!(fetcher.fetch("draft", "main.tex").await.unwrap(), "\\cite{k}");
        assert!(matches!(
            fetcher.fetch("draft", "missing.tex").await,
            Err(FetchError::NotFound(_))
        ));
        assert!(matches!(
            fetcher.fetch("draft", "private.tex").await,
            Err(FetchError::Http { status: 403, .. })
        ));
        assert!(matches!(
            fetcher.fetch("draft", "../escape.tex").await,
            Err(FetchError::InvalidPath(_))
        ));

        assert!(fetcher.health_check().await);
        let other = GitHubFetcher::new(&base, "ada", "missing", None, Duration::from_secs(5));
        assert!(!other.health_check().await);
    }
}
