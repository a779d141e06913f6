//! Fetch documents from an HTTP origin

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::Fetcher;
use crate::error::FetchError;

/// Resolves site-relative paths against an origin URL
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
    origin: Url,
}

impl HttpFetcher {
    pub fn new(origin: &str) -> anyhow::Result<Self> {
        let mut origin = Url::parse(origin)?;
        // Url::join drops the last segment unless the base ends with a slash
        if !origin.path().ends_with('/') {
            let path = format!("{}/", origin.path());
            origin.set_path(&path);
        }
        let http = Client::builder()
            .user_agent(concat!("codenour/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, origin })
    }

    /// Absolute URL for a site-relative path
    pub fn url_for(&self, path: &str) -> Result<Url, FetchError> {
        self.origin
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::Transport {
                path: path.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url_for(path)?;
        tracing::debug!("GET {}", url);

        let transport = |e: reqwest::Error| FetchError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        };

        let response = self.http.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_joins_below_origin() {
        let fetcher = HttpFetcher::new("http://localhost:8000/site").unwrap();
        assert_eq!(
            fetcher.url_for("games/index.json").unwrap().as_str(),
            "http://localhost:8000/site/games/index.json"
        );
        assert_eq!(
            fetcher.url_for("/news/a.md").unwrap().as_str(),
            "http://localhost:8000/site/news/a.md"
        );
    }

    #[test]
    fn test_rejects_bad_origin() {
        assert!(HttpFetcher::new("not a url").is_err());
    }
}
