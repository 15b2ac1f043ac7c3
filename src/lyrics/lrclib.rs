use super::{scrape, LyricsError, LyricsProvider};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MAX_RETRIES: u8 = 2;
const RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LyricsConfig {
    pub api_base: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            api_base: "https://lrclib.net/api".to_string(),
            user_agent: concat!("glyphix/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LrclibResponse {
    #[serde(rename = "syncedLyrics")]
    pub synced_lyrics: Option<String>,
    #[serde(rename = "plainLyrics")]
    pub plain_lyrics: Option<String>,
    #[serde(default)]
    pub instrumental: bool,
}

impl LrclibResponse {
    /// Plain lyrics win over synced ones; instrumentals get a placeholder.
    fn into_text(self) -> Option<String> {
        if self.instrumental {
            return Some("Instrumental".to_string());
        }
        self.plain_lyrics
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.synced_lyrics.filter(|t| !t.trim().is_empty()))
    }
}

/// lrclib.net for lookups, plain GET for lyrics pages.
pub struct LrclibClient {
    client: Client,
    api_base: String,
}

impl LrclibClient {
    pub fn new(config: &LyricsConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Send a GET, retrying transport failures. HTTP error statuses are returned as-is.
    async fn get_with_retry(&self, url: &str, query: &[(&str, &str)]) -> Result<Response, reqwest::Error> {
        let mut attempt = 0;
        loop {
            match self.client.get(url).query(query).send().await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    if attempt > MAX_RETRIES {
                        return Err(e);
                    }
                    tracing::debug!(url, attempt, error = %e, "lyrics request failed, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }

    async fn get_exact(&self, title: &str, artist: &str) -> Result<Option<String>, LyricsError> {
        let url = format!("{}/get", self.api_base);
        let resp = self
            .get_with_retry(&url, &[("artist_name", artist), ("track_name", title)])
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let data: LrclibResponse = resp.error_for_status()?.json().await?;
        Ok(data.into_text())
    }

    async fn search_any(&self, title: &str, artist: Option<&str>) -> Result<Option<String>, LyricsError> {
        let url = format!("{}/search", self.api_base);
        let mut query = vec![("track_name", title)];
        if let Some(artist) = artist {
            query.push(("artist_name", artist));
        }
        let results: Vec<LrclibResponse> = self
            .get_with_retry(&url, &query)
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(results.into_iter().find_map(LrclibResponse::into_text))
    }

    async fn lookup(&self, title: &str, artist: Option<&str>) -> Result<String, LyricsError> {
        if let Some(artist) = artist {
            if let Some(text) = self.get_exact(title, artist).await? {
                return Ok(text);
            }
        }
        self.search_any(title, artist).await?.ok_or(LyricsError::NotFound)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, LyricsError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(LyricsError::InvalidUrl(url.to_string()));
        }
        let page = self
            .get_with_retry(url, &[])
            .await?
            .error_for_status()?
            .text()
            .await?;
        scrape::extract_lyrics(&page)
    }
}

impl LyricsProvider for LrclibClient {
    fn search<'a>(
        &'a self,
        title: &'a str,
        artist: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, LyricsError>> {
        self.lookup(title, artist).boxed()
    }

    fn scrape<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, LyricsError>> {
        self.fetch_page(url).boxed()
    }
}
