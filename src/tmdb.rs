use async_trait::async_trait;
use serde::Deserialize;

use crate::media::{ApiError, MovieDetails, MovieId, MovieSummary};
use crate::settings::AppSettings;

fn url_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                result.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    result
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieListResponse {
    pub results: Vec<MovieSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideosResponse {
    pub results: Vec<MovieVideo>,
}

#[derive(Deserialize)]
struct StatusBody {
    status_message: Option<String>,
}

/// Remote movie catalog. `TmdbClient` is the production implementation;
/// tests substitute in-memory fakes.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Unfiltered listing ordered by descending popularity.
    async fn discover(&self, page: u32) -> Result<Vec<MovieSummary>, ApiError>;
    /// Free-text search, ordered by relevance. Always page 1.
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, ApiError>;
    async fn details(&self, id: MovieId) -> Result<MovieDetails, ApiError>;
    async fn videos(&self, id: MovieId) -> Result<Vec<MovieVideo>, ApiError>;
}

#[derive(Clone)]
pub struct TmdbClient {
    api_token: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(api_token: String, base_url: String) -> Self {
        Self {
            api_token,
            base_url,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(settings.tmdb_api_token.clone(), settings.tmdb_base_url.clone())
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn fetch_response(&self, url: &str) -> Result<reqwest::Response, ApiError> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status < 400 {
            return Ok(response);
        }

        // A server-provided message is surfaced to the user verbatim.
        if let Ok(body) = response.json::<StatusBody>().await {
            if let Some(message) = body.status_message {
                return Err(ApiError::Api { message });
            }
        }
        Err(match status {
            401 => ApiError::Unauthorized,
            429 => ApiError::RateLimit,
            s => ApiError::Network(format!("HTTP error: {}", s)),
        })
    }

    async fn fetch_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ApiError> {
        self.fetch_response(url)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn discover(&self, page: u32) -> Result<Vec<MovieSummary>, ApiError> {
        let url = self.build_url(&format!(
            "/discover/movie?sort_by=popularity.desc&page={}",
            page
        ));
        let response: MovieListResponse = self.fetch_json(&url).await?;
        Ok(response.results)
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, ApiError> {
        let url = self.build_url(&format!("/search/movie?query={}", url_encode(query)));
        let response: MovieListResponse = self.fetch_json(&url).await?;
        Ok(response.results)
    }

    async fn details(&self, id: MovieId) -> Result<MovieDetails, ApiError> {
        self.fetch_json(&self.build_url(&format!("/movie/{}", id)))
            .await
    }

    async fn videos(&self, id: MovieId) -> Result<Vec<MovieVideo>, ApiError> {
        let url = self.build_url(&format!("/movie/{}/videos", id));
        let response: VideosResponse = self.fetch_json(&url).await?;
        Ok(response.results)
    }
}
