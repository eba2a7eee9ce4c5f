use std::future::Future;

use serde::{Deserialize, de::DeserializeOwned};

use crate::error::AppResult;

/// Remote catalog the importer pulls from.
pub trait CatalogSource {
    fn discover_movies(&self) -> impl Future<Output = AppResult<Vec<MovieSummary>>> + Send;

    fn movie_details(&self, id: i32) -> impl Future<Output = AppResult<MovieDetails>> + Send;

    fn movie_credits(&self, id: i32) -> impl Future<Output = AppResult<MovieCredits>> + Send;
}

pub struct TmdbClient {
    client: reqwest::Client,
    access_token: String,
    api_key: String,
    base_url: String,
    discover_page: u32,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        access_token: String,
        api_key: String,
        base_url: String,
        discover_page: u32,
    ) -> Self {
        if access_token.trim().is_empty() && api_key.trim().is_empty() {
            tracing::warn!("no TMDB_ACCESS_TOKEN or TMDB_API_KEY provided, requests will be rejected");
        }
        Self { client, access_token, api_key, base_url, discover_page }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> AppResult<T> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'));
        let mut req = self.client.get(url).query(query);
        if !self.access_token.trim().is_empty() {
            req = req.bearer_auth(&self.access_token);
        } else if !self.api_key.trim().is_empty() {
            req = req.query(&[("api_key", &self.api_key)]);
        }

        tracing::debug!(path, "tmdb request");
        Ok(req.send().await?.error_for_status()?.json().await?)
    }
}

impl CatalogSource for TmdbClient {
    async fn discover_movies(&self) -> AppResult<Vec<MovieSummary>> {
        let payload: DiscoverPayload =
            self.get_json("discover/movie", &[("page", self.discover_page.to_string())]).await?;
        Ok(payload.into_results())
    }

    async fn movie_details(&self, id: i32) -> AppResult<MovieDetails> {
        self.get_json(&format!("movie/{id}"), &[]).await
    }

    async fn movie_credits(&self, id: i32) -> AppResult<MovieCredits> {
        self.get_json(&format!("movie/{id}/credits"), &[]).await
    }
}

/// Discover listings arrive either wrapped in a page object or as a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DiscoverPayload {
    Page { results: Vec<MovieSummary> },
    Bare(Vec<MovieSummary>),
}

impl DiscoverPayload {
    pub fn into_results(self) -> Vec<MovieSummary> {
        match self {
            DiscoverPayload::Page { results } => results,
            DiscoverPayload::Bare(results) => results,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieSummary {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub adult: Option<bool>,
    pub video: Option<bool>,
    pub original_language: Option<String>,
    pub genre_ids: Option<Vec<i32>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieDetails {
    pub id: i32,
    pub genres: Option<Vec<GenreDto>>,
    pub revenue: Option<i64>,
}

impl MovieDetails {
    pub fn genres(&self) -> &[GenreDto] {
        self.genres.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct GenreDto {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieCredits {
    pub cast: Option<Vec<CastCredit>>,
}

impl MovieCredits {
    pub fn cast(&self) -> &[CastCredit] {
        self.cast.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CastCredit {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    pub original_name: Option<String>,
    pub gender: Option<i32>,
    pub known_for_department: Option<String>,
    pub popularity: Option<f64>,
    pub profile_path: Option<String>,
    pub adult: Option<bool>,
    pub character: Option<String>,
    pub credit_id: Option<String>,
    pub order: Option<i32>,
}
