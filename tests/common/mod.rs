#![allow(dead_code)]

use std::collections::HashMap;

use cinedex::{
    db,
    entities::{cast_member, genre, movie, movie_cast},
    error::AppResult,
    store::MovieStore,
    tmdb::{CatalogSource, DiscoverPayload, MovieCredits, MovieDetails, MovieSummary},
};
use sea_orm::ConnectOptions;
use serde_json::Value;

pub async fn memory_store() -> MovieStore {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    MovieStore::new(db::connect_and_migrate(opts).await.unwrap())
}

pub fn movie(id: i32, title: &str, release_date: &str, popularity: f64, revenue: i64) -> movie::Model {
    movie::Model {
        id,
        title: title.to_string(),
        original_title: Some(title.to_string()),
        overview: None,
        release_date: Some(release_date.to_string()),
        popularity: Some(popularity),
        vote_average: Some(popularity / 10.0),
        vote_count: Some(id * 100),
        revenue: Some(revenue),
        poster_path: None,
        backdrop_path: None,
        adult: Some(false),
        video: Some(false),
        original_language: Some("en".to_string()),
        genre_ids: Some(movie::GenreIds(Vec::new())),
    }
}

pub fn cast(id: i32, name: &str) -> cast_member::Model {
    cast_member::Model {
        id,
        name: name.to_string(),
        original_name: Some(name.to_string()),
        gender: Some(2),
        known_for_department: Some("Acting".to_string()),
        popularity: Some(10.0),
        profile_path: None,
        adult: Some(false),
    }
}

/// Five movies:
///
/// | id | title        | released   | popularity | genres      | cast                     |
/// |----|--------------|------------|------------|-------------|--------------------------|
/// | 1  | The Matrix   | 1999-03-31 | 80         | 28, 878     | Keanu Reeves             |
/// | 2  | Fight Club   | 1999-12-31 | 60         | 18          | Brad Pitt                |
/// | 3  | Cast Away    | 2000-01-01 | 50         | 12, 18      | Tom Hanks                |
/// | 4  | Forrest Gump | 1994-07-06 | 90         | 35, 18      | Tom Hanks, Robin Wright  |
/// | 5  | 100% Wolf    | 2020-06-25 | 10         |             |                          |
pub async fn seeded_store() -> MovieStore {
    let store = memory_store().await;

    for (id, name) in
        [(12, "Adventure"), (18, "Drama"), (28, "Action"), (35, "Comedy"), (878, "Science Fiction")]
    {
        store.upsert_genre(genre::Model { id, name: name.to_string() }).await.unwrap();
    }

    let movies = [
        movie(1, "The Matrix", "1999-03-31", 80.0, 467_000_000),
        movie(2, "Fight Club", "1999-12-31", 60.0, 100_000_000),
        movie(3, "Cast Away", "2000-01-01", 50.0, 429_000_000),
        movie(4, "Forrest Gump", "1994-07-06", 90.0, 678_000_000),
        movie(5, "100% Wolf", "2020-06-25", 10.0, 5_000_000),
    ];
    for m in movies {
        store.upsert_movie(m).await.unwrap();
    }

    for (movie_id, genre_id) in [(1, 28), (1, 878), (2, 18), (3, 12), (3, 18), (4, 35), (4, 18)] {
        store.upsert_movie_genre(movie_id, genre_id).await.unwrap();
    }

    for member in [cast(6384, "Keanu Reeves"), cast(287, "Brad Pitt"), cast(31, "Tom Hanks"), cast(32, "Robin Wright")] {
        store.upsert_cast_member(member).await.unwrap();
    }

    let links = [(1, 6384, 0, "Neo"), (2, 287, 1, "Tyler Durden"), (3, 31, 0, "Chuck Noland"), (4, 32, 1, "Jenny Curran"), (4, 31, 0, "Forrest Gump")];
    for (movie_id, cast_id, order, character) in links {
        store
            .upsert_movie_cast(movie_cast::Model {
                movie_id,
                cast_id,
                cast_order: Some(order),
                character: Some(character.to_string()),
                credit_id: Some(format!("credit-{movie_id}-{cast_id}")),
            })
            .await
            .unwrap();
    }

    store
}

/// In-memory catalog keyed by movie id.
#[derive(Default)]
pub struct FakeCatalog {
    pub discover: Vec<MovieSummary>,
    pub details: HashMap<i32, MovieDetails>,
    pub credits: HashMap<i32, MovieCredits>,
}

impl FakeCatalog {
    /// Builds the catalog from raw API-shaped JSON.
    pub fn from_json(discover: Value, details: Value, credits: Value) -> Self {
        let discover = serde_json::from_value::<DiscoverPayload>(discover).unwrap().into_results();
        let details: Vec<MovieDetails> = serde_json::from_value(details).unwrap();
        let credits: Vec<(i32, MovieCredits)> = serde_json::from_value::<Vec<Value>>(credits)
            .unwrap()
            .into_iter()
            .map(|v| (v["id"].as_i64().unwrap() as i32, serde_json::from_value(v).unwrap()))
            .collect();
        Self {
            discover,
            details: details.into_iter().map(|d| (d.id, d)).collect(),
            credits: credits.into_iter().collect(),
        }
    }
}

impl CatalogSource for FakeCatalog {
    async fn discover_movies(&self) -> AppResult<Vec<MovieSummary>> {
        Ok(self.discover.clone())
    }

    async fn movie_details(&self, id: i32) -> AppResult<MovieDetails> {
        self.details.get(&id).cloned().ok_or_else(|| anyhow::anyhow!("404 movie/{id}").into())
    }

    async fn movie_credits(&self, id: i32) -> AppResult<MovieCredits> {
        self.credits.get(&id).cloned().ok_or_else(|| anyhow::anyhow!("404 movie/{id}/credits").into())
    }
}
