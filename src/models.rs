use serde::{Deserialize, Serialize};

use crate::entities::{cast_member, genre, movie, movie_cast, movie_genre};

/// Query string of the movie listing endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListParams {
    pub year: Option<String>,
    pub genres: Option<String>,
    pub without_genres: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
    pub cast: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MovieListing {
    pub results: Vec<MovieWithRelations>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MovieWithRelations {
    #[serde(flatten)]
    pub movie: movie::Model,
    pub movie_genres: Vec<MovieGenreLink>,
    pub movie_cast: Vec<MovieCastLink>,
}

impl MovieWithRelations {
    pub fn genre_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.movie_genres.iter().map(|link| link.link.genre_id)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MovieGenreLink {
    #[serde(flatten)]
    pub link: movie_genre::Model,
    pub genre: genre::Model,
}

#[derive(Clone, Debug, Serialize)]
pub struct MovieCastLink {
    #[serde(flatten)]
    pub link: movie_cast::Model,
    pub cast: cast_member::Model,
}

/// Rows created by one importer run; rows already present are not counted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SeedReport {
    pub processed: usize,
    pub movies: usize,
    pub genres: usize,
    pub cast_members: usize,
    pub movie_genres: usize,
    pub movie_cast: usize,
}
