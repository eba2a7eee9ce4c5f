use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};

use crate::{
    entities::{cast_member, genre, movie, movie_cast, movie_genre},
    error::AppResult,
    filter::{MovieFilter, Sort},
    models::{MovieCastLink, MovieGenreLink, MovieWithRelations},
};

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn close(self) -> AppResult<()> {
        self.db.close().await?;
        Ok(())
    }

    pub async fn list_movies(
        &self,
        filter: &MovieFilter,
        sort: Sort,
    ) -> AppResult<Vec<MovieWithRelations>> {
        let backend = self.db.get_database_backend();
        let movies = movie::Entity::find()
            .filter(filter.condition(backend))
            .order_by(sort.field.column(), sort.order())
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;

        if movies.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = movies.iter().map(|m| m.id).collect();

        let mut genres: HashMap<i32, Vec<MovieGenreLink>> = HashMap::new();
        for (link, genre) in movie_genre::Entity::find()
            .find_also_related(genre::Entity)
            .filter(movie_genre::Column::MovieId.is_in(ids.clone()))
            .order_by_asc(movie_genre::Column::GenreId)
            .all(&self.db)
            .await?
        {
            let Some(genre) = genre else {
                continue;
            };
            genres.entry(link.movie_id).or_default().push(MovieGenreLink { link, genre });
        }

        let mut cast: HashMap<i32, Vec<MovieCastLink>> = HashMap::new();
        for (link, member) in movie_cast::Entity::find()
            .find_also_related(cast_member::Entity)
            .filter(movie_cast::Column::MovieId.is_in(ids))
            .order_by_asc(movie_cast::Column::CastOrder)
            .order_by_asc(movie_cast::Column::CastId)
            .all(&self.db)
            .await?
        {
            let Some(member) = member else {
                continue;
            };
            cast.entry(link.movie_id).or_default().push(MovieCastLink { link, cast: member });
        }

        Ok(movies
            .into_iter()
            .map(|movie| MovieWithRelations {
                movie_genres: genres.remove(&movie.id).unwrap_or_default(),
                movie_cast: cast.remove(&movie.id).unwrap_or_default(),
                movie,
            })
            .filter(|movie| filter.retains(backend, movie))
            .collect())
    }

    /// Inserts the genre unless its id already exists. Returns whether a row was created.
    pub async fn upsert_genre(&self, model: genre::Model) -> AppResult<bool> {
        let active = genre::ActiveModel { id: Set(model.id), name: Set(model.name) };
        let rows = genre::Entity::insert(active)
            .on_conflict(OnConflict::column(genre::Column::Id).do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await?;
        Ok(rows > 0)
    }

    pub async fn upsert_movie(&self, model: movie::Model) -> AppResult<bool> {
        let active = movie::ActiveModel {
            id: Set(model.id),
            title: Set(model.title),
            original_title: Set(model.original_title),
            overview: Set(model.overview),
            release_date: Set(model.release_date),
            popularity: Set(model.popularity),
            vote_average: Set(model.vote_average),
            vote_count: Set(model.vote_count),
            revenue: Set(model.revenue),
            poster_path: Set(model.poster_path),
            backdrop_path: Set(model.backdrop_path),
            adult: Set(model.adult),
            video: Set(model.video),
            original_language: Set(model.original_language),
            genre_ids: Set(model.genre_ids),
        };
        let rows = movie::Entity::insert(active)
            .on_conflict(OnConflict::column(movie::Column::Id).do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await?;
        Ok(rows > 0)
    }

    pub async fn upsert_movie_genre(&self, movie_id: i32, genre_id: i32) -> AppResult<bool> {
        let active = movie_genre::ActiveModel { movie_id: Set(movie_id), genre_id: Set(genre_id) };
        let rows = movie_genre::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([movie_genre::Column::MovieId, movie_genre::Column::GenreId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(rows > 0)
    }

    pub async fn upsert_cast_member(&self, model: cast_member::Model) -> AppResult<bool> {
        let active = cast_member::ActiveModel {
            id: Set(model.id),
            name: Set(model.name),
            original_name: Set(model.original_name),
            gender: Set(model.gender),
            known_for_department: Set(model.known_for_department),
            popularity: Set(model.popularity),
            profile_path: Set(model.profile_path),
            adult: Set(model.adult),
        };
        let rows = cast_member::Entity::insert(active)
            .on_conflict(OnConflict::column(cast_member::Column::Id).do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await?;
        Ok(rows > 0)
    }

    pub async fn upsert_movie_cast(&self, model: movie_cast::Model) -> AppResult<bool> {
        let active = movie_cast::ActiveModel {
            movie_id: Set(model.movie_id),
            cast_id: Set(model.cast_id),
            cast_order: Set(model.cast_order),
            character: Set(model.character),
            credit_id: Set(model.credit_id),
        };
        let rows = movie_cast::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([movie_cast::Column::MovieId, movie_cast::Column::CastId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(rows > 0)
    }
}
