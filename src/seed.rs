use tracing::{debug, info};

use crate::{
    entities::{cast_member, genre, movie, movie_cast},
    error::AppResult,
    models::SeedReport,
    store::MovieStore,
    tmdb::{CastCredit, CatalogSource, MovieDetails, MovieSummary},
};

/// Imports one discover page into the store, one movie at a time.
///
/// Every write is insert-if-absent, so re-running against the same catalog
/// creates nothing new. The first failing fetch or write aborts the run.
pub async fn run<S: CatalogSource>(store: &MovieStore, source: &S) -> AppResult<SeedReport> {
    let summaries = source.discover_movies().await?;
    info!(movies = summaries.len(), "discover page fetched");

    let mut report = SeedReport::default();
    for summary in summaries {
        let details = source.movie_details(summary.id).await?;
        let credits = source.movie_credits(summary.id).await?;

        for genre in details.genres() {
            let model = genre::Model { id: genre.id, name: genre.name.clone() };
            report.genres += usize::from(store.upsert_genre(model).await?);
        }

        let movie_id = summary.id;
        let title = summary.title.clone();
        report.movies += usize::from(store.upsert_movie(movie_row(summary, &details)).await?);

        for genre in details.genres() {
            report.movie_genres += usize::from(store.upsert_movie_genre(movie_id, genre.id).await?);
        }

        for credit in credits.cast() {
            report.cast_members += usize::from(store.upsert_cast_member(cast_member_row(credit)).await?);
            report.movie_cast += usize::from(store.upsert_movie_cast(movie_cast_row(movie_id, credit)).await?);
        }

        report.processed += 1;
        debug!(
            movie_id,
            genres = details.genres().len(),
            cast = credits.cast().len(),
            "movie imported"
        );
        info!(movie_id, %title, "imported");
    }

    Ok(report)
}

/// Builds the movie row from the summary, taking genre ids from the detail
/// record only when the summary has none.
fn movie_row(summary: MovieSummary, details: &MovieDetails) -> movie::Model {
    let genre_ids = summary
        .genre_ids
        .or_else(|| details.genres.as_ref().map(|g| g.iter().map(|g| g.id).collect()))
        .unwrap_or_default();

    movie::Model {
        id: summary.id,
        title: summary.title,
        original_title: summary.original_title,
        overview: summary.overview,
        release_date: summary.release_date,
        popularity: summary.popularity,
        vote_average: summary.vote_average,
        vote_count: summary.vote_count,
        revenue: details.revenue,
        poster_path: summary.poster_path,
        backdrop_path: summary.backdrop_path,
        adult: summary.adult,
        video: summary.video,
        original_language: summary.original_language,
        genre_ids: Some(movie::GenreIds(genre_ids)),
    }
}

fn cast_member_row(credit: &CastCredit) -> cast_member::Model {
    cast_member::Model {
        id: credit.id,
        name: credit.name.clone(),
        original_name: credit.original_name.clone(),
        gender: credit.gender,
        known_for_department: credit.known_for_department.clone(),
        popularity: credit.popularity,
        profile_path: credit.profile_path.clone(),
        adult: credit.adult,
    }
}

fn movie_cast_row(movie_id: i32, credit: &CastCredit) -> movie_cast::Model {
    movie_cast::Model {
        movie_id,
        cast_id: credit.id,
        cast_order: credit.order,
        character: credit.character.clone(),
        credit_id: credit.credit_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::GenreDto;

    fn details_with_genres(ids: &[i32]) -> MovieDetails {
        MovieDetails {
            id: 5,
            genres: Some(ids.iter().map(|&id| GenreDto { id, name: format!("g{id}") }).collect()),
            revenue: Some(1_000),
        }
    }

    #[test]
    fn summary_genre_ids_win_over_details() {
        let summary = MovieSummary { id: 5, genre_ids: Some(vec![18]), ..Default::default() };
        let row = movie_row(summary, &details_with_genres(&[1, 2]));
        assert_eq!(row.genre_ids, Some(movie::GenreIds(vec![18])));
    }

    #[test]
    fn detail_genres_fill_missing_summary_ids() {
        let summary = MovieSummary { id: 5, ..Default::default() };
        let row = movie_row(summary, &details_with_genres(&[1, 2]));
        assert_eq!(row.genre_ids, Some(movie::GenreIds(vec![1, 2])));
        assert_eq!(row.revenue, Some(1_000));
    }

    #[test]
    fn no_genre_source_stores_empty_list() {
        let summary = MovieSummary { id: 5, ..Default::default() };
        let row = movie_row(summary, &MovieDetails { id: 5, ..Default::default() });
        assert_eq!(row.genre_ids, Some(movie::GenreIds(Vec::new())));
    }

    #[test]
    fn empty_summary_list_is_kept() {
        let summary = MovieSummary { id: 5, genre_ids: Some(Vec::new()), ..Default::default() };
        let row = movie_row(summary, &details_with_genres(&[1]));
        assert_eq!(row.genre_ids, Some(movie::GenreIds(Vec::new())));
    }

    #[test]
    fn cast_participation_fields_go_to_join_row() {
        let credit = CastCredit {
            id: 31,
            name: "Tom Hanks".into(),
            character: Some("Forrest Gump".into()),
            credit_id: Some("52fe".into()),
            order: Some(0),
            ..Default::default()
        };
        let member = cast_member_row(&credit);
        let link = movie_cast_row(13, &credit);
        assert_eq!(member.id, 31);
        assert_eq!(member.name, "Tom Hanks");
        assert_eq!(link.movie_id, 13);
        assert_eq!(link.cast_id, 31);
        assert_eq!(link.cast_order, Some(0));
        assert_eq!(link.character.as_deref(), Some("Forrest Gump"));
    }
}
