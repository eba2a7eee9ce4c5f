use jiff::civil::Date;
use sea_orm::{
    ColumnTrait, Condition, DatabaseBackend, Order,
    sea_query::{Expr, Query, SelectStatement, SimpleExpr, extension::postgres::PgBinOper},
};
use thiserror::Error;

use crate::{
    entities::{cast_member, movie, movie_cast, movie_genre},
    models::{ListParams, MovieWithRelations},
};

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid year {0:?}")]
    InvalidYear(String),

    #[error("invalid genre id {0:?}")]
    InvalidGenreId(String),
}

/// One conjunct of the listing predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum Clause {
    /// `release_date` within `[from, to]`, both inclusive.
    ReleasedBetween { from: Date, to: Date },
    /// At least one linked genre is in the set.
    GenreAny(Vec<i32>),
    /// No linked genre is in the set.
    GenreNone(Vec<i32>),
    TitleContains(String),
    /// At least one linked cast member's name contains the needle.
    CastNameContains(String),
}

impl Clause {
    fn is_text(&self) -> bool {
        matches!(self, Clause::TitleContains(_) | Clause::CastNameContains(_))
    }

    /// SQL form of the clause. Text clauses only have one on Postgres, whose
    /// ILIKE folds case beyond ASCII; elsewhere they are left to [`Clause::matches`].
    fn to_expr(&self, backend: DatabaseBackend) -> Option<SimpleExpr> {
        let expr = match self {
            Clause::ReleasedBetween { from, to } => {
                movie::Column::ReleaseDate.between(from.to_string(), to.to_string())
            },
            Clause::GenreAny(ids) => movie::Column::Id.in_subquery(movies_with_genres(ids)),
            Clause::GenreNone(ids) => movie::Column::Id.not_in_subquery(movies_with_genres(ids)),
            Clause::TitleContains(_) | Clause::CastNameContains(_)
                if backend != DatabaseBackend::Postgres =>
            {
                return None;
            },
            Clause::TitleContains(needle) => {
                ilike(Expr::col((movie::Entity, movie::Column::Title)), needle)
            },
            Clause::CastNameContains(needle) => {
                movie::Column::Id.in_subquery(movies_with_cast_named(needle))
            },
        };
        Some(expr)
    }

    /// In-memory form of the text clauses; every other clause holds trivially.
    pub fn matches(&self, movie: &MovieWithRelations) -> bool {
        match self {
            Clause::TitleContains(needle) => contains_ignore_case(&movie.movie.title, needle),
            Clause::CastNameContains(needle) => {
                movie.movie_cast.iter().any(|c| contains_ignore_case(&c.cast.name, needle))
            },
            _ => true,
        }
    }
}

/// Listing predicate assembled from the optional request parameters.
///
/// Genre inclusion and exclusion share a single slot: when both are
/// supplied, `without_genres` replaces `genres`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieFilter {
    pub released: Option<Clause>,
    pub genres: Option<Clause>,
    pub title: Option<Clause>,
    pub cast: Option<Clause>,
}

impl MovieFilter {
    pub fn from_params(params: &ListParams) -> Result<Self, FilterError> {
        let mut filter = Self::default();

        if let Some(year) = present(&params.year) {
            filter.released = Some(year_range(year)?);
        }

        if let Some(genres) = present(&params.genres) {
            filter.genres = Some(Clause::GenreAny(parse_genre_ids(genres)?));
        }

        if let Some(without) = present(&params.without_genres) {
            if filter.genres.is_some() {
                tracing::debug!(
                    genres = ?params.genres,
                    without_genres = without,
                    "without_genres overrides genres"
                );
            }
            filter.genres = Some(Clause::GenreNone(parse_genre_ids(without)?));
        }

        if let Some(search) = present(&params.search) {
            filter.title = Some(Clause::TitleContains(search.to_string()));
        }

        if let Some(cast) = present(&params.cast) {
            filter.cast = Some(Clause::CastNameContains(cast.to_string()));
        }

        Ok(filter)
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        [&self.released, &self.genres, &self.title, &self.cast].into_iter().flatten()
    }

    /// Conjunction of every clause the backend can evaluate; always true when none are.
    pub fn condition(&self, backend: DatabaseBackend) -> Condition {
        self.clauses()
            .filter_map(|clause| clause.to_expr(backend))
            .fold(Condition::all(), |cond, expr| cond.add(expr))
    }

    /// Text clauses [`MovieFilter::condition`] left out for this backend.
    pub fn retains(&self, backend: DatabaseBackend, movie: &MovieWithRelations) -> bool {
        backend == DatabaseBackend::Postgres
            || self.clauses().filter(|clause| clause.is_text()).all(|clause| clause.matches(movie))
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortField {
    #[default]
    Popularity,
    VoteAverage,
    VoteCount,
    ReleaseDate,
    Revenue,
    Title,
}

impl SortField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "popularity" => Some(SortField::Popularity),
            "vote_average" => Some(SortField::VoteAverage),
            "vote_count" => Some(SortField::VoteCount),
            "release_date" => Some(SortField::ReleaseDate),
            "revenue" => Some(SortField::Revenue),
            "title" => Some(SortField::Title),
            _ => None,
        }
    }

    pub fn column(self) -> movie::Column {
        match self {
            SortField::Popularity => movie::Column::Popularity,
            SortField::VoteAverage => movie::Column::VoteAverage,
            SortField::VoteCount => movie::Column::VoteCount,
            SortField::ReleaseDate => movie::Column::ReleaseDate,
            SortField::Revenue => movie::Column::Revenue,
            SortField::Title => movie::Column::Title,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Sort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for Sort {
    fn default() -> Self {
        Self { field: SortField::Popularity, descending: true }
    }
}

impl Sort {
    /// An unknown sort field discards the requested order as well.
    pub fn from_params(params: &ListParams) -> Self {
        let field = params.sort.as_deref().unwrap_or("popularity");
        let Some(field) = SortField::parse(field) else {
            return Self::default();
        };
        Self { field, descending: params.order.as_deref() != Some("asc") }
    }

    pub fn order(self) -> Order {
        if self.descending { Order::Desc } else { Order::Asc }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn year_range(raw: &str) -> Result<Clause, FilterError> {
    let invalid = || FilterError::InvalidYear(raw.to_string());
    let year: i16 = raw.trim().parse().map_err(|_| invalid())?;
    let from = Date::new(year, 1, 1).map_err(|_| invalid())?;
    let to = Date::new(year, 12, 31).map_err(|_| invalid())?;
    Ok(Clause::ReleasedBetween { from, to })
}

/// Empty items (`18,`) are skipped.
fn parse_genre_ids(raw: &str) -> Result<Vec<i32>, FilterError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse().map_err(|_| FilterError::InvalidGenreId(part.to_string())))
        .collect()
}

fn movies_with_genres(ids: &[i32]) -> SelectStatement {
    Query::select()
        .column(movie_genre::Column::MovieId)
        .from(movie_genre::Entity)
        .and_where(movie_genre::Column::GenreId.is_in(ids.iter().copied()))
        .to_owned()
}

fn movies_with_cast_named(needle: &str) -> SelectStatement {
    Query::select()
        .column((movie_cast::Entity, movie_cast::Column::MovieId))
        .from(movie_cast::Entity)
        .inner_join(
            cast_member::Entity,
            Expr::col((cast_member::Entity, cast_member::Column::Id))
                .equals((movie_cast::Entity, movie_cast::Column::CastId)),
        )
        .and_where(ilike(Expr::col((cast_member::Entity, cast_member::Column::Name)), needle))
        .to_owned()
}

/// Postgres' default LIKE escape character.
const LIKE_ESCAPE: char = '\\';

/// `col ILIKE '%needle%'` with the needle's wildcards taken literally.
fn ilike(col: Expr, needle: &str) -> SimpleExpr {
    col.binary(PgBinOper::ILike, like_pattern(needle))
}

fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
