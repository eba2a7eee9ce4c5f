use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::{
    AppState,
    error::AppResult,
    filter::{MovieFilter, Sort},
    models::{ListParams, MovieListing},
};

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<MovieListing>> {
    let Query(params) = params?;
    let filter = MovieFilter::from_params(&params)?;
    let sort = Sort::from_params(&params);

    let results = state.store.list_movies(&filter, sort).await?;
    tracing::debug!(
        clauses = filter.clauses().count(),
        sort = ?sort.field,
        descending = sort.descending,
        results = results.len(),
        "movies listed"
    );

    Ok(Json(MovieListing { results }))
}
