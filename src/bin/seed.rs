use std::process::ExitCode;

use cinedex::{config::Config, db, seed, store::MovieStore, tmdb::TmdbClient};

#[tokio::main]
async fn main() -> ExitCode {
    cinedex::init_tracing();

    match import().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "seeding failed");
            ExitCode::FAILURE
        },
    }
}

async fn import() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let http = reqwest::Client::builder().user_agent("cinedex/0.1").build()?;
    let tmdb = TmdbClient::new(
        http,
        config.tmdb_access_token.clone(),
        config.tmdb_api_key.clone(),
        config.tmdb_base_url.clone(),
        config.seed_discover_page,
    );

    let store = MovieStore::new(db::connect_and_migrate(config.database_url.as_str()).await?);

    tracing::info!(page = config.seed_discover_page, "seeding database from TMDB");
    let result = seed::run(&store, &tmdb).await;

    if let Err(err) = store.close().await {
        tracing::warn!(error = %err, "failed to close database connection");
    }

    let report = result?;
    tracing::info!(
        processed = report.processed,
        movies = report.movies,
        genres = report.genres,
        cast_members = report.cast_members,
        movie_genres = report.movie_genres,
        movie_cast = report.movie_cast,
        "seeding complete"
    );
    Ok(())
}
