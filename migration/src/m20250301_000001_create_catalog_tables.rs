use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(integer(Movies::Id).primary_key())
                    .col(string(Movies::Title))
                    .col(string_null(Movies::OriginalTitle))
                    .col(text_null(Movies::Overview))
                    .col(string_null(Movies::ReleaseDate))
                    .col(double_null(Movies::Popularity))
                    .col(double_null(Movies::VoteAverage))
                    .col(integer_null(Movies::VoteCount))
                    .col(big_integer_null(Movies::Revenue))
                    .col(string_null(Movies::PosterPath))
                    .col(string_null(Movies::BackdropPath))
                    .col(boolean_null(Movies::Adult))
                    .col(boolean_null(Movies::Video))
                    .col(string_null(Movies::OriginalLanguage))
                    .col(json_null(Movies::GenreIds))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_release_date")
                    .table(Movies::Table)
                    .col(Movies::ReleaseDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_popularity")
                    .table(Movies::Table)
                    .col(Movies::Popularity)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(integer(Genres::Id).primary_key())
                    .col(string(Genres::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CastMembers::Table)
                    .if_not_exists()
                    .col(integer(CastMembers::Id).primary_key())
                    .col(string(CastMembers::Name))
                    .col(string_null(CastMembers::OriginalName))
                    .col(integer_null(CastMembers::Gender))
                    .col(string_null(CastMembers::KnownForDepartment))
                    .col(double_null(CastMembers::Popularity))
                    .col(string_null(CastMembers::ProfilePath))
                    .col(boolean_null(CastMembers::Adult))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieGenres::Table)
                    .if_not_exists()
                    .col(integer(MovieGenres::MovieId))
                    .col(integer(MovieGenres::GenreId))
                    .primary_key(Index::create().col(MovieGenres::MovieId).col(MovieGenres::GenreId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genres_movie")
                            .from(MovieGenres::Table, MovieGenres::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genres_genre")
                            .from(MovieGenres::Table, MovieGenres::GenreId)
                            .to(Genres::Table, Genres::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_genres_genre_id")
                    .table(MovieGenres::Table)
                    .col(MovieGenres::GenreId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieCast::Table)
                    .if_not_exists()
                    .col(integer(MovieCast::MovieId))
                    .col(integer(MovieCast::CastId))
                    .col(integer_null(MovieCast::CastOrder))
                    .col(string_null(MovieCast::Character))
                    .col(string_null(MovieCast::CreditId))
                    .primary_key(Index::create().col(MovieCast::MovieId).col(MovieCast::CastId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_cast_movie")
                            .from(MovieCast::Table, MovieCast::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_cast_cast_member")
                            .from(MovieCast::Table, MovieCast::CastId)
                            .to(CastMembers::Table, CastMembers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_cast_cast_id")
                    .table(MovieCast::Table)
                    .col(MovieCast::CastId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MovieCast::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieGenres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CastMembers::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    OriginalTitle,
    Overview,
    ReleaseDate,
    Popularity,
    VoteAverage,
    VoteCount,
    Revenue,
    PosterPath,
    BackdropPath,
    Adult,
    Video,
    OriginalLanguage,
    GenreIds,
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum CastMembers {
    Table,
    Id,
    Name,
    OriginalName,
    Gender,
    KnownForDepartment,
    Popularity,
    ProfilePath,
    Adult,
}

#[derive(DeriveIden)]
enum MovieGenres {
    Table,
    MovieId,
    GenreId,
}

#[derive(DeriveIden)]
enum MovieCast {
    Table,
    MovieId,
    CastId,
    CastOrder,
    Character,
    CreditId,
}
