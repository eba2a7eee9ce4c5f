pub mod cast_member;
pub mod genre;
pub mod movie;
pub mod movie_cast;
pub mod movie_genre;
