mod movie;
mod saved_movie;
mod search_counter;

pub use movie::{Genre, Movie, MovieDetails, ProductionCompany};
pub use saved_movie::{NewSavedMovie, SavedMovie, ToggleAction, ToggleOutcome};
pub use search_counter::{NewSearchCounter, SearchCounter};

pub(crate) use movie::{poster_url, release_year};
