pub mod locks;
pub mod providers;
pub mod saved_movies;
pub mod search;
pub mod search_counts;

pub use saved_movies::SavedMovies;
pub use search_counts::SearchCounts;
