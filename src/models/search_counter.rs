use serde::{Deserialize, Serialize};

use super::{movie::poster_url, Movie};

/// Usage counter for a submitted search term, one record per distinct term
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchCounter {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    #[serde(default)]
    pub movie_id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub count: u64,
}

/// Field set written when a term is submitted for the first time
#[derive(Debug, Serialize)]
pub struct NewSearchCounter<'a> {
    #[serde(rename = "searchTerm")]
    pub search_term: &'a str,
    pub movie_id: u64,
    pub title: &'a str,
    pub count: u64,
    pub poster_url: Option<String>,
}

impl<'a> NewSearchCounter<'a> {
    /// Seeds the counter from the first movie the term returned
    pub fn new(search_term: &'a str, movie: &'a Movie, image_base_url: &str) -> Self {
        Self {
            search_term,
            movie_id: movie.id,
            title: &movie.title,
            count: 1,
            poster_url: poster_url(image_base_url, movie.poster_path.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_decodes_with_missing_count() {
        let json = r#"{"$id": "abc", "searchTerm": "batman", "movie_id": 268, "title": "Batman"}"#;
        let counter: SearchCounter = serde_json::from_str(json).unwrap();
        assert_eq!(counter.search_term, "batman");
        assert_eq!(counter.count, 0);
        assert_eq!(counter.poster_url, None);
    }

    #[test]
    fn test_new_counter_fields() {
        let movie = Movie {
            id: 268,
            title: "Batman".to_string(),
            poster_path: Some("/batman.jpg".to_string()),
            vote_average: 7.2,
            release_date: Some("1989-06-23".to_string()),
        };

        let fields =
            serde_json::to_value(NewSearchCounter::new("batman", &movie, "https://img")).unwrap();
        assert_eq!(fields["searchTerm"], "batman");
        assert_eq!(fields["movie_id"], 268);
        assert_eq!(fields["count"], 1);
        assert_eq!(fields["poster_url"], "https://img/batman.jpg");
    }
}
