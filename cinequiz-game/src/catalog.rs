//! Movie records and the catalog the daily movie is drawn from.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::constants::{FALLBACK_CATALOG_JSON, FEED_LIST_SEPARATOR};

/// A movie eligible for the daily quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub year: i32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, alias = "actors")]
    pub cast: Vec<String>,
}

impl Movie {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        year: i32,
        genres: impl IntoIterator<Item = impl Into<String>>,
        cast: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            title: title.into(),
            year,
            genres: genres.into_iter().map(Into::into).collect(),
            cast: cast.into_iter().map(Into::into).collect(),
        }
    }

    /// Trim every field, drop blank list entries and repeated cast names.
    #[must_use]
    pub fn normalized(self) -> Self {
        fn tidy(items: Vec<String>) -> Vec<String> {
            let mut seen = HashSet::new();
            items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty() && seen.insert(item.clone()))
                .collect()
        }
        Self {
            title: self.title.trim().to_string(),
            year: self.year,
            genres: tidy(self.genres),
            cast: tidy(self.cast),
        }
    }

    /// Whether the record satisfies the catalog contract (title, genres and cast present).
    #[must_use]
    pub fn is_playable(&self) -> bool {
        !self.title.trim().is_empty()
            && self.genres.iter().any(|g| !g.trim().is_empty())
            && self.cast.iter().any(|c| !c.trim().is_empty())
    }
}

/// Failures while obtaining a catalog. Never surfaced to the player: callers
/// go through [`resolve_catalog`] which swaps in the fallback catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog source unavailable: {0}")]
    Unavailable(String),
    #[error("catalog JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ordered collection of candidate movies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Catalog {
    pub movies: Vec<Movie>,
    #[serde(default, rename = "lastUpdated", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// One catalog row before validation. Accepts both the native shape
/// (`genres`/`cast` arrays, numeric year) and the top-250 feed shape
/// (`genre`/`actors` comma-joined strings, string year).
#[derive(Debug, Default, Deserialize)]
struct RawEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<serde_json::Value>,
    #[serde(default, alias = "genre")]
    genres: Option<serde_json::Value>,
    #[serde(default, alias = "actors")]
    cast: Option<serde_json::Value>,
}

impl RawEntry {
    fn into_movie(self) -> Result<Movie, &'static str> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or("missing title")?;
        let year = match self.year {
            Some(serde_json::Value::Number(n)) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
            Some(serde_json::Value::String(s)) => s.trim().parse::<i32>().ok(),
            _ => None,
        }
        .ok_or("unparseable year")?;
        Ok(Movie {
            title,
            year,
            genres: list_field(self.genres),
            cast: list_field(self.cast),
        })
    }
}

/// Array of strings or a comma-joined string; anything else reads as empty.
fn list_field(raw: Option<serde_json::Value>) -> Vec<String> {
    match raw {
        Some(serde_json::Value::String(joined)) => joined
            .split(FEED_LIST_SEPARATOR)
            .map(str::to_string)
            .collect(),
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Deserialize)]
struct NativeDoc {
    movies: Vec<serde_json::Value>,
    #[serde(default, rename = "lastUpdated")]
    last_updated: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogShape {
    Native(NativeDoc),
    Feed(Vec<serde_json::Value>),
}

impl Catalog {
    /// Create an empty catalog (useful for tests and the not-ready state).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            movies: Vec::new(),
            last_updated: None,
        }
    }

    /// Build a catalog from already parsed movies, dropping unplayable rows.
    #[must_use]
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        Self {
            movies,
            last_updated: None,
        }
        .sanitized()
    }

    /// Parse either the native `{ "movies": [...] }` shape or the top-250 feed array.
    ///
    /// Rows are read one at a time; a row that cannot be read is skipped with
    /// a warning instead of failing the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON matches neither shape.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let (rows, last_updated) = match serde_json::from_str::<CatalogShape>(json) {
            Ok(CatalogShape::Native(doc)) => (doc.movies, doc.last_updated),
            Ok(CatalogShape::Feed(rows)) => (rows, None),
            // Re-parse as the native shape so the error names the real problem.
            Err(_) => {
                let doc = serde_json::from_str::<NativeDoc>(json)?;
                (doc.movies, doc.last_updated)
            }
        };
        let movies = rows
            .into_iter()
            .enumerate()
            .filter_map(|(idx, row)| {
                let parsed = serde_json::from_value::<RawEntry>(row)
                    .map_err(|err| err.to_string())
                    .and_then(|raw| raw.into_movie().map_err(str::to_string));
                match parsed {
                    Ok(movie) => Some(movie),
                    Err(reason) => {
                        log::warn!("skipping catalog row {idx}: {reason}");
                        None
                    }
                }
            })
            .collect();
        Ok(Self {
            movies,
            last_updated,
        }
        .sanitized())
    }

    /// The fixed catalog shipped with the engine, used when the source fails.
    #[must_use]
    pub fn fallback() -> Self {
        Self::from_json(FALLBACK_CATALOG_JSON).unwrap_or_default()
    }

    #[must_use]
    pub fn with_last_updated(mut self, stamp: impl Into<String>) -> Self {
        self.last_updated = Some(stamp.into());
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Tidy every row, then drop rows that break the movie contract and
    /// repeated titles, keeping order.
    fn sanitized(mut self) -> Self {
        self.movies = self.movies.into_iter().map(Movie::normalized).collect();
        let mut seen = HashSet::new();
        self.movies.retain(|movie| {
            if !movie.is_playable() {
                log::warn!("skipping unplayable catalog entry {:?}", movie.title);
                return false;
            }
            if !seen.insert(movie.title.clone()) {
                log::warn!("skipping duplicate catalog title {:?}", movie.title);
                return false;
            }
            true
        });
        self
    }
}

/// Titles containing `query` (case-insensitive), in catalog order, at most `limit`.
#[must_use]
pub fn suggest_titles<'a>(catalog: &'a Catalog, query: &str, limit: usize) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    catalog
        .movies
        .iter()
        .map(|movie| movie.title.as_str())
        .filter(|title| title.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}

/// Trait for abstracting where the catalog comes from.
/// Platform-specific implementations should provide this.
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the ordered catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched or parsed.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;
}

/// Source backed by the embedded fallback catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalog;

impl CatalogSource for EmbeddedCatalog {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Catalog::from_json(FALLBACK_CATALOG_JSON)
    }
}

/// Load from `source`, mapping any failure to the fallback catalog.
///
/// An empty but successfully loaded catalog is returned as-is so the caller
/// can surface the not-available state.
#[must_use]
pub fn resolve_catalog<S: CatalogSource>(source: &S) -> Catalog {
    recover_catalog(source.load_catalog())
}

/// Shared fallback policy for sync and async catalog loaders.
#[must_use]
pub fn recover_catalog<E: std::fmt::Display>(loaded: Result<Catalog, E>) -> Catalog {
    match loaded {
        Ok(catalog) => catalog,
        Err(err) => {
            log::warn!("catalog unavailable ({err}); using fallback catalog");
            Catalog::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSource;

    impl CatalogSource for FailingSource {
        type Error = CatalogError;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            Err(CatalogError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn fallback_catalog_is_complete() {
        let catalog = Catalog::fallback();
        assert_eq!(catalog.len(), 20);
        assert_eq!(catalog.movies[0].title, "The Shawshank Redemption");
        assert!(catalog.movies.iter().all(Movie::is_playable));
    }

    #[test]
    fn native_json_accepts_actors_alias() {
        let json = r#"{
            "movies": [
                { "title": "Dune", "year": 2021, "genres": ["Sci-Fi"], "actors": ["A", "B"] }
            ],
            "lastUpdated": "2024-01-01T00:00:00Z"
        }"#;

        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.movies[0].cast, vec!["A", "B"]);
        assert_eq!(catalog.last_updated.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn feed_json_splits_lists_and_skips_bad_rows() {
        let json = r#"[
            { "title": "The Godfather", "year": "1972", "genre": "Crime, Drama", "actors": "Marlon Brando, Al Pacino" },
            { "title": "Broken", "year": "n/a", "genre": "Drama", "actors": "Nobody" },
            { "title": "No Cast", "year": 2000, "genre": "Drama", "actors": "" }
        ]"#;

        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        let movie = &catalog.movies[0];
        assert_eq!(movie.year, 1972);
        assert_eq!(movie.genres, vec!["Crime", "Drama"]);
        assert_eq!(movie.cast, vec!["Marlon Brando", "Al Pacino"]);
    }

    #[test]
    fn native_json_skips_bad_rows_and_keeps_good_ones() {
        let json = r#"{
            "movies": [
                { "title": "Dune", "year": 2021, "genres": ["Sci-Fi"], "cast": ["A"] },
                { "title": "Heat", "year": "1995", "genres": ["Crime"], "cast": ["Al Pacino"] },
                { "title": "Nameless", "year": "soon", "genres": ["Drama"], "cast": ["B"] },
                { "year": 1999, "genres": ["Drama"], "cast": ["C"] },
                { "title": "Nulls", "year": 2001, "genres": null, "cast": ["D"] },
                "not an object"
            ]
        }"#;

        let catalog = Catalog::from_json(json).unwrap();
        let titles: Vec<_> = catalog.movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Heat"]);
        assert_eq!(catalog.movies[1].year, 1995);
    }

    #[test]
    fn feed_json_survives_null_and_missing_fields() {
        let json = r#"[
            { "title": "Alien", "year": 1979, "genre": "Horror, Sci-Fi", "actors": "Sigourney Weaver" },
            { "title": "Ghost", "year": "1990", "genre": "Drama", "actors": null },
            { "year": "1984", "genre": "Sci-Fi", "actors": "Arnold Schwarzenegger" },
            { "title": "Heat", "year": "1995", "genre": "Crime", "actors": "Al Pacino, Robert De Niro" }
        ]"#;

        let catalog = Catalog::from_json(json).unwrap();
        let titles: Vec<_> = catalog.movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Alien", "Heat"]);
        assert_eq!(catalog.movies[1].cast, vec!["Al Pacino", "Robert De Niro"]);
    }

    #[test]
    fn cast_and_genres_are_trimmed_and_deduplicated() {
        let catalog = Catalog::from_movies(vec![Movie::new(
            " Alien ",
            1979,
            ["Horror", " ", "Sci-Fi "],
            ["", "Sigourney Weaver", " Sigourney Weaver", "Ian Holm"],
        )]);
        let movie = &catalog.movies[0];
        assert_eq!(movie.title, "Alien");
        assert_eq!(movie.genres, vec!["Horror", "Sci-Fi"]);
        assert_eq!(movie.cast, vec!["Sigourney Weaver", "Ian Holm"]);

        let blank_only = Catalog::from_movies(vec![Movie::new("Void", 2000, ["Drama"], ["", "  "])]);
        assert!(blank_only.is_empty());
    }

    #[test]
    fn duplicate_titles_keep_first() {
        let catalog = Catalog::from_movies(vec![
            Movie::new("Heat", 1995, ["Crime"], ["Al Pacino"]),
            Movie::new("Heat", 1986, ["Action"], ["Burt Reynolds"]),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.movies[0].year, 1995);
    }

    #[test]
    fn garbage_json_is_an_error() {
        assert!(Catalog::from_json("not json").is_err());
        assert!(Catalog::from_json(r#"{"films": []}"#).is_err());
    }

    #[test]
    fn failing_source_resolves_to_fallback() {
        let catalog = resolve_catalog(&FailingSource);
        assert_eq!(catalog, Catalog::fallback());
        assert_eq!(resolve_catalog(&EmbeddedCatalog), Catalog::fallback());
    }

    #[test]
    fn suggestions_are_case_insensitive_and_limited() {
        let catalog = Catalog::fallback();
        assert!(suggest_titles(&catalog, "   ", 5).is_empty());

        let godfathers = suggest_titles(&catalog, "GODFATHER", 5);
        assert_eq!(godfathers, vec!["The Godfather", "The Godfather: Part II"]);

        let many = suggest_titles(&catalog, "the", 3);
        assert_eq!(many.len(), 3);
        assert_eq!(many[0], "The Shawshank Redemption");
    }
}
