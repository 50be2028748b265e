//! Catalog resolution for the terminal client: local file, remote feed, or
//! the embedded catalog. Any failure lands on the embedded fallback.
use chrono::Utc;
use cinequiz_game::{Catalog, CatalogError, recover_catalog};
use std::path::{Path, PathBuf};
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const BACKOFF_BASE_MS: u64 = 250;

/// Where the catalog should come from, in priority order file > url > embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOrigin {
    File(PathBuf),
    Remote { url: String, retries: u32 },
    Embedded,
}

impl CatalogOrigin {
    pub fn from_flags(file: Option<PathBuf>, url: Option<String>, retries: u32) -> Self {
        match (file, url) {
            (Some(path), _) => Self::File(path),
            (None, Some(url)) if !url.trim().is_empty() => Self::Remote { url, retries },
            _ => Self::Embedded,
        }
    }
}

/// Resolve the catalog, never failing: errors are logged and replaced by the fallback.
pub async fn load_catalog(origin: &CatalogOrigin) -> Catalog {
    match origin {
        CatalogOrigin::File(path) => recover_catalog(read_catalog_file(path)),
        CatalogOrigin::Remote { url, retries } => {
            recover_catalog(fetch_with_retry(url, *retries).await)
        }
        CatalogOrigin::Embedded => Catalog::fallback(),
    }
}

fn read_catalog_file(path: &Path) -> Result<Catalog, CatalogError> {
    let json = std::fs::read_to_string(path)?;
    Catalog::from_json(&json)
}

async fn fetch_catalog(client: &reqwest::Client, url: &str) -> Result<Catalog, CatalogError> {
    let unavailable = |e: reqwest::Error| CatalogError::Unavailable(e.to_string());
    let body = client
        .get(url)
        .send()
        .await
        .map_err(unavailable)?
        .error_for_status()
        .map_err(unavailable)?
        .text()
        .await
        .map_err(unavailable)?;
    Ok(Catalog::from_json(&body)?.with_last_updated(Utc::now().to_rfc3339()))
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(1 << attempt.min(6)))
}

async fn fetch_with_retry(url: &str, retries: u32) -> Result<Catalog, CatalogError> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
    let attempts = retries.max(1);
    let mut last_err = None;
    for attempt in 1..=attempts {
        match fetch_catalog(&client, url).await {
            Ok(catalog) => {
                log::debug!("fetched {} movies from {url}", catalog.len());
                return Ok(catalog);
            }
            Err(err) => {
                log::warn!("catalog fetch attempt {attempt}/{attempts} failed: {err}");
                last_err = Some(err);
                if attempt < attempts {
                    tokio::time::sleep(backoff(attempt - 1)).await;
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| CatalogError::Unavailable(format!("no attempts made for {url}"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "cinequiz-catalog-{label}-{}.json",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn flags_pick_origin_by_priority() {
        let file = Some(PathBuf::from("movies.json"));
        let url = Some("https://example.invalid/top250.json".to_string());
        assert_eq!(
            CatalogOrigin::from_flags(file.clone(), url.clone(), 2),
            CatalogOrigin::File(PathBuf::from("movies.json"))
        );
        assert!(matches!(
            CatalogOrigin::from_flags(None, url, 2),
            CatalogOrigin::Remote { retries: 2, .. }
        ));
        assert_eq!(
            CatalogOrigin::from_flags(None, Some("  ".to_string()), 2),
            CatalogOrigin::Embedded
        );
    }

    #[test]
    fn backoff_grows_and_caps() {
        assert_eq!(backoff(0), Duration::from_millis(250));
        assert_eq!(backoff(2), Duration::from_millis(1000));
        assert_eq!(backoff(40), backoff(6));
    }

    #[tokio::test]
    async fn missing_file_falls_back() {
        let origin = CatalogOrigin::File(temp_path("missing"));
        assert_eq!(load_catalog(&origin).await, Catalog::fallback());
    }

    #[tokio::test]
    async fn feed_file_is_parsed() {
        let path = temp_path("feed");
        std::fs::write(
            &path,
            r#"[{"title":"Alien","year":"1979","genre":"Horror, Sci-Fi","actors":"Sigourney Weaver, Tom Skerritt"}]"#,
        )
        .unwrap();
        let catalog = load_catalog(&CatalogOrigin::File(path)).await;
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.movies()[0].genres, vec!["Horror", "Sci-Fi"]);
    }

    #[tokio::test]
    async fn unreachable_url_falls_back() {
        let origin = CatalogOrigin::Remote {
            url: "http://127.0.0.1:9/top250.json".to_string(),
            retries: 1,
        };
        assert_eq!(load_catalog(&origin).await, Catalog::fallback());
    }
}
