//! YTS movie provider implementation

use super::de::lenient_u32;
use super::traits::*;
use crate::config::ProviderConfig;
use crate::results::{magnet_link, ListingRecord, ProviderName, QualityTier};
use anyhow::Result as AnyhowResult;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ListMoviesResponse {
    #[serde(default)]
    data: Option<ListMoviesData>,
}

#[derive(Debug, Deserialize)]
struct ListMoviesData {
    #[serde(default)]
    movies: Option<Vec<Movie>>,
}

#[derive(Debug, Deserialize)]
struct Movie {
    title: String,
    #[serde(default)]
    year: Option<u32>,
    #[serde(default)]
    medium_cover_image: Option<String>,
    #[serde(default)]
    torrents: Option<Vec<MovieTorrent>>,
}

#[derive(Debug, Deserialize)]
struct MovieTorrent {
    hash: String,
    #[serde(default)]
    quality: String,
    #[serde(default)]
    size: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    seeds: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    peers: u32,
}

/// YTS movie listings (JSON API)
pub struct Yts {
    base_url: String,
}

impl Yts {
    pub fn new() -> Self {
        Self::with_base_url("https://yts.mx")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn to_record(movie: &Movie, torrent: &MovieTorrent) -> ListingRecord {
        let title = match movie.year {
            Some(year) => format!("{} ({}) [{}]", movie.title, year, torrent.quality),
            None => format!("{} [{}]", movie.title, torrent.quality),
        };

        let mut record = ListingRecord::new(
            title,
            magnet_link(&torrent.hash, &movie.title),
            ProviderName::Yts,
        )
        .with_quality(QualityTier::from_label(&torrent.quality))
        .with_peers(torrent.seeds, torrent.peers)
        .with_poster(movie.medium_cover_image.clone());

        if let Some(ref size) = torrent.size {
            record = record.with_size(size.clone());
        }
        record
    }
}

impl Default for Yts {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for Yts {
    fn name(&self) -> ProviderName {
        ProviderName::Yts
    }


    fn request(&self, query: &str) -> AnyhowResult<ProviderRequest> {
        Ok(
            ProviderRequest::get(format!("{}/api/v2/list_movies.json", self.base_url))
                .param("query_term", query)
                .param("limit", "20"),
        )
    }

    fn response(&self, response: ProviderResponse) -> AnyhowResult<Vec<ListingRecord>> {
        let parsed: ListMoviesResponse = response.json()?;

        let movies = parsed.data.and_then(|d| d.movies).unwrap_or_default();
        let records = movies
            .iter()
            .flat_map(|movie| {
                movie
                    .torrents
                    .iter()
                    .flatten()
                    .map(move |torrent| Self::to_record(movie, torrent))
            })
            .collect();

        Ok(records)
    }

    fn init(&mut self, config: &ProviderConfig) -> AnyhowResult<()> {
        if let Some(ref url) = config.base_url {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "status": "ok",
        "data": {
            "movie_count": 2,
            "movies": [
                {
                    "title": "The Matrix",
                    "year": 1999,
                    "medium_cover_image": "https://img.example/matrix.jpg",
                    "torrents": [
                        {"hash": "A1B2C3D4E5F60718293A4B5C6D7E8F9001122334", "quality": "2160p", "size": "9.88 GB", "seeds": 120, "peers": 30},
                        {"hash": "B1B2C3D4E5F60718293A4B5C6D7E8F9001122334", "quality": "3D", "size": "1.70 GB"}
                    ]
                },
                {"title": "No Torrents", "year": 2001}
            ]
        }
    }"#;

    fn response(text: &str) -> ProviderResponse {
        ProviderResponse {
            status: 200,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_yts_request() {
        let yts = Yts::new();
        let request = yts.request("the matrix").unwrap();

        assert_eq!(request.url, "https://yts.mx/api/v2/list_movies.json");
        assert_eq!(request.param_value("query_term"), Some("the matrix"));
        assert_eq!(request.param_value("limit"), Some("20"));
    }

    #[test]
    fn test_yts_response() {
        let records = Yts::new().response(response(BODY)).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.title, "The Matrix (1999) [2160p]");
        assert_eq!(
            first.content_link,
            "magnet:?xt=urn:btih:A1B2C3D4E5F60718293A4B5C6D7E8F9001122334&dn=The%20Matrix"
        );
        assert_eq!(first.size_label, "9.88 GB");
        assert_eq!(first.quality_tier, QualityTier::UltraHd);
        assert_eq!(first.seeder_count, 120);
        assert_eq!(first.leecher_count, 30);
        assert_eq!(first.poster_url.as_deref(), Some("https://img.example/matrix.jpg"));

        let second = &records[1];
        assert_eq!(second.quality_tier, QualityTier::Unknown);
        assert_eq!(second.seeder_count, 0);
    }

    #[test]
    fn test_yts_empty_data() {
        let records = Yts::new()
            .response(response(r#"{"status":"ok","data":{"movie_count":0}}"#))
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_yts_malformed_body() {
        assert!(Yts::new().response(response("<html>")).is_err());
    }

    #[test]
    fn test_base_url_override() {
        let mut yts = Yts::new();
        let config = ProviderConfig {
            base_url: Some("http://localhost:9000/".to_string()),
            ..Default::default()
        };
        yts.init(&config).unwrap();

        let request = yts.request("x").unwrap();
        assert_eq!(request.url, "http://localhost:9000/api/v2/list_movies.json");
    }
}
