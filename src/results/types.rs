//! Listing record and related type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder size label for providers that report no size
pub const NO_SIZE: &str = "N/A";

const BYTES_PER_GIB: f64 = (1u64 << 30) as f64;

/// A single normalized torrent listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    /// Release title as reported by the provider
    pub title: String,
    /// Magnet-style locator embedding the content identifier
    pub content_link: String,
    /// Human readable size
    pub size_label: String,
    /// Provider that returned this listing
    pub provider_name: ProviderName,
    /// Coarse resolution tier
    pub quality_tier: QualityTier,
    /// Number of seeders
    #[serde(default)]
    pub seeder_count: u32,
    /// Number of leechers
    #[serde(default)]
    pub leecher_count: u32,
    /// Poster or cover image URL
    #[serde(default)]
    pub poster_url: Option<String>,
}

impl ListingRecord {
    /// Create a new listing with no size, unknown quality and no peers
    pub fn new(
        title: impl Into<String>,
        content_link: impl Into<String>,
        provider_name: ProviderName,
    ) -> Self {
        Self {
            title: title.into(),
            content_link: content_link.into(),
            size_label: NO_SIZE.to_string(),
            provider_name,
            quality_tier: QualityTier::Unknown,
            seeder_count: 0,
            leecher_count: 0,
            poster_url: None,
        }
    }

    pub fn with_size(mut self, size_label: impl Into<String>) -> Self {
        self.size_label = size_label.into();
        self
    }

    pub fn with_quality(mut self, quality_tier: QualityTier) -> Self {
        self.quality_tier = quality_tier;
        self
    }

    pub fn with_peers(mut self, seeders: u32, leechers: u32) -> Self {
        self.seeder_count = seeders;
        self.leecher_count = leechers;
        self
    }

    pub fn with_poster(mut self, poster_url: Option<String>) -> Self {
        self.poster_url = poster_url;
        self
    }
}

/// Build a magnet locator from an info hash and a display name
pub fn magnet_link(info_hash: &str, display_name: &str) -> String {
    format!(
        "magnet:?xt=urn:btih:{}&dn={}",
        info_hash,
        urlencoding::encode(display_name)
    )
}

/// Format a raw byte count as gigabytes with two decimals
pub fn format_size_bytes(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / BYTES_PER_GIB)
}

/// Sources a listing can be attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProviderName {
    #[serde(rename = "YTS")]
    Yts,
    #[serde(rename = "EZTV")]
    Eztv,
    #[serde(rename = "The Pirate Bay")]
    ThePirateBay,
    /// Only ever attached to synthetic fallback listings
    #[serde(rename = "1337x")]
    LeetX,
}

impl ProviderName {
    /// Display name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yts => "YTS",
            Self::Eztv => "EZTV",
            Self::ThePirateBay => "The Pirate Bay",
            Self::LeetX => "1337x",
        }
    }

    /// Prefix of the per-provider cache namespace
    pub fn cache_prefix(&self) -> &'static str {
        match self {
            Self::Yts => "yts",
            Self::Eztv => "eztv",
            Self::ThePirateBay => "tpb",
            Self::LeetX => "1337x",
        }
    }

    /// Merge order of provider outputs, lowest first
    pub fn priority(&self) -> u8 {
        match self {
            Self::Yts => 0,
            Self::Eztv => 1,
            Self::ThePirateBay => 2,
            Self::LeetX => 3,
        }
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution tier of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityTier {
    #[serde(rename = "4K")]
    UltraHd,
    #[serde(rename = "1080p")]
    FullHd,
    #[serde(rename = "720p")]
    Hd,
    #[serde(rename = "480p")]
    Sd,
    #[default]
    Unknown,
}

impl QualityTier {
    /// Ranking weight, higher sorts first
    pub fn weight(&self) -> u8 {
        match self {
            Self::UltraHd => 4,
            Self::FullHd => 3,
            Self::Hd => 2,
            Self::Sd => 1,
            Self::Unknown => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UltraHd => "4K",
            Self::FullHd => "1080p",
            Self::Hd => "720p",
            Self::Sd => "480p",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse an explicit quality label reported by a provider.
    ///
    /// Labels outside the tier set (e.g. "3D") map to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "4k" | "2160p" | "uhd" => Self::UltraHd,
            "1080p" | "fhd" => Self::FullHd,
            "720p" | "hd" => Self::Hd,
            "480p" | "sd" => Self::Sd,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-provider response timing information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timing {
    /// Provider name
    pub provider: ProviderName,
    /// Response time in milliseconds
    pub time_ms: u64,
    /// Number of listings returned
    pub result_count: usize,
    /// Whether the listings came from the provider cache
    pub cached: bool,
}

/// Provider failure kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderError {
    Timeout,
    NetworkError,
    HttpError(u16),
    ParseError,
    AccessDenied,
    TooManyRequests,
    InvalidRequest,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "Request timed out"),
            Self::NetworkError => write!(f, "Network error"),
            Self::HttpError(code) => write!(f, "HTTP error: {}", code),
            Self::ParseError => write!(f, "Failed to parse response"),
            Self::AccessDenied => write!(f, "Access denied"),
            Self::TooManyRequests => write!(f, "Too many requests"),
            Self::InvalidRequest => write!(f, "Failed to build request"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// A provider that failed during a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnresponsiveProvider {
    pub name: ProviderName,
    pub error: ProviderError,
}
