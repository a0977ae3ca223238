//! Quality tier inference from free-text release titles

use super::types::QualityTier;

/// Marker groups in priority order, first match wins
const QUALITY_MARKERS: &[(QualityTier, &[&str])] = &[
    (QualityTier::UltraHd, &["4K", "2160P", "UHD"]),
    (QualityTier::FullHd, &["1080P", "FHD", "1920X1080"]),
    (QualityTier::Hd, &["720P", "HD", "1280X720"]),
    (QualityTier::Sd, &["480P", "SD"]),
];

/// Infer a quality tier from a release title.
///
/// Matching is a case-insensitive substring test, so short markers such as
/// `HD` and `SD` will also fire inside longer words (`HDTV`, `SDR`).
pub fn classify(title: &str) -> QualityTier {
    let upper = title.to_uppercase();

    QUALITY_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| upper.contains(m)))
        .map(|(tier, _)| *tier)
        .unwrap_or(QualityTier::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_examples() {
        assert_eq!(classify("Movie.2024.2160p.UHD.mkv"), QualityTier::UltraHd);
        assert_eq!(classify("Show.S01E01.720p.HDTV"), QualityTier::Hd);
        assert_eq!(classify("random.release"), QualityTier::Unknown);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("movie.1080p.web"), QualityTier::FullHd);
        assert_eq!(classify("Movie 4k HDR"), QualityTier::UltraHd);
        assert_eq!(classify("old.movie.480p"), QualityTier::Sd);
    }

    #[test]
    fn test_classify_priority_order() {
        // 1080p beats the bare HD marker
        assert_eq!(classify("Film.1080p.HDRip"), QualityTier::FullHd);
        // HD wins over SD when both are present
        assert_eq!(classify("Film.HD.SD"), QualityTier::Hd);
        assert_eq!(classify("Film 1920x1080"), QualityTier::FullHd);
    }
}
