//! Photo media URLs for both field-naming schemes.

use url::Url;

use super::places_http::DEFAULT_PLACES_ENDPOINT;
use crate::domain::{PhotoRef, PhotoToken};

/// Width requested when none is configured.
pub const DEFAULT_PHOTO_MAX_WIDTH: u32 = 400;

const LEGACY_PHOTO_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/place/photo";

/// Builds fetchable media URLs from opaque photo tokens.
#[derive(Debug, Clone)]
pub struct PhotoUrlBuilder {
    places_endpoint: Url,
    legacy_endpoint: Url,
    api_key: String,
    max_width: u32,
}

impl PhotoUrlBuilder {
    /// Builder against the public endpoints.
    ///
    /// # Errors
    /// Returns an error if a built-in endpoint fails to parse.
    pub fn new(api_key: impl Into<String>, max_width: u32) -> Result<Self, url::ParseError> {
        Ok(Self::with_endpoints(
            Url::parse(DEFAULT_PLACES_ENDPOINT)?,
            Url::parse(LEGACY_PHOTO_ENDPOINT)?,
            api_key,
            max_width,
        ))
    }

    /// Builder against explicit endpoints.
    #[must_use]
    pub fn with_endpoints(
        places_endpoint: Url,
        legacy_endpoint: Url,
        api_key: impl Into<String>,
        max_width: u32,
    ) -> Self {
        Self {
            places_endpoint,
            legacy_endpoint,
            api_key: api_key.into(),
            max_width: max_width.clamp(1, 4_800),
        }
    }

    /// Media URL for `photo`, or `None` when the token cannot form a path.
    #[must_use]
    pub fn url_for(&self, photo: &PhotoRef) -> Option<Url> {
        let width = self.max_width.to_string();
        match &photo.token {
            PhotoToken::Resource(name) => {
                let mut url = self.places_endpoint.clone();
                {
                    let mut segments = url.path_segments_mut().ok()?;
                    segments.pop_if_empty();
                    for segment in name.split('/').filter(|segment| !segment.is_empty()) {
                        segments.push(segment);
                    }
                    segments.push("media");
                }
                url.query_pairs_mut()
                    .append_pair("maxWidthPx", &width)
                    .append_pair("key", &self.api_key);
                Some(url)
            }
            PhotoToken::LegacyReference(reference) => {
                let mut url = self.legacy_endpoint.clone();
                url.query_pairs_mut()
                    .append_pair("maxwidth", &width)
                    .append_pair("photo_reference", reference)
                    .append_pair("key", &self.api_key);
                Some(url)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn builder() -> PhotoUrlBuilder {
        PhotoUrlBuilder::new("k3y", 640).expect("default endpoints parse")
    }

    fn photo(token: PhotoToken) -> PhotoRef {
        PhotoRef {
            token,
            width_px: None,
            height_px: None,
            attributions: Vec::new(),
        }
    }

    #[rstest]
    #[case::resource(
        PhotoToken::Resource("places/abc/photos/p1".to_owned()),
        "https://places.googleapis.com/v1/places/abc/photos/p1/media?maxWidthPx=640&key=k3y"
    )]
    #[case::legacy(
        PhotoToken::LegacyReference("legacy-ref".to_owned()),
        "https://maps.googleapis.com/maps/api/place/photo?maxwidth=640&photo_reference=legacy-ref&key=k3y"
    )]
    fn builds_scheme_specific_urls(
        builder: PhotoUrlBuilder,
        #[case] token: PhotoToken,
        #[case] expected: &str,
    ) {
        let url = builder.url_for(&photo(token)).expect("url built");
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn width_is_clamped_to_the_provider_maximum() {
        let builder = PhotoUrlBuilder::new("k", 10_000).expect("default endpoints parse");
        let url = builder
            .url_for(&photo(PhotoToken::LegacyReference("r".to_owned())))
            .expect("url built");
        assert!(url.as_str().contains("maxwidth=4800"));
    }
}
