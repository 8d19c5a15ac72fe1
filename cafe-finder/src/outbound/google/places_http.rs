//! Reqwest-backed Places API adapter.
//!
//! This adapter owns transport details only: request bodies, field masks,
//! timeout and HTTP error mapping. Records come back as raw JSON and are
//! normalised in the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::errors::{places_status_error, places_transport_error};
use super::{API_KEY_HEADER, FIELD_MASK_HEADER};
use crate::domain::ports::{
    NearbySearchRequest, PlacesProvider, PlacesProviderError, RawPlace, TextSearchRequest,
};
use crate::domain::{Coordinate, PlaceId};

/// Public Places API base URL.
pub const DEFAULT_PLACES_ENDPOINT: &str = "https://places.googleapis.com/v1/";

/// Fields requested for each nearby-search record.
pub const NEARBY_FIELDS: [&str; 9] = [
    "id",
    "displayName",
    "formattedAddress",
    "location",
    "rating",
    "userRatingCount",
    "photos",
    "businessStatus",
    "currentOpeningHours.openNow",
];

/// Fields requested for each suggestion record.
pub const TEXT_FIELDS: [&str; 2] = ["displayName", "location"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NearbyBody<'a> {
    included_types: [&'a str; 1],
    max_result_count: u32,
    location_restriction: LocationRestriction,
}

#[derive(Debug, Serialize)]
struct LocationRestriction {
    circle: Circle,
}

#[derive(Debug, Serialize)]
struct Circle {
    center: LatLng,
    radius: f64,
}

#[derive(Debug, Serialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

impl From<Coordinate> for LatLng {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextBody<'a> {
    text_query: &'a str,
    max_result_count: u32,
}

#[derive(Debug, Deserialize)]
struct PlacesResponseDto {
    #[serde(default)]
    places: Vec<Value>,
}

/// Places adapter performing HTTPS requests against one API base URL.
pub struct GooglePlacesHttp {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GooglePlacesHttp {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, PlacesProviderError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                PlacesProviderError::rejected(format!("endpoint {} cannot be a base", self.endpoint))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorised(&self, request: RequestBuilder, field_mask: String) -> RequestBuilder {
        request
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(FIELD_MASK_HEADER, field_mask)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, PlacesProviderError> {
        let response = request
            .send()
            .await
            .map_err(|error| places_transport_error(&error))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| places_transport_error(&error))?;
        if !status.is_success() {
            return Err(places_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

fn places_mask(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| format!("places.{field}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_places(body: &[u8]) -> Result<Vec<RawPlace>, PlacesProviderError> {
    let decoded: PlacesResponseDto = serde_json::from_slice(body).map_err(|error| {
        PlacesProviderError::decode(format!("invalid places JSON payload: {error}"))
    })?;
    Ok(decoded.places.into_iter().map(RawPlace).collect())
}

fn parse_place(body: &[u8]) -> Result<RawPlace, PlacesProviderError> {
    let value: Value = serde_json::from_slice(body).map_err(|error| {
        PlacesProviderError::decode(format!("invalid place JSON payload: {error}"))
    })?;
    if !value.is_object() {
        return Err(PlacesProviderError::decode("place payload is not an object"));
    }
    Ok(RawPlace(value))
}

#[async_trait]
impl PlacesProvider for GooglePlacesHttp {
    async fn nearby_search(
        &self,
        request: &NearbySearchRequest,
    ) -> Result<Vec<RawPlace>, PlacesProviderError> {
        let body = NearbyBody {
            included_types: [request.included_type.provider_type()],
            max_result_count: request.max_results,
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: request.center.into(),
                    radius: f64::from(request.radius_metres),
                },
            },
        };
        let url = self.url(&["places:searchNearby"])?;
        let builder = self.authorised(self.client.post(url), places_mask(&NEARBY_FIELDS));
        let payload = self.send(builder.json(&body)).await?;
        let places = parse_places(&payload)?;
        debug!(
            category = %request.included_type,
            radius_metres = request.radius_metres,
            returned = places.len(),
            "nearby search answered"
        );
        Ok(places)
    }

    async fn text_search(
        &self,
        request: &TextSearchRequest,
    ) -> Result<Vec<RawPlace>, PlacesProviderError> {
        let body = TextBody {
            text_query: &request.query,
            max_result_count: request.max_results,
        };
        let url = self.url(&["places:searchText"])?;
        let builder = self.authorised(self.client.post(url), places_mask(&TEXT_FIELDS));
        let payload = self.send(builder.json(&body)).await?;
        parse_places(&payload)
    }

    async fn fetch_details(
        &self,
        id: &PlaceId,
        fields: &[&'static str],
    ) -> Result<RawPlace, PlacesProviderError> {
        let url = self.url(&["places", id.as_str()])?;
        let builder = self.authorised(self.client.get(url), fields.join(","));
        let payload = self.send(builder).await?;
        parse_place(&payload)
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network request and decode helpers.

    use super::*;
    use serde_json::json;

    use crate::domain::Category;
    use crate::test_support::fixtures::{coordinate, place_id};

    fn adapter(endpoint: &str) -> GooglePlacesHttp {
        GooglePlacesHttp::new(
            Url::parse(endpoint).expect("valid endpoint"),
            "k3y",
            Duration::from_secs(5),
        )
        .expect("client builds")
    }

    #[test]
    fn nearby_body_matches_the_wire_shape() {
        let body = NearbyBody {
            included_types: [Category::TouristAttraction.provider_type()],
            max_result_count: 20,
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: coordinate(26.8467, 80.9462).into(),
                    radius: 1_500.0,
                },
            },
        };

        assert_eq!(
            serde_json::to_value(&body).expect("serialises"),
            json!({
                "includedTypes": ["tourist_attraction"],
                "maxResultCount": 20,
                "locationRestriction": {
                    "circle": {
                        "center": { "latitude": 26.8467, "longitude": 80.9462 },
                        "radius": 1500.0,
                    }
                }
            })
        );
    }

    #[test]
    fn urls_keep_the_api_version_prefix() {
        let places = adapter(DEFAULT_PLACES_ENDPOINT);

        let nearby = places.url(&["places:searchNearby"]).expect("url builds");
        let detail = places
            .url(&["places", place_id("ChIJ 1/x").as_str()])
            .expect("url builds");

        assert_eq!(
            nearby.as_str(),
            "https://places.googleapis.com/v1/places:searchNearby"
        );
        assert_eq!(
            detail.as_str(),
            "https://places.googleapis.com/v1/places/ChIJ%201%2Fx"
        );
    }

    #[test]
    fn field_masks_are_prefixed_for_list_responses() {
        assert_eq!(
            places_mask(&TEXT_FIELDS),
            "places.displayName,places.location"
        );
    }

    #[test]
    fn missing_places_array_is_an_empty_result() {
        assert_eq!(parse_places(b"{}").expect("decodes"), Vec::new());
    }

    #[test]
    fn list_records_pass_through_unchanged() {
        let body = br#"{"places":[{"id":"a","displayName":{"text":"Chai Point"}}]}"#;

        let places = parse_places(body).expect("decodes");

        assert_eq!(
            places,
            vec![RawPlace(json!({"id": "a", "displayName": {"text": "Chai Point"}}))]
        );
    }

    #[test]
    fn non_object_detail_is_a_decode_error() {
        let error = parse_place(b"[]").expect_err("array rejected");
        assert!(matches!(error, PlacesProviderError::Decode { .. }));
    }
}
