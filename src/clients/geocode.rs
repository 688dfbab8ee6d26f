use super::{Geocoder, ProviderError, get_json, parse_url};
use crate::config::ProviderConfig;
use crate::domain::NewLocation;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const PROVIDER: &str = "geocode";

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Google Geocoding API client.
#[derive(Clone)]
pub struct GoogleGeocoder {
    client: Client,
    config: ProviderConfig,
}

impl GoogleGeocoder {
    #[must_use]
    pub const fn with_shared_client(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }
}

/// Takes the first result; an empty result list means the query did not
/// resolve to a place.
pub fn normalize(response: GeocodeResponse) -> Result<NewLocation, ProviderError> {
    let first = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::shape(PROVIDER, "no results for query"))?;

    Ok(NewLocation {
        formatted_query: first.formatted_address,
        latitude: first.geometry.location.lat,
        longitude: first.geometry.location.lng,
    })
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, query: &str) -> Result<NewLocation, ProviderError> {
        let url = parse_url(
            PROVIDER,
            &self.config.base_url,
            &[
                ("address", query.to_string()),
                ("key", self.config.api_key.clone()),
            ],
        )?;

        let response: GeocodeResponse = get_json(PROVIDER, self.client.get(url)).await?;
        normalize(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_takes_first_result() {
        let response: GeocodeResponse = serde_json::from_str(
            r#"{
                "results": [
                    {
                        "formatted_address": "Beverly Hills, CA 90210, USA",
                        "geometry": { "location": { "lat": 34.1030032, "lng": -118.4104684 } }
                    },
                    {
                        "formatted_address": "Elsewhere",
                        "geometry": { "location": { "lat": 0.0, "lng": 0.0 } }
                    }
                ],
                "status": "OK"
            }"#,
        )
        .unwrap();

        let location = normalize(response).unwrap();
        assert_eq!(location.formatted_query, "Beverly Hills, CA 90210, USA");
        assert!((location.latitude - 34.103_003_2).abs() < f64::EPSILON);
        assert!((location.longitude + 118.410_468_4).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_results_are_a_shape_mismatch() {
        let response: GeocodeResponse =
            serde_json::from_str(r#"{ "results": [], "status": "ZERO_RESULTS" }"#).unwrap();

        let err = normalize(response).unwrap_err();
        assert!(matches!(err, ProviderError::ShapeMismatch { .. }));
    }
}
