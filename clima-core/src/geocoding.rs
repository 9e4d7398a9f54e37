use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::model::PlaceCandidate;

const MAPBOX_PLACES_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

/// Maximum number of candidates requested from the provider.
const RESULT_LIMIT: &str = "10";
/// Response language for place names.
const LANGUAGE: &str = "es";

/// Client for the Mapbox forward-geocoding API.
///
/// Resolves a free-text place name into a ranked list of candidates.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    access_token: String,
    base_url: String,
    http: Client,
}

impl GeocodingClient {
    pub fn new(access_token: String) -> Self {
        Self::new_with_base_url(access_token, MAPBOX_PLACES_URL)
    }

    /// Like [`GeocodingClient::new`] but against a custom endpoint; used to
    /// point the client at a mock server in tests.
    pub fn new_with_base_url(access_token: String, base_url: &str) -> Self {
        Self {
            access_token,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Look up candidate places for `query`.
    ///
    /// Any network or decoding failure is logged and degrades to an empty
    /// list; callers cannot tell it apart from a query with zero matches.
    pub async fn resolve(&self, query: &str) -> Vec<PlaceCandidate> {
        match self.fetch(query).await {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::warn!("geocoding lookup for {query:?} failed: {err:#}");
                Vec::new()
            }
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<PlaceCandidate>> {
        // The query is a path segment on this API, so it must be
        // percent-encoded rather than interpolated.
        let mut url =
            Url::parse(&self.base_url).context("Invalid geocoding base URL")?;
        url.path_segments_mut()
            .map_err(|()| anyhow!("Geocoding base URL cannot serve as a base"))?
            .pop_if_empty()
            .push(&format!("{query}.json"));

        let res = self
            .http
            .get(url)
            .query(&[
                ("access_token", self.access_token.as_str()),
                ("limit", RESULT_LIMIT),
                ("language", LANGUAGE),
            ])
            .send()
            .await
            .context("Failed to send request to the geocoding service")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: MbGeocodeResponse =
            serde_json::from_str(&body).context("Failed to parse geocoding JSON")?;

        let candidates = parsed
            .features
            .into_iter()
            .map(|feature| PlaceCandidate {
                id: feature.id,
                name: feature.place_name,
                longitude: feature.center[0],
                latitude: feature.center[1],
            })
            .collect();

        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct MbFeature {
    id: String,
    place_name: String,
    /// `[longitude, latitude]` per the provider's convention.
    center: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct MbGeocodeResponse {
    features: Vec<MbFeature>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Back up to a char boundary so multibyte text cannot split mid-char.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn resolve_maps_features_to_candidates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/madrid.json"))
            .and(query_param("access_token", "TOKEN"))
            .and(query_param("limit", "10"))
            .and(query_param("language", "es"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "features": [
                    {
                        "id": "place.123",
                        "place_name": "Madrid, Spain",
                        "center": [-3.7037, 40.4167]
                    },
                    {
                        "id": "place.456",
                        "place_name": "Madrid, Colombia",
                        "center": [-74.2659, 4.7321]
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = GeocodingClient::new_with_base_url("TOKEN".into(), &server.uri());
        let candidates = client.resolve("madrid").await;

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "place.123");
        assert_eq!(candidates[0].name, "Madrid, Spain");
        assert_eq!(candidates[0].longitude, -3.7037);
        assert_eq!(candidates[0].latitude, 40.4167);
    }

    #[tokio::test]
    async fn resolve_degrades_to_empty_on_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = GeocodingClient::new_with_base_url("TOKEN".into(), &server.uri());
        assert!(client.resolve("madrid").await.is_empty());
    }

    #[tokio::test]
    async fn resolve_degrades_to_empty_on_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = GeocodingClient::new_with_base_url("TOKEN".into(), &server.uri());
        assert!(client.resolve("madrid").await.is_empty());
    }

    #[tokio::test]
    async fn resolve_degrades_to_empty_on_long_accented_error_body() {
        let server = MockServer::start().await;

        // 199 ASCII bytes followed by a two-byte char straddling the
        // truncation point of the error message.
        let body = format!("{}ñ{}", "a".repeat(199), "x".repeat(50));
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string(body))
            .mount(&server)
            .await;

        let client = GeocodingClient::new_with_base_url("TOKEN".into(), &server.uri());
        assert!(client.resolve("madrid").await.is_empty());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = format!("{}ñ{}", "a".repeat(199), "x".repeat(50));

        let truncated = truncate_body(&body);
        assert_eq!(truncated, format!("{}...", "a".repeat(199)));
    }

    #[test]
    fn truncate_body_leaves_short_bodies_alone() {
        assert_eq!(truncate_body("señal"), "señal");
    }

    #[tokio::test]
    async fn resolve_degrades_to_empty_when_server_is_unreachable() {
        // Nothing is listening here once the server is dropped.
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let client = GeocodingClient::new_with_base_url("TOKEN".into(), &uri);
        assert!(client.resolve("madrid").await.is_empty());
    }
}
