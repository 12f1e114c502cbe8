//! Reqwest-backed mileage source adapter.
//!
//! This adapter owns transport details only: request construction, timeout
//! and HTTP error mapping, and JSON decoding into a domain distance. The API
//! key is supplied at process start and sent as a query parameter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::RouteResponseDto;
use crate::domain::ports::{MileageSource, MileageSourceError};
use crate::domain::{Location, Miles};

const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Mileage source adapter performing HTTP GET requests against one endpoint.
pub struct MileageHttpSource {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl MileageHttpSource {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, api_key, DEFAULT_LOOKUP_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(
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
}

fn format_stop(location: &Location) -> String {
    format!("{},{}", location.city(), location.state())
}

fn map_transport_error(error: reqwest::Error) -> MileageSourceError {
    if error.is_timeout() {
        MileageSourceError::timeout(error.to_string())
    } else {
        MileageSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MileageSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MileageSourceError::denied(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            MileageSourceError::timeout(message)
        }
        _ => MileageSourceError::transport(message),
    }
}

fn parse_distance(body: &[u8]) -> Result<Miles, MileageSourceError> {
    let decoded: RouteResponseDto = serde_json::from_slice(body).map_err(|error| {
        MileageSourceError::decode(format!("invalid directions JSON payload: {error}"))
    })?;
    let distance = decoded
        .into_distance()
        .map_err(MileageSourceError::decode)?;
    Miles::from_lookup(distance).map_err(|error| MileageSourceError::decode(error.to_string()))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[async_trait]
impl MileageSource for MileageHttpSource {
    async fn distance(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Miles, MileageSourceError> {
        let from = format_stop(origin);
        let to = format_stop(destination);
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("key", self.api_key.as_str()),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("unit", "m"),
            ])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_distance(body.as_ref())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::denied(StatusCode::UNAUTHORIZED, "Denied")]
    #[case::denied_forbidden(StatusCode::FORBIDDEN, "Denied")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn maps_http_statuses_to_expected_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_status_error(status, b"{\"info\":{\"statuscode\":500}}");
        let matches = match expected {
            "Denied" => matches!(error, MileageSourceError::Denied { .. }),
            "Timeout" => matches!(error, MileageSourceError::Timeout { .. }),
            "Transport" => matches!(error, MileageSourceError::Transport { .. }),
            other => panic!("unsupported test expectation: {other}"),
        };
        assert!(matches, "{status} should map to {expected}");
    }

    #[test]
    fn parses_route_distance_into_whole_miles() {
        let body = r#"{
            "route": { "distance": 412.43 },
            "info": { "statuscode": 0, "messages": [] }
        }"#;

        let miles = parse_distance(body.as_bytes()).expect("payload should decode");
        assert_eq!(miles, Miles::new(412));
    }

    #[test]
    fn provider_error_status_is_a_decode_failure() {
        let body = r#"{
            "info": { "statuscode": 402, "messages": ["We are unable to route with the given locations."] }
        }"#;

        let error = parse_distance(body.as_bytes()).expect_err("decode should fail");
        match error {
            MileageSourceError::Decode { message } => {
                assert!(message.contains("402"));
                assert!(message.contains("unable to route"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_route_is_a_decode_failure() {
        let body = r#"{ "info": { "statuscode": 0 } }"#;
        let error = parse_distance(body.as_bytes()).expect_err("decode should fail");
        assert!(matches!(error, MileageSourceError::Decode { .. }));
    }

    #[test]
    fn negative_distance_is_a_decode_failure() {
        let body = r#"{
            "route": { "distance": -3.0 },
            "info": { "statuscode": 0 }
        }"#;
        let error = parse_distance(body.as_bytes()).expect_err("decode should fail");
        assert!(matches!(error, MileageSourceError::Decode { .. }));
    }

    #[test]
    fn malformed_json_is_a_decode_failure() {
        let error = parse_distance(b"not json").expect_err("decode should fail");
        assert!(matches!(error, MileageSourceError::Decode { .. }));
    }

    #[test]
    fn stops_are_formatted_as_city_comma_state() {
        let location = Location::new("El Paso", "TX").expect("valid location");
        assert_eq!(format_stop(&location), "El Paso,TX");
    }
}
