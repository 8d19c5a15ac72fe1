//! HTTP failure mapping shared by the Google adapters.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::domain::ports::{DirectionsProviderError, PlacesProviderError};

#[derive(Debug, Deserialize)]
struct ErrorEnvelopeDto {
    error: ErrorDto,
}

#[derive(Debug, Deserialize)]
struct ErrorDto {
    status: Option<String>,
}

pub(super) fn places_transport_error(error: &reqwest::Error) -> PlacesProviderError {
    if error.is_timeout() {
        PlacesProviderError::timeout(error.to_string())
    } else if error.is_decode() {
        PlacesProviderError::decode(error.to_string())
    } else {
        PlacesProviderError::transport(error.to_string())
    }
}

pub(super) fn places_status_error(status: StatusCode, body: &[u8]) -> PlacesProviderError {
    let message = status_message(status, body);
    match status {
        StatusCode::TOO_MANY_REQUESTS => PlacesProviderError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PlacesProviderError::timeout(message)
        }
        _ if status.is_client_error() => PlacesProviderError::rejected(message),
        _ => PlacesProviderError::transport(message),
    }
}

pub(super) fn directions_transport_error(error: &reqwest::Error) -> DirectionsProviderError {
    DirectionsProviderError::transport(error.to_string())
}

/// Map a failed Routes call onto the provider status the user sees.
///
/// The canonical status from the error envelope wins; bodies without one fall
/// back to a status derived from the HTTP code.
pub(super) fn directions_status_error(status: StatusCode, body: &[u8]) -> DirectionsProviderError {
    let reported = serde_json::from_slice::<ErrorEnvelopeDto>(body)
        .ok()
        .and_then(|envelope| envelope.error.status)
        .filter(|reported| !reported.trim().is_empty());
    let code = reported.unwrap_or_else(|| {
        match status {
            StatusCode::TOO_MANY_REQUESTS => "OVER_QUERY_LIMIT",
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => "REQUEST_DENIED",
            StatusCode::NOT_FOUND => "NOT_FOUND",
            _ if status.is_client_error() => "INVALID_REQUEST",
            _ => "UNKNOWN_ERROR",
        }
        .to_owned()
    });
    DirectionsProviderError::status(code)
}

fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, "RateLimited")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::forbidden(StatusCode::FORBIDDEN, "Rejected")]
    #[case::not_found(StatusCode::NOT_FOUND, "Rejected")]
    #[case::server_error(StatusCode::BAD_GATEWAY, "Transport")]
    fn places_statuses_map_to_port_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = places_status_error(status, br#"{"error":{"message":"nope"}}"#);
        let matched = match expected {
            "RateLimited" => matches!(error, PlacesProviderError::RateLimited { .. }),
            "Timeout" => matches!(error, PlacesProviderError::Timeout { .. }),
            "Rejected" => matches!(error, PlacesProviderError::Rejected { .. }),
            "Transport" => matches!(error, PlacesProviderError::Transport { .. }),
            _ => panic!("unsupported test expectation: {expected}"),
        };
        assert!(matched, "{status} mapped to {error:?}");
    }

    #[test]
    fn status_message_carries_a_compact_body_preview() {
        let error = places_status_error(
            StatusCode::BAD_REQUEST,
            b"{\n  \"error\": {\n    \"message\": \"bad mask\"\n  }\n}",
        );
        assert_eq!(
            error.to_string(),
            r#"places request rejected: status 400: { "error": { "message": "bad mask" } }"#
        );
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[rstest]
    #[case::envelope(
        StatusCode::FORBIDDEN,
        br#"{"error":{"code":403,"status":"PERMISSION_DENIED"}}"#.as_slice(),
        "PERMISSION_DENIED"
    )]
    #[case::throttled(StatusCode::TOO_MANY_REQUESTS, b"".as_slice(), "OVER_QUERY_LIMIT")]
    #[case::denied(StatusCode::UNAUTHORIZED, b"<html/>".as_slice(), "REQUEST_DENIED")]
    #[case::upstream(StatusCode::SERVICE_UNAVAILABLE, b"".as_slice(), "UNKNOWN_ERROR")]
    fn routes_statuses_become_directions_codes(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: &str,
    ) {
        assert_eq!(directions_status_error(status, body).status_code(), expected);
    }
}
