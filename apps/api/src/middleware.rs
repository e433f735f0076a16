use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use welfare_core::{AppError, UserIdentity};

use crate::error::ApiResult;
use crate::state::AppState;

/// Shared secret proving the request passed through the authentication gateway.
pub const GATEWAY_SECRET_HEADER: &str = "x-gateway-secret";
/// Subject claim forwarded by the authentication gateway.
pub const SUBJECT_HEADER: &str = "x-user-subject";
/// Display name forwarded by the authentication gateway.
pub const DISPLAY_NAME_HEADER: &str = "x-user-name";
/// Email forwarded by the authentication gateway.
pub const EMAIL_HEADER: &str = "x-user-email";

pub async fn require_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = identity_from_headers(request.headers(), state.gateway_secret.as_str())?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Reads the forwarded identity once the gateway secret has been verified.
///
/// Identity headers are ignored entirely when the secret is absent or wrong.
pub fn identity_from_headers(
    headers: &HeaderMap,
    gateway_secret: &str,
) -> Result<UserIdentity, AppError> {
    let presented = header_value(headers, GATEWAY_SECRET_HEADER)
        .ok_or_else(|| AppError::Unauthorized("request did not pass the gateway".to_owned()))?;
    if !secrets_match(presented, gateway_secret) {
        return Err(AppError::Unauthorized(
            "request did not pass the gateway".to_owned(),
        ));
    }

    let subject = header_value(headers, SUBJECT_HEADER)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;
    let display_name = header_value(headers, DISPLAY_NAME_HEADER).unwrap_or(subject);
    let email = header_value(headers, EMAIL_HEADER).map(str::to_owned);

    Ok(UserIdentity::new(subject, display_name, email))
}

// Compares every byte so the time taken does not depend on the matching prefix.
fn secrets_match(presented: &str, expected: &str) -> bool {
    if expected.is_empty() || presented.len() != expected.len() {
        return false;
    }

    presented
        .bytes()
        .zip(expected.bytes())
        .fold(0_u8, |difference, (left, right)| difference | (left ^ right))
        == 0
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};
    use welfare_core::AppError;

    use super::{
        DISPLAY_NAME_HEADER, GATEWAY_SECRET_HEADER, SUBJECT_HEADER, identity_from_headers,
    };

    const SECRET: &str = "gateway-secret";

    fn gateway_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(GATEWAY_SECRET_HEADER, HeaderValue::from_static(SECRET));
        headers
    }

    #[test]
    fn missing_subject_is_unauthorized() {
        let result = identity_from_headers(&gateway_headers(), SECRET);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn blank_subject_is_unauthorized() {
        let mut headers = gateway_headers();
        headers.insert(SUBJECT_HEADER, HeaderValue::from_static("   "));

        let result = identity_from_headers(&headers, SECRET);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn forwarded_subject_without_gateway_secret_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(SUBJECT_HEADER, HeaderValue::from_static("admin-1"));

        let result = identity_from_headers(&headers, SECRET);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn forwarded_subject_with_wrong_gateway_secret_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(GATEWAY_SECRET_HEADER, HeaderValue::from_static("guessed-secret"));
        headers.insert(SUBJECT_HEADER, HeaderValue::from_static("admin-1"));

        let result = identity_from_headers(&headers, SECRET);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn empty_configured_secret_rejects_everything() {
        let mut headers = HeaderMap::new();
        headers.insert(GATEWAY_SECRET_HEADER, HeaderValue::from_static(""));
        headers.insert(SUBJECT_HEADER, HeaderValue::from_static("admin-1"));

        let result = identity_from_headers(&headers, "");
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn display_name_defaults_to_subject() {
        let mut headers = gateway_headers();
        headers.insert(SUBJECT_HEADER, HeaderValue::from_static("collector-7"));

        let identity = identity_from_headers(&headers, SECRET);
        assert!(identity.is_ok());
        let identity = identity.unwrap_or_else(|_| unreachable!());
        assert_eq!(identity.subject(), "collector-7");
        assert_eq!(identity.display_name(), "collector-7");
        assert_eq!(identity.email(), None);
    }

    #[test]
    fn display_name_header_is_used_when_present() {
        let mut headers = gateway_headers();
        headers.insert(SUBJECT_HEADER, HeaderValue::from_static("collector-7"));
        headers.insert(DISPLAY_NAME_HEADER, HeaderValue::from_static("Ngozi"));

        let identity = identity_from_headers(&headers, SECRET).unwrap_or_else(|_| unreachable!());
        assert_eq!(identity.display_name(), "Ngozi");
    }
}
