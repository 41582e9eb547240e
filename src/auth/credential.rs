use axum::http::{header, HeaderMap};

/// Dedicated API key header
pub const API_KEY_HEADER: &str = "x-api-key";

const BEARER_PREFIX: &str = "Bearer ";

/// Outcome of checking a request credential against the configured secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// No credential was presented
    Unauthenticated,
    /// A credential was presented but does not match
    Forbidden,
    Authenticated,
}

/// Verifies the shared-secret credential carried by inbound requests.
///
/// The expected secret is fixed at construction. When no secret is
/// configured, every presented credential is rejected as `Forbidden`.
#[derive(Debug, Clone)]
pub struct CredentialGate {
    expected: Option<String>,
}

impl CredentialGate {
    pub fn new(expected: Option<String>) -> Self {
        Self { expected }
    }

    pub fn is_configured(&self) -> bool {
        self.expected.is_some()
    }

    /// Compare a presented credential against the configured secret
    pub fn authenticate(&self, credential: Option<&str>) -> AuthOutcome {
        let Some(presented) = credential.filter(|c| !c.is_empty()) else {
            return AuthOutcome::Unauthenticated;
        };

        match &self.expected {
            Some(expected) if presented == expected => AuthOutcome::Authenticated,
            _ => AuthOutcome::Forbidden,
        }
    }
}

/// Extract the credential from `x-api-key`, falling back to
/// `Authorization: Bearer <key>`. The dedicated header wins when both are set.
pub fn extract_credential(headers: &HeaderMap) -> Option<&str> {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());

    api_key.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.strip_prefix(BEARER_PREFIX).unwrap_or(v))
            .filter(|v| !v.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn gate() -> CredentialGate {
        CredentialGate::new(Some("secret-key".to_string()))
    }

    #[test]
    fn test_missing_credential() {
        assert_eq!(gate().authenticate(None), AuthOutcome::Unauthenticated);
        assert_eq!(gate().authenticate(Some("")), AuthOutcome::Unauthenticated);
    }

    #[test]
    fn test_wrong_credential() {
        assert_eq!(gate().authenticate(Some("nope")), AuthOutcome::Forbidden);
        // Full-string equality only
        assert_eq!(gate().authenticate(Some("secret-key ")), AuthOutcome::Forbidden);
        assert_eq!(gate().authenticate(Some("secret")), AuthOutcome::Forbidden);
    }

    #[test]
    fn test_valid_credential() {
        assert_eq!(
            gate().authenticate(Some("secret-key")),
            AuthOutcome::Authenticated
        );
    }

    #[test]
    fn test_unconfigured_gate_rejects_everything() {
        let gate = CredentialGate::new(None);
        assert!(!gate.is_configured());
        assert_eq!(gate.authenticate(Some("anything")), AuthOutcome::Forbidden);
        assert_eq!(gate.authenticate(None), AuthOutcome::Unauthenticated);
    }

    #[test]
    fn test_extract_from_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("k1"));
        assert_eq!(extract_credential(&headers), Some("k1"));
    }

    #[test]
    fn test_extract_from_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer k2"));
        assert_eq!(extract_credential(&headers), Some("k2"));
    }

    #[test]
    fn test_api_key_header_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("k1"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer k2"));
        assert_eq!(extract_credential(&headers), Some("k1"));
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract_credential(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_credential(&headers), None);
    }
}
