//! `Authorization: Basic` header parsing

use super::AuthError;
use axum::http::HeaderValue;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;

/// Username and secret taken from a Basic authorization header
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parse the raw header. An absent or empty header is `MissingCredentials`,
    /// anything else that is not a well-formed Basic value is `InvalidCredentials`.
    pub fn from_header(header: Option<&HeaderValue>) -> Result<Self, AuthError> {
        let header = header.ok_or(AuthError::MissingCredentials)?;
        if header.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let value = header.to_str().map_err(|_| AuthError::InvalidCredentials)?;
        Self::parse(value)
    }

    pub fn parse(value: &str) -> Result<Self, AuthError> {
        if value.trim().is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let (scheme, encoded) = value
            .trim_start()
            .split_once(' ')
            .ok_or(AuthError::InvalidCredentials)?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(AuthError::InvalidCredentials);
        }

        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        let raw = STANDARD
            .decode(encoded)
            .map_err(|_| AuthError::InvalidCredentials)?;
        let decoded = String::from_utf8(raw).map_err(|_| AuthError::InvalidCredentials)?;

        // The secret may itself contain colons; the username may not.
        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::InvalidCredentials)?;
        Ok(Self::new(username, password))
    }

    /// Render as a header value, `Basic <base64(username:password)>`
    pub fn to_header_value(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {encoded}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn test_parse_valid_header() {
        let credentials = Credentials::parse(&basic("alice:s3cret")).unwrap();
        assert_eq!(credentials, Credentials::new("alice", "s3cret"));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let encoded = STANDARD.encode("alice:pw");
        for scheme in ["basic", "BASIC", "bAsIc"] {
            let credentials = Credentials::parse(&format!("{scheme} {encoded}")).unwrap();
            assert_eq!(credentials.username, "alice");
        }
    }

    #[test]
    fn test_split_at_first_colon() {
        let credentials = Credentials::parse(&basic("bob:pa:ss:word")).unwrap();
        assert_eq!(credentials.username, "bob");
        assert_eq!(credentials.password, "pa:ss:word");

        let credentials = Credentials::parse(&basic("carol:")).unwrap();
        assert_eq!(credentials.password, "");
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            Credentials::from_header(None),
            Err(AuthError::MissingCredentials)
        ));
        let empty = HeaderValue::from_static("");
        assert!(matches!(
            Credentials::from_header(Some(&empty)),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_malformed_headers_are_invalid() {
        let cases = [
            "Bearer abc.def.ghi".to_string(),
            "Basic".to_string(),
            "Basic ".to_string(),
            "Basicdd".to_string(),
            "Basic !!!not-base64!!!".to_string(),
            basic("no-colon-here"),
            format!("Digest {}", STANDARD.encode("alice:pw")),
        ];
        for case in cases {
            assert!(
                matches!(Credentials::parse(&case), Err(AuthError::InvalidCredentials)),
                "{case}"
            );
        }
    }

    #[test]
    fn test_non_utf8_payload_is_invalid() {
        let header = format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':', b'x']));
        assert!(matches!(
            Credentials::parse(&header),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_header_value_round_trips() {
        let credentials = Credentials::new("dave", "hunter:2");
        assert_eq!(Credentials::parse(&credentials.to_header_value()).unwrap(), credentials);
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("erin", "topsecret"));
        assert!(rendered.contains("erin"));
        assert!(!rendered.contains("topsecret"));
    }
}
