//! Unverified JWT claims for routing decisions.
//!
//! Guards only need to know which access level a token claims in order to
//! pick a landing page, so the payload is decoded without checking the
//! signature. Signature verification stays with the API: a tampered token
//! can change which page the browser asks for, but every request that page
//! sends is still rejected server-side.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;

use crate::api::AccessLevel;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String,
    pub access_level: AccessLevel,
    #[serde(default)]
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    #[error("token is not a three-part JWT")]
    Malformed,
    #[error("token payload is not base64url")]
    Encoding,
    #[error("token payload is not a claims object")]
    Shape,
}

pub fn decode_unverified(token: &str) -> Result<Claims, ClaimsError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(ClaimsError::Malformed);
    };
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| ClaimsError::Encoding)?;
    serde_json::from_slice(&bytes).map_err(|_| ClaimsError::Shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::unsigned_token;

    #[test]
    fn decodes_the_payload_without_checking_the_signature() {
        let token = unsigned_token("u1", "campusAdmin");
        let claims = decode_unverified(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.access_level, AccessLevel::CampusAdmin);
    }

    #[test]
    fn rejects_tokens_without_three_segments() {
        assert_eq!(decode_unverified("onlyone"), Err(ClaimsError::Malformed));
        assert_eq!(decode_unverified("two.parts"), Err(ClaimsError::Malformed));
        assert_eq!(decode_unverified("a.b.c.d"), Err(ClaimsError::Malformed));
        assert_eq!(decode_unverified(""), Err(ClaimsError::Malformed));
    }

    #[test]
    fn rejects_payloads_that_are_not_base64url() {
        assert_eq!(decode_unverified("h.$$$.s"), Err(ClaimsError::Encoding));
    }

    #[test]
    fn rejects_payloads_with_the_wrong_shape() {
        let payload = URL_SAFE_NO_PAD.encode(b"[1,2]");
        let token = format!("h.{payload}.s");
        assert_eq!(decode_unverified(&token), Err(ClaimsError::Shape));
    }

    #[test]
    fn rejects_unknown_access_levels() {
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"u1","accessLevel":"superuser"}"#);
        let token = format!("h.{payload}.s");
        assert_eq!(decode_unverified(&token), Err(ClaimsError::Shape));
    }
}
