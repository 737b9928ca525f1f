use base64::alphabet::URL_SAFE;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde_json::Value;

use crate::error::{SessionError, SessionResult};
use crate::roles::Role;

/// base64url, tolerant of both padded and unpadded segments.
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims the gate reads out of a session credential.
#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub role: Role,
    /// POSIX seconds. `None` means the credential never expires locally.
    pub expires_at: Option<i64>,
}

impl SessionClaims {
    /// A credential with `exp = T` is live strictly before `T`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(exp) if exp <= now)
    }
}

/// Decodes the payload segment of a signed-claims credential.
///
/// The signature is NOT verified. The signing key never ships to this
/// side, so the resulting role only drives what the portal shows; every
/// backend endpoint must authorize the request on its own.
pub fn decode_unverified(credential: &str) -> SessionResult<SessionClaims> {
    let segments: Vec<&str> = credential.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(SessionError::MalformedStructure(segments.len()));
    }

    let payload = SEGMENT_ENGINE
        .decode(segments[1])
        .map_err(|err| SessionError::InvalidEncoding(err.to_string()))?;
    let raw: Value =
        serde_json::from_slice(&payload).map_err(|err| SessionError::InvalidJson(err.to_string()))?;

    SessionClaims::try_from(raw)
}

impl TryFrom<Value> for SessionClaims {
    type Error = SessionError;

    fn try_from(value: Value) -> SessionResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| SessionError::InvalidJson("claims payload is not an object".into()))?;

        let role = match object.get("role") {
            Some(Value::String(role)) => Role::from_claim(role),
            Some(other) => return Err(SessionError::InvalidClaim("role", other.to_string())),
            None => return Err(SessionError::MissingClaim("role")),
        };

        let expires_at = match object.get("exp") {
            None | Some(Value::Null) => None,
            Some(Value::Number(number)) => Some(numeric_date(number)?),
            Some(other) => return Err(SessionError::InvalidClaim("exp", other.to_string())),
        };

        Ok(Self { role, expires_at })
    }
}

// NumericDate may carry a fractional part; whole seconds are enough here.
// Out-of-range values saturate, so a huge `exp` reads as the far future.
fn numeric_date(number: &serde_json::Number) -> SessionResult<i64> {
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }
    if number.as_u64().is_some() {
        return Ok(i64::MAX);
    }
    match number.as_f64() {
        Some(value) if !value.is_nan() => Ok(value.floor() as i64),
        _ => Err(SessionError::InvalidClaim("exp", number.to_string())),
    }
}

/// Encodes a claims object as an unsigned three-segment credential.
/// Handy for fixtures and local tooling; never accepted by a real backend.
pub fn encode_unsigned(claims: &Value) -> String {
    let header = SEGMENT_ENGINE.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = SEGMENT_ENGINE.encode(claims.to_string());
    format!("{header}.{payload}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_role_and_expiry() {
        let token = encode_unsigned(&json!({ "role": "teacher", "exp": 1_700_000_000 }));
        let claims = decode_unverified(&token).expect("decodes");
        assert_eq!(claims.role, Role::Teacher);
        assert_eq!(claims.expires_at, Some(1_700_000_000));
    }

    #[test]
    fn missing_exp_never_expires() {
        let token = encode_unsigned(&json!({ "role": "admin" }));
        let claims = decode_unverified(&token).expect("decodes");
        assert_eq!(claims.expires_at, None);
        assert!(!claims.is_expired_at(i64::MAX));
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let token = encode_unsigned(&json!({ "role": "admin", "exp": 100 }));
        let claims = decode_unverified(&token).expect("decodes");
        assert!(!claims.is_expired_at(99));
        assert!(claims.is_expired_at(100));
        assert!(claims.is_expired_at(101));
    }

    #[test]
    fn fractional_exp_is_floored() {
        let token = encode_unsigned(&json!({ "role": "admin", "exp": 100.75 }));
        let claims = decode_unverified(&token).expect("decodes");
        assert_eq!(claims.expires_at, Some(100));
    }

    #[test]
    fn oversized_exp_saturates_to_far_future() {
        let token = encode_unsigned(&json!({ "role": "admin", "exp": u64::MAX }));
        let claims = decode_unverified(&token).expect("decodes");
        assert_eq!(claims.expires_at, Some(i64::MAX));
        assert!(!claims.is_expired_at(4_102_444_800));

        let token = encode_unsigned(&json!({ "role": "admin", "exp": 1e300 }));
        let claims = decode_unverified(&token).expect("decodes");
        assert_eq!(claims.expires_at, Some(i64::MAX));

        let token = encode_unsigned(&json!({ "role": "admin", "exp": -1e300 }));
        let claims = decode_unverified(&token).expect("decodes");
        assert!(claims.is_expired_at(0));
    }

    #[test]
    fn padded_payload_is_accepted() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"role": "manager"}"#);
        assert!(payload.ends_with('='));
        let token = format!("e30.{payload}.sig");
        let claims = decode_unverified(&token).expect("decodes padded");
        assert_eq!(claims.role, Role::Manager);
    }

    #[test]
    fn unknown_role_passes_through() {
        let token = encode_unsigned(&json!({ "role": "Librarian" }));
        let claims = decode_unverified(&token).expect("decodes");
        assert_eq!(claims.role, Role::Unknown("Librarian".into()));
    }

    #[test]
    fn rejects_wrong_segment_count() {
        for input in ["", "abc", "a.b", "a.b.c.d"] {
            let err = decode_unverified(input).expect_err("should reject");
            assert!(matches!(err, SessionError::MalformedStructure(_)), "{input}: {err:?}");
        }
    }

    #[test]
    fn rejects_bad_base64_and_bad_json() {
        let err = decode_unverified("a.!!!.c").expect_err("bad base64");
        assert!(matches!(err, SessionError::InvalidEncoding(_)));

        let not_json = SEGMENT_ENGINE.encode("role=admin");
        let err = decode_unverified(&format!("a.{not_json}.c")).expect_err("bad json");
        assert!(matches!(err, SessionError::InvalidJson(_)));

        let array = SEGMENT_ENGINE.encode("[1,2]");
        let err = decode_unverified(&format!("a.{array}.c")).expect_err("not an object");
        assert!(matches!(err, SessionError::InvalidJson(_)));
    }

    #[test]
    fn rejects_missing_or_mistyped_claims() {
        let err = decode_unverified(&encode_unsigned(&json!({ "sub": "x" }))).expect_err("no role");
        assert!(matches!(err, SessionError::MissingClaim("role")));

        let err = decode_unverified(&encode_unsigned(&json!({ "role": 7 }))).expect_err("numeric role");
        assert!(matches!(err, SessionError::InvalidClaim("role", _)));

        let err = decode_unverified(&encode_unsigned(&json!({ "role": "admin", "exp": "soon" })))
            .expect_err("string exp");
        assert!(matches!(err, SessionError::InvalidClaim("exp", _)));
    }
}
