use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use std::{error::Error as StdError, fmt};

use crate::authz::principal::{Principal, SUBJECT_CLAIM};

// Errors returned by access-token verification + strict claim validation.
#[derive(Debug)]
pub enum AccessJwtError {
    Jwt(jsonwebtoken::errors::Error),
    MissingOrInvalidAud,
    EmptyClaim(&'static str),
}

impl fmt::Display for AccessJwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::MissingOrInvalidAud => write!(f, "missing or invalid 'aud' claim"),
            Self::EmptyClaim(name) => write!(f, "empty '{}' claim", name),
        }
    }
}

impl StdError for AccessJwtError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AccessJwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

fn aud_is_present_and_valid(aud: Option<&Value>) -> bool {
    match aud {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(arr)) => arr.iter().any(|v| match v {
            Value::String(s) => !s.trim().is_empty(),
            _ => false,
        }),
        _ => false,
    }
}

/// EdDSA (Ed25519) access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
/// - The whole payload is kept (in token order) and handed out as a `Principal`.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthService {
    pub fn new(
        access_public_key_pem: &str,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, AccessJwtError> {
        let decoding_key = DecodingKey::from_ed_pem(access_public_key_pem.as_bytes())?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.validate_nbf = true;
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify signature + registered claims, then convert the payload into a `Principal`.
    ///
    /// `jsonwebtoken::Validation` checks signature, `exp`, `nbf`, `iss` and `aud`.
    /// On top of that:
    /// - `iss` / `aud` must not be blank
    /// - `sub`, when present, must not be blank
    ///
    /// A token without `sub` is still a valid authentication; resource checks deny it later.
    pub fn verify(&self, token: &str) -> Result<Principal, AccessJwtError> {
        let data =
            jsonwebtoken::decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)?;
        let payload = data.claims;

        let iss_blank = payload
            .get("iss")
            .and_then(Value::as_str)
            .is_none_or(|s| s.trim().is_empty());
        if iss_blank {
            return Err(AccessJwtError::EmptyClaim("iss"));
        }
        if !aud_is_present_and_valid(payload.get("aud")) {
            return Err(AccessJwtError::MissingOrInvalidAud);
        }
        if let Some(sub) = payload.get(SUBJECT_CLAIM)
            && sub.as_str().is_none_or(|s| s.trim().is_empty())
        {
            return Err(AccessJwtError::EmptyClaim("sub"));
        }

        Ok(Principal::from_payload(&payload))
    }
}
