use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, get_current_timestamp, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Clone)]
pub struct Keys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl Keys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Bearer credential payload. `sub` carries the external auth id, which is
/// 1:1 linked to an internal profile but never equal to its primary key.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthClaims {
    iss: String,
    pub sub: String,
    aud: String,
    exp: i64,
    iat: u64,

    pub email: String,
    pub name: String,
}

impl AuthClaims {
    pub fn new(auth_id: &str, email: &str, name: &str, domain: &str) -> Self {
        Self {
            iss: domain.to_owned(),
            sub: auth_id.to_owned(),
            aud: domain.to_owned(),
            exp: (Utc::now() + Duration::days(1)).timestamp(),
            iat: get_current_timestamp(),
            email: email.to_owned(),
            name: name.to_owned(),
        }
    }
}

pub fn create_token(
    auth_id: &str,
    email: &str,
    name: &str,
    domain: &str,
    encoding: &EncodingKey,
) -> Result<String, AppError> {
    encode(
        &Header::default(),
        &AuthClaims::new(auth_id, email, name, domain),
        encoding,
    )
    .map_err(AppError::JWTError)
}

pub fn decode_claims(
    token: &str,
    domain: &str,
    decoding: &DecodingKey,
) -> Result<AuthClaims, AppError> {
    decode::<AuthClaims>(token, decoding, &create_validator(domain))
        .map(|data| data.claims)
        .map_err(AppError::JWTError)
}

fn create_validator(domain: &str) -> Validation {
    let mut validation = Validation::default();
    validation.set_audience(&[domain]);
    validation.set_issuer(&[domain]);
    validation.set_required_spec_claims(&["iss", "sub", "aud", "exp"]);
    validation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let keys = Keys::new(b"secret");
        let token = create_token("auth-1", "a@kudu.app", "Ana", "kudu.app", &keys.encoding)
            .expect("token");
        let claims = decode_claims(&token, "kudu.app", &keys.decoding).expect("claims");
        assert_eq!(claims.sub, "auth-1");
        assert_eq!(claims.name, "Ana");
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let keys = Keys::new(b"secret");
        let token = create_token("auth-1", "a@kudu.app", "Ana", "kudu.app", &keys.encoding)
            .expect("token");
        assert!(decode_claims(&token, "other.app", &keys.decoding).is_err());
    }
}
