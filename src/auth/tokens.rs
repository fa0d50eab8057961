// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 bearer tokens.
//!
//! Tokens are stateless: nothing is stored server-side, so a token stays
//! valid until it expires. Logout is a client-side no-op and a leaked token
//! cannot be revoked early.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use ring::rand::{SecureRandom, SystemRandom};

use super::claims::{AuthenticatedUser, Claims};
use super::AuthError;

/// Token lifetime (24 hours).
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Random secret length when none is configured.
const GENERATED_SECRET_LEN: usize = 32;

/// Issues and verifies bearer tokens with a server secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Service keyed with a fresh random secret. Tokens do not survive a
    /// restart.
    pub fn random() -> Result<Self, AuthError> {
        let mut secret = [0u8; GENERATED_SECRET_LEN];
        SystemRandom::new()
            .fill(&mut secret)
            .map_err(|_| AuthError::Internal("failed to generate token secret".into()))?;
        Ok(Self::new(&secret))
    }

    /// Issue a token for `user_id`, valid for [`TOKEN_TTL_SECS`] from now.
    pub fn issue(&self, user_id: i64) -> Result<String, AuthError> {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    /// Issue a token as if it had been signed at `issued_at` (Unix seconds).
    pub fn issue_at(&self, user_id: i64, issued_at: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECS,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }

    /// Verify signature and expiry; fails closed.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;
        AuthenticatedUser::from_claims(&data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    fn service() -> TokenService {
        TokenService::new(b"test-secret-with-enough-entropy!")
    }

    #[test]
    fn round_trip_returns_subject() {
        let tokens = service();
        let token = tokens.issue(7).unwrap();
        let user = tokens.verify(&token).unwrap();
        assert_eq!(user.user_id, 7);
        assert_eq!(user.expires_at - user.issued_at, TOKEN_TTL_SECS);
    }

    #[test]
    fn valid_until_just_before_expiry() {
        let tokens = service();
        let issued = Utc::now().timestamp() - TOKEN_TTL_SECS + 30;
        let token = tokens.issue_at(7, issued).unwrap();
        assert_eq!(tokens.verify(&token).unwrap().user_id, 7);
    }

    #[test]
    fn expired_token_is_typed() {
        let tokens = service();
        let issued = Utc::now().timestamp() - TOKEN_TTL_SECS - 2 * CLOCK_SKEW_LEEWAY as i64;
        let token = tokens.issue_at(7, issued).unwrap();
        assert_eq!(tokens.verify(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn foreign_secret_is_invalid() {
        let token = TokenService::new(b"another-secret").issue(7).unwrap();
        assert_eq!(service().verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn tampered_subject_is_invalid() {
        let tokens = service();
        let token = tokens.issue(7).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let mut claims: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        claims["sub"] = serde_json::json!("1");
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(claims.to_string()),
            parts[2]
        );
        assert_eq!(tokens.verify(&forged), Err(AuthError::InvalidToken));
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(service().verify("not-a-token"), Err(AuthError::InvalidToken));
        assert_eq!(service().verify(""), Err(AuthError::InvalidToken));
    }

    #[test]
    fn random_services_do_not_share_keys() {
        let a = TokenService::random().unwrap();
        let b = TokenService::random().unwrap();
        let token = a.issue(1).unwrap();
        assert!(a.verify(&token).is_ok());
        assert!(b.verify(&token).is_err());
    }
}
