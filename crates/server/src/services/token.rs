//! Stateless bearer tokens.
//!
//! Tokens are signed JWTs carrying the subject id and role. They are never
//! persisted: verification is a signature plus expiry check, with no
//! database lookup. There is no server-side revocation; logout is a
//! client-side discard, and a token stays valid until its expiry passes.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use amal_core::{Role, UserId};

/// Token lifetime: two hours from issuance.
pub const TOKEN_TTL_SECS: i64 = 2 * 60 * 60;

const ISSUER: &str = "amal-server";

/// Claims carried by a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: i32,
    /// Role at issuance. Role changes take effect at the next login.
    pub role: Role,
    /// Issued-at timestamp (unix seconds).
    pub iat: i64,
    /// Expiry timestamp (unix seconds).
    pub exp: i64,
    /// Issuer.
    pub iss: String,
}

/// Mints and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Create a token service from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
        }
    }

    /// Mint a token for the given identity, expiring in two hours.
    ///
    /// # Errors
    ///
    /// Returns `jsonwebtoken::errors::Error` if signing fails.
    pub fn mint(
        &self,
        user_id: UserId,
        role: Role,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.as_i32(),
            role,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
            iss: ISSUER.to_owned(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verify a token's signature, expiry, and issuer.
    ///
    /// # Errors
    ///
    /// Returns `jsonwebtoken::errors::Error` if the token is malformed,
    /// the signature does not match, the token has expired, or the issuer
    /// is wrong.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);

        decode::<Claims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&SecretString::from(secret.to_owned()))
    }

    #[test]
    fn test_mint_and_verify() {
        let tokens = service("UtZ8#kP3$wQ9!nM5@bV1&xC7*eR4^tY6");
        let token = tokens.mint(UserId::new(42), Role::Volunteer).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Volunteer);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_garbage_token_fails() {
        let tokens = service("UtZ8#kP3$wQ9!nM5@bV1&xC7*eR4^tY6");
        assert!(tokens.verify("not-a-token").is_err());
        assert!(tokens.verify("").is_err());
    }

    #[test]
    fn test_wrong_secret_fails() {
        let minter = service("UtZ8#kP3$wQ9!nM5@bV1&xC7*eR4^tY6");
        let verifier = service("Gd2@hJ6%sL0!fA8#qW3$zX5^cN9&mB1*");

        let token = minter.mint(UserId::new(1), Role::Admin).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_fails() {
        let tokens = service("UtZ8#kP3$wQ9!nM5@bV1&xC7*eR4^tY6");

        // Forge a token whose lifetime has already passed
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: Role::Beneficiary,
            iat: now - 2 * TOKEN_TTL_SECS,
            exp: now - TOKEN_TTL_SECS,
            iss: ISSUER.to_owned(),
        };
        let token = encode(&Header::default(), &claims, &tokens.encoding_key).unwrap();

        let err = tokens.verify(&token).unwrap_err();
        assert_eq!(
            err.kind(),
            &jsonwebtoken::errors::ErrorKind::ExpiredSignature
        );
    }

    #[test]
    fn test_wrong_issuer_fails() {
        let tokens = service("UtZ8#kP3$wQ9!nM5@bV1&xC7*eR4^tY6");

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: Role::Admin,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
            iss: "someone-else".to_owned(),
        };
        let token = encode(&Header::default(), &claims, &tokens.encoding_key).unwrap();

        assert!(tokens.verify(&token).is_err());
    }
}
