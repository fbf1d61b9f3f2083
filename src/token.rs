use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::JwtSettings,
    models::{Account, Role},
};

/// Claims
///
/// The payload signed into every issued token. Derived per login, never
/// persisted. Verification checks the signature, expiry, issuer, and
/// audience; any tampered byte invalidates the signature.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account id.
    pub sub: i32,
    pub email: String,
    /// Comma-joined role names, e.g. "User" or "Admin,User".
    pub roles: String,
    /// Expiration time (seconds since epoch).
    pub exp: usize,
    /// Issued-at time (seconds since epoch).
    pub iat: usize,
    pub iss: String,
    pub aud: String,
}

/// TokenIssuer
///
/// Signs and verifies HMAC-SHA256 tokens with the shared key from
/// [`JwtSettings`]. Expiry is `now + expiry_minutes` at issue time.
#[derive(Clone)]
pub struct TokenIssuer {
    settings: JwtSettings,
}

impl TokenIssuer {
    pub fn new(settings: JwtSettings) -> Self {
        Self { settings }
    }

    /// Builds the claim set for an account and signs it.
    pub fn issue(
        &self,
        account: &Account,
        roles: &[Role],
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let expiry = now + Duration::minutes(self.settings.expiry_minutes);

        let claims = Claims {
            sub: account.id,
            email: account.email.clone(),
            roles: roles
                .iter()
                .map(|r| r.name())
                .collect::<Vec<_>>()
                .join(","),
            exp: expiry.timestamp() as usize,
            iat: now.timestamp() as usize,
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
        };

        let key = EncodingKey::from_secret(self.settings.key.as_bytes());
        encode(&Header::default(), &claims, &key)
    }

    /// Verifies a token against the shared key, rejecting bad signatures,
    /// expired tokens, and issuer/audience mismatches.
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let key = DecodingKey::from_secret(self.settings.key.as_bytes());

        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.set_issuer(&[&self.settings.issuer]);
        validation.set_audience(&[&self.settings.audience]);

        decode::<Claims>(token, &key, &validation).map(|data| data.claims)
    }
}
