//! Access token issuer implementation

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::domain::entities::token::AccessClaims;
use crate::errors::TokenError;

use super::cipher::PayloadCipher;
use super::config::TokenServiceConfig;

/// Mints and verifies HS256 access tokens carrying an encrypted identity.
///
/// Encrypt-then-sign: the identity is sealed into `data` first and the whole
/// claim set is then signed, so `jti`/`exp` stay readable without the
/// encryption key.
pub struct TokenIssuer {
    config: TokenServiceConfig,
    cipher: PayloadCipher,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    /// Creates a new token issuer
    ///
    /// # Returns
    ///
    /// `TokenError::Signing` if the secret is empty or the encryption key is
    /// not 32 bytes
    pub fn new(config: TokenServiceConfig) -> Result<Self, TokenError> {
        if config.jwt_secret.is_empty() {
            return Err(TokenError::Signing {
                reason: "signing secret is empty".to_string(),
            });
        }
        let cipher = PayloadCipher::new(&config.encrypt_key)?;

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.validate_aud = false;
        // expiry is checked after decode with no leeway, see `parse_and_verify_at`
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            config,
            cipher,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Access token lifetime
    pub fn access_ttl(&self) -> Duration {
        self.config.access_token_ttl
    }

    /// Generates an access token for `identity`, issued now
    pub fn generate_access_token(&self, identity: &Identity) -> Result<String, TokenError> {
        self.generate_access_token_at(identity, Utc::now())
    }

    /// Generates an access token as if issued at `issued_at`
    pub fn generate_access_token_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let payload = serde_json::to_vec(identity).map_err(|e| TokenError::Signing {
            reason: format!("identity serialization failed: {}", e),
        })?;

        let claims = AccessClaims {
            jti: Uuid::new_v4().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.config.access_token_ttl).timestamp(),
            iss: self.config.issuer.clone(),
            data: Some(self.cipher.seal(&payload)?),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            TokenError::Signing {
                reason: e.to_string(),
            }
        })
    }

    /// Verifies structure, signature and expiry, in that order
    pub fn parse_and_verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.parse_and_verify_at(token, Utc::now())
    }

    /// Same as [`parse_and_verify`](Self::parse_and_verify) against a fixed clock
    pub fn parse_and_verify_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessClaims, TokenError> {
        let claims = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                other => {
                    tracing::debug!(error = ?other, "Rejected malformed access token");
                    TokenError::Malformed
                }
            })?;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Recovers the identity sealed in `claims.data`
    pub fn decrypt_payload(&self, claims: &AccessClaims) -> Result<Identity, TokenError> {
        let sealed = claims.data.as_deref().ok_or_else(|| TokenError::Decryption {
            reason: "missing data claim".to_string(),
        })?;

        let plaintext = self.cipher.open(sealed)?;
        serde_json::from_slice(&plaintext).map_err(|e| TokenError::Decryption {
            reason: format!("invalid identity payload: {}", e),
        })
    }
}
