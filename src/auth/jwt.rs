use crate::auth::AuthError;
use crate::types::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer tag embedded in every token.
pub const ISSUER: &str = "custom-rugs-app";

/// Fixed token lifetime.
pub const TOKEN_TTL_HOURS: i64 = 6;

/// Claims carried by an admin bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal the token was issued to
    pub sub: Uuid,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
    /// Always [`ISSUER`]
    pub iss: String,
}

/// Token Service: mints and verifies HS256 bearer tokens.
///
/// Built once at startup from the configured secret and shared read-only
/// behind an `Arc`. The secret cannot be swapped on a live service; restart
/// the process to rotate it.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service signing with `secret`.
    ///
    /// Fails if the secret is empty.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(AppError::Config(
                "JWT secret must not be empty".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the caller's clock in `verify_claims_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Issues a token for `principal`, valid for [`TOKEN_TTL_HOURS`] from now.
    pub fn issue(&self, principal: Uuid) -> std::result::Result<String, AuthError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        principal: Uuid,
        now: DateTime<Utc>,
    ) -> std::result::Result<String, AuthError> {
        let claims = Claims {
            sub: principal,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
            iss: ISSUER.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "failed to sign token");
            AuthError::Signing
        })
    }

    /// Verifies `token` and returns the principal it was issued to.
    pub fn verify(&self, token: &str) -> std::result::Result<Uuid, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies `token` against the clock value `now`.
    pub fn verify_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<Uuid, AuthError> {
        self.verify_claims_at(token, now).map(|claims| claims.sub)
    }

    /// Verifies `token` against `now` and returns its full claims.
    ///
    /// Every failure collapses into [`AuthError::InvalidToken`]; the reason is
    /// only logged at debug level.
    pub fn verify_claims_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(reason = %e, "token rejected");
                AuthError::InvalidToken
            })?;

        if now.timestamp() >= claims.exp {
            tracing::debug!(principal = %claims.sub, exp = claims.exp, "token expired");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }
}
