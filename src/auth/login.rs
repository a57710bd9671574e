use crate::auth::{AuthError, PasswordHasher, TokenService};
use crate::types::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// What the login flow needs to know about an admin account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    /// Principal identifier the token will be issued to
    pub principal: Uuid,
    /// bcrypt hash of the account password
    pub password_hash: String,
}

/// Lookup of stored credentials by email.
///
/// Implemented by [`RugStore`](crate::db::RugStore); mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// Returns the credential for `email`, or `None` if no admin has it.
    async fn lookup_credential(&self, email: &str) -> Result<Option<StoredCredential>>;
}

/// Email/password login producing a bearer token.
pub struct LoginService {
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
    /// Verified against when the email is unknown so both failure paths cost one bcrypt run.
    dummy_hash: String,
}

impl LoginService {
    /// Creates the login service. Computes one hash up front, so call it off the async runtime
    /// when using the production cost.
    pub fn new(hasher: PasswordHasher, tokens: Arc<TokenService>) -> Result<Self> {
        let dummy_hash = hasher.hash_password("unknown-account-placeholder")?;
        Ok(Self {
            hasher,
            tokens,
            dummy_hash,
        })
    }

    /// Checks `email`/`password` against `store` and issues a token on success.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller:
    /// both return [`AuthError::CredentialMismatch`].
    pub async fn authenticate(
        &self,
        store: &dyn PrincipalStore,
        email: &str,
        password: &str,
    ) -> Result<String> {
        let credential = store.lookup_credential(email).await?;

        let (principal, hash) = match credential {
            Some(c) => (Some(c.principal), c.password_hash),
            None => (None, self.dummy_hash.clone()),
        };

        let matches = self
            .hasher
            .verify_password_async(password.to_string(), hash)
            .await?;

        let principal = match (principal, matches) {
            (Some(principal), true) => principal,
            _ => {
                tracing::info!("login rejected");
                return Err(AuthError::CredentialMismatch.into());
            }
        };

        let token = self.tokens.issue(principal)?;
        tracing::info!(%principal, "admin logged in");

        Ok(token)
    }
}
