use crate::auth::AuthError;

/// bcrypt work factor used for admin passwords.
pub const DEFAULT_COST: u32 = 14;

/// bcrypt only looks at the first 72 bytes of its input.
const MAX_PASSWORD_BYTES: usize = 72;

/// Credential Store Adapter: salted, adaptive password hashing with bcrypt.
///
/// Hashes are modular-crypt strings (`$2b$14$...`), so existing `$2a$` rows
/// verify as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    /// Creates a hasher with a custom bcrypt cost. Tests use this to keep hashing cheap.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// The bcrypt cost this hasher produces hashes with.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// Passwords longer than 72 bytes are rejected instead of silently truncated.
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::Hashing);
        }

        bcrypt::hash(password, self.cost).map_err(|e| {
            tracing::error!(error = %e, "failed to hash password");
            AuthError::Hashing
        })
    }

    /// Checks a candidate password against a stored hash.
    ///
    /// A malformed stored hash is reported as a mismatch, and so is a
    /// candidate longer than 72 bytes: bcrypt would only compare its prefix.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }

        match bcrypt::verify(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash could not be checked");
                false
            }
        }
    }

    /// [`hash_password`](Self::hash_password) on the blocking pool.
    pub async fn hash_password_async(&self, password: String) -> Result<String, AuthError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|_| AuthError::Hashing)?
    }

    /// [`verify_password`](Self::verify_password) on the blocking pool.
    pub async fn verify_password_async(
        &self,
        password: String,
        hash: String,
    ) -> Result<bool, AuthError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|_| AuthError::Hashing)
    }
}
