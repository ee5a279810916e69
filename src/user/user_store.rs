use anyhow::Result;

/// Lookup of stored user credentials.
pub trait CredentialStore: Send + Sync {
    /// Whether exactly one user matches `username` with `password`, compared
    /// byte for byte against the stored password.
    ///
    /// Errors are storage failures, a wrong password is `Ok(false)`.
    fn check_password(&self, username: &str, password: &[u8]) -> Result<bool>;
}
