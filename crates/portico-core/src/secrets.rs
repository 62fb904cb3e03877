/// Source of environment variable names for services with `doppler = true`.
///
/// Production code uses the doppler CLI client, tests substitute a double.
#[allow(async_fn_in_trait)]
pub trait SecretsSource {
    /// Names of the secrets to pass through to the container, in the order
    /// the secret manager reports them. Reserved names are already removed.
    async fn fetch_secrets(&self) -> crate::Result<Vec<String>>;
}

/// A source that always yields the same names.
#[derive(Debug, Clone, Default)]
pub struct StaticSecrets(pub Vec<String>);

impl SecretsSource for StaticSecrets {
    async fn fetch_secrets(&self) -> crate::Result<Vec<String>> {
        Ok(self.0.clone())
    }
}
