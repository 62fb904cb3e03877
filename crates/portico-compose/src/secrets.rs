use portico_core::{SecretsSource, ServiceDescriptor};

/// Resolves the secret-manager part of a service's environment.
pub struct SecretsInjector<'a, S: SecretsSource> {
    source: &'a S,
}

impl<'a, S: SecretsSource> SecretsInjector<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Environment names taken from the secret manager, or `None` when the
    /// service does not use it.
    ///
    /// Every `doppler = true` service queries the source again; nothing is
    /// cached between services.
    pub async fn environment(
        &self,
        service: &ServiceDescriptor,
    ) -> portico_core::Result<Option<Vec<String>>> {
        if !service.doppler {
            return Ok(None);
        }
        let names = self.source.fetch_secrets().await?;
        tracing::debug!(service = %service.name, secrets = names.len(), "injected secrets");
        Ok(Some(names))
    }
}
