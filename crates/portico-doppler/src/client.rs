use portico_core::{SecretsConfig, SecretsSource};

use crate::doppler::DopplerError;
use crate::executor::{DopplerExecutor, RealExecutor};

/// Secret names from `doppler secrets --json`, parameterized over the
/// executor for testability.
pub struct DopplerClient<E: DopplerExecutor = RealExecutor> {
    executor: E,
    args: Vec<String>,
    reserved_prefix: String,
}

impl DopplerClient<RealExecutor> {
    pub fn new(config: &SecretsConfig) -> Self {
        Self::with_executor(RealExecutor::new(config.command.clone()), config)
    }
}

impl<E: DopplerExecutor> DopplerClient<E> {
    pub fn with_executor(executor: E, config: &SecretsConfig) -> Self {
        Self {
            executor,
            args: config.args.clone(),
            reserved_prefix: config.reserved_prefix.clone(),
        }
    }

    /// Names of all secrets in the active config, minus reserved ones.
    pub async fn secret_names(&self) -> Result<Vec<String>, DopplerError> {
        let output = self.executor.exec(&self.args).await?;
        let names = parse_names(&output, &self.reserved_prefix)?;
        tracing::info!(secrets = names.len(), "fetched secret names");
        Ok(names)
    }
}

impl<E: DopplerExecutor> SecretsSource for DopplerClient<E> {
    async fn fetch_secrets(&self) -> portico_core::Result<Vec<String>> {
        self.secret_names()
            .await
            .map_err(|e| portico_core::Error::SecretsRetrievalFailed {
                source: Box::new(e),
            })
    }
}

/// Top-level keys of the JSON payload, in payload order.
fn parse_names(output: &str, reserved_prefix: &str) -> Result<Vec<String>, DopplerError> {
    let payload: serde_json::Value =
        serde_json::from_str(output).map_err(|e| DopplerError::InvalidPayload { source: e })?;
    let serde_json::Value::Object(secrets) = payload else {
        return Err(DopplerError::NotAnObject);
    };
    Ok(secrets
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| !name.starts_with(reserved_prefix))
        .collect())
}
