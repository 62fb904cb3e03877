use crate::doppler::DopplerError;

/// Abstraction over secret-manager CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait DopplerExecutor {
    /// Execute the CLI with `args` and capture stdout.
    async fn exec(&self, args: &[String]) -> Result<String, DopplerError>;
}

/// Runs the real CLI binary.
pub struct RealExecutor {
    command: String,
}

impl RealExecutor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for RealExecutor {
    fn default() -> Self {
        Self::new("doppler")
    }
}

impl DopplerExecutor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, DopplerError> {
        use std::process::Stdio;

        tracing::debug!(command = %self.command, ?args, "running secret manager");
        let output = tokio::process::Command::new(&self.command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| DopplerError::NotFound {
                command: self.command.clone(),
                source: e,
            })?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| DopplerError::InvalidUtf8 {
                command: self.command.clone(),
                source: e,
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(DopplerError::CommandFailed {
                command: self.command.clone(),
                args: args.to_vec(),
                stderr,
            })
        }
    }
}
