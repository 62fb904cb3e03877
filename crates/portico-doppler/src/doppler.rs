#[derive(Debug, thiserror::Error)]
pub enum DopplerError {
    #[error("{command} CLI not found — install: https://docs.doppler.com/docs/install-cli")]
    NotFound {
        command: String,
        source: std::io::Error,
    },

    #[error("{command} command failed: {args:?}\n{stderr}")]
    CommandFailed {
        command: String,
        args: Vec<String>,
        stderr: String,
    },

    #[error("{command} output was not valid UTF-8")]
    InvalidUtf8 {
        command: String,
        source: std::string::FromUtf8Error,
    },

    #[error("secrets payload is not valid JSON")]
    InvalidPayload { source: serde_json::Error },

    #[error("secrets payload is not a JSON object")]
    NotAnObject,
}
