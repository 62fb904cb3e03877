use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── Source document and configuration ──
    #[error("{path} not found")]
    SourceNotFound { path: PathBuf },

    #[error("failed to read {path}")]
    SourceRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    SourceParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("`{name}` is not a table of service options")]
    InvalidServiceEntry { name: String },

    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Service entries ──
    #[error("`{field}` is not a list, map, or string, key conflict")]
    InvalidFieldShape { field: String },

    #[error("{value} is not a valid value for `restart` option")]
    InvalidRestartPolicy { value: String },

    #[error("invalid public url {value:?}: {reason}")]
    InvalidPublicUrl { value: String, reason: String },

    #[error("secrets retrieval failed")]
    SecretsRetrievalFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{service}")]
    Service {
        service: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the name of the service whose entry produced this error.
    pub fn for_service(self, service: &str) -> Self {
        match self {
            already @ Error::Service { .. } => already,
            other => Error::Service {
                service: service.to_owned(),
                source: Box::new(other),
            },
        }
    }

    /// Whether the error comes from a service entry rather than from reading
    /// the source document or configuration.
    pub fn is_domain(&self) -> bool {
        match self {
            Error::Service { source, .. } => source.is_domain(),
            Error::InvalidFieldShape { .. }
            | Error::InvalidRestartPolicy { .. }
            | Error::InvalidPublicUrl { .. }
            | Error::SecretsRetrievalFailed { .. } => true,
            Error::SourceNotFound { .. }
            | Error::SourceRead { .. }
            | Error::SourceParse { .. }
            | Error::InvalidServiceEntry { .. }
            | Error::ConfigLoad { .. }
            | Error::ConfigParse { .. } => false,
        }
    }
}
