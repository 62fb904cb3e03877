use serde::{Deserialize, Serialize};

/// portico.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PorticoConfig {
    #[serde(default)]
    pub compose: ComposeConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// Compose file format version written to the `version` block
    #[serde(default = "default_compose_version")]
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// External docker network shared with the Traefik container
    #[serde(default = "default_network")]
    pub network: String,
    /// Prefix put in front of every generated label
    #[serde(default = "default_label_namespace")]
    pub label_namespace: String,
    /// Entrypoint of the TLS router
    #[serde(default = "default_secure_entrypoint")]
    pub secure_entrypoint: String,
    /// Entrypoint of the plaintext redirect router
    #[serde(default = "default_plain_entrypoint")]
    pub plain_entrypoint: String,
    /// Certificate resolver attached to host-scoped TLS routers
    #[serde(default = "default_cert_resolver")]
    pub cert_resolver: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Secret manager executable
    #[serde(default = "default_secrets_command")]
    pub command: String,
    /// Arguments producing a JSON object of secrets on stdout
    #[serde(default = "default_secrets_args")]
    pub args: Vec<String>,
    /// Secret names starting with this prefix are never exported
    #[serde(default = "default_reserved_prefix")]
    pub reserved_prefix: String,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            version: default_compose_version(),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            label_namespace: default_label_namespace(),
            secure_entrypoint: default_secure_entrypoint(),
            plain_entrypoint: default_plain_entrypoint(),
            cert_resolver: default_cert_resolver(),
        }
    }
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            command: default_secrets_command(),
            args: default_secrets_args(),
            reserved_prefix: default_reserved_prefix(),
        }
    }
}

impl PorticoConfig {
    /// Load from portico.toml in the given directory, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        Self::load_file(&project_dir.join("portico.toml"))
    }

    /// Load from an explicit path, or return defaults if the file does not exist.
    pub fn load_file(config_path: &std::path::Path) -> crate::Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(config_path).map_err(|e| crate::Error::ConfigLoad {
                path: config_path.to_path_buf(),
                source: e,
            })?;
        toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }
}

fn default_compose_version() -> String {
    "3.8".to_owned()
}

fn default_network() -> String {
    "traefik".to_owned()
}

fn default_label_namespace() -> String {
    "traefik".to_owned()
}

fn default_secure_entrypoint() -> String {
    "web-secure".to_owned()
}

fn default_plain_entrypoint() -> String {
    "web".to_owned()
}

fn default_cert_resolver() -> String {
    "default".to_owned()
}

fn default_secrets_command() -> String {
    "doppler".to_owned()
}

fn default_secrets_args() -> Vec<String> {
    vec!["secrets".to_owned(), "--json".to_owned()]
}

fn default_reserved_prefix() -> String {
    "DOPPLER".to_owned()
}
