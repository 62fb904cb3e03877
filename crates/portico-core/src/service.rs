use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use toml::{Table, Value};

use crate::field::normalize_entry;
use crate::public_url::PublicUrl;

/// Container restart policy accepted by docker compose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    #[default]
    Always,
    OnFailure,
    UnlessStopped,
    No,
}

impl RestartPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestartPolicy::Always => "always",
            RestartPolicy::OnFailure => "on-failure",
            RestartPolicy::UnlessStopped => "unless-stopped",
            RestartPolicy::No => "no",
        }
    }
}

impl FromStr for RestartPolicy {
    type Err = crate::Error;

    /// Case-insensitive.
    fn from_str(s: &str) -> crate::Result<Self> {
        let value = s.to_lowercase();
        match value.as_str() {
            "always" => Ok(RestartPolicy::Always),
            "on-failure" => Ok(RestartPolicy::OnFailure),
            "unless-stopped" => Ok(RestartPolicy::UnlessStopped),
            "no" => Ok(RestartPolicy::No),
            _ => Err(crate::Error::InvalidRestartPolicy { value }),
        }
    }
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully normalized description of one `[service]` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub name: String,
    pub image: String,
    pub url: PublicUrl,
    pub labels: Vec<String>,
    pub envs: Vec<String>,
    pub volumes: Vec<String>,
    pub ports: Vec<String>,
    pub networks: Vec<String>,
    pub restart: RestartPolicy,
    /// Pull the environment from the secret manager
    pub doppler: bool,
    /// Let watchtower auto-update the container
    pub watchtower: bool,
}

impl ServiceDescriptor {
    /// Build a descriptor from the raw entry stored under `name`.
    pub fn build(name: &str, entry: &Table) -> crate::Result<Self> {
        let public = string_field(entry, "public")?.unwrap_or_default();
        let restart = match string_field(entry, "restart")? {
            Some(raw) => raw.parse()?,
            None => RestartPolicy::default(),
        };

        let descriptor = Self {
            name: name.to_owned(),
            image: string_field(entry, "image")?.unwrap_or_default(),
            url: PublicUrl::parse(&public)?,
            labels: normalize_entry(entry, "labels")?,
            envs: normalize_entry(entry, "envs")?,
            volumes: normalize_entry(entry, "volumes")?,
            ports: normalize_entry(entry, "ports")?,
            networks: normalize_entry(entry, "networks")?,
            restart,
            doppler: bool_field(entry, "doppler")?,
            watchtower: bool_field(entry, "watchtower")?,
        };

        tracing::debug!(
            service = %descriptor.name,
            host = %descriptor.url.host,
            restart = %descriptor.restart,
            "built service descriptor"
        );
        Ok(descriptor)
    }

    pub fn is_public(&self) -> bool {
        !self.url.host.is_empty()
    }
}

fn string_field(entry: &Table, field: &str) -> crate::Result<Option<String>> {
    match entry.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(crate::Error::InvalidFieldShape {
            field: field.to_owned(),
        }),
    }
}

fn bool_field(entry: &Table, field: &str) -> crate::Result<bool> {
    match entry.get(field) {
        None => Ok(false),
        Some(Value::Boolean(b)) => Ok(*b),
        Some(_) => Err(crate::Error::InvalidFieldShape {
            field: field.to_owned(),
        }),
    }
}
