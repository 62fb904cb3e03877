//! Core types and configuration for portico.
//!
//! This crate defines the `services.toml` entry model ([`ServiceDescriptor`]),
//! normalization of list/table/string fields, the `public` URL shorthand,
//! the `portico.toml` schema ([`PorticoConfig`]), and shared error types.

pub mod config;
pub mod error;
pub mod field;
pub mod public_url;
pub mod secrets;
pub mod service;
pub mod source;

pub use config::{ComposeConfig, PorticoConfig, ProxyConfig, SecretsConfig};
pub use error::{Error, Result};
pub use public_url::PublicUrl;
pub use secrets::{SecretsSource, StaticSecrets};
pub use service::{RestartPolicy, ServiceDescriptor};
pub use source::{DEFAULT_SOURCE, ServicesFile};
