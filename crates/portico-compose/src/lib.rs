//! Traefik label synthesis and docker-compose assembly for portico.
//!
//! # Generation pipeline
//!
//! ```text
//! portico
//!   1. Load        ── services.toml → ServicesFile (declaration order kept)
//!   2. Describe    ── ServiceDescriptor::build() per entry
//!   3. Route       ── RoutingLabels::apply() for entries with `public`
//!   4. Secrets     ── SecretsInjector for entries with `doppler = true`
//!   5. Assemble    ── DocumentAssembler → ComposeDocument
//!   6. Serialize   ── yaml::to_yaml() → docker-compose.yml or stdout
//! ```
//!
//! # Routing shapes
//!
//! A `public` URL with a path prefix (`host/prefix`) is mounted behind an
//! existing TLS host and gets a strip-prefix middleware. Without a prefix the
//! service owns the host: it gets a certificate resolver and a plaintext
//! router that redirects to HTTPS.

pub mod document;
pub mod output;
pub mod routing;
pub mod secrets;
pub mod yaml;

pub use document::{ComposeDocument, ComposeService, DocumentAssembler};
pub use output::{DEFAULT_OUTPUT, Destination};
pub use routing::{RouteShape, RoutingLabels};
pub use secrets::SecretsInjector;
