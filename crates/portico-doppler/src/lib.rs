//! Doppler CLI integration for portico.
//!
//! [`DopplerClient`] implements [`portico_core::SecretsSource`] by running
//! `doppler secrets --json` and exporting the secret names, so compose passes
//! the values through from the environment `docker compose` runs in.

pub mod client;
pub mod doppler;
pub mod executor;

pub use client::DopplerClient;
pub use doppler::DopplerError;
pub use executor::{DopplerExecutor, RealExecutor};
