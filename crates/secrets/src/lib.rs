//! Configuration provider for container secrets mounted as files.
//!
//! Orchestrators such as Docker Swarm and Kubernetes expose each secret as a
//! file in a well-known directory (`/run/secrets` by default). This crate
//! turns that directory into configuration: every filename becomes a key,
//! with a placeholder token (`__` by default) standing in for the `:` section
//! separator, and every file's content becomes the value.
//!
//! ```no_run
//! use docker_secrets::{ConfigProvider, SecretsSourceBuilder};
//! use secrecy::ExposeSecret;
//!
//! let source = SecretsSourceBuilder::new()
//!     .from_env()
//!     .with_defaults()
//!     .build()?;
//!
//! let mut provider = source.provider();
//! provider.load()?;
//! if let Some(password) = provider.try_get("database:password") {
//!     let _ = password.expose_secret();
//! }
//! # Ok::<(), docker_secrets::SecretsError>(())
//! ```

pub mod configuration;
pub mod constants;
pub mod fs;
mod loader;
mod map;
pub mod provider;
mod transform;

pub use configuration::{Configuration, ConfigurationBuilder};
pub use fs::{MemoryFileSystem, OsFileSystem, SecretsFileSystem};
pub use loader::{
    SecretsError, SecretsSource, SecretsSourceBuilder, env_var_or_none, parse_prefixes,
    prefixes_from_env,
};
pub use map::{SecretEntry, SecretsMap};
pub use provider::{ConfigProvider, MemoryProvider, SecretsProvider};
pub use transform::{derive_key, fold_key};
