//! Layered configuration built from several providers.
//!
//! Providers are consulted last-added first, so secrets registered after an
//! in-memory defaults layer override those defaults.

use std::fmt;
use std::path::PathBuf;

use secrecy::SecretString;

use crate::loader::{SecretsError, SecretsSource, SecretsSourceBuilder};
use crate::provider::{ConfigProvider, MemoryProvider, SecretsProvider};

/// Collects providers and loads them into a [`Configuration`].
#[derive(Default)]
pub struct ConfigurationBuilder {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl ConfigurationBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider; later providers take precedence.
    pub fn add_provider<P: ConfigProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Append fixed key/value pairs.
    pub fn add_in_memory<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.add_provider(MemoryProvider::new(pairs))
    }

    /// Append a secrets directory provider.
    pub fn add_docker_secrets(self, source: SecretsSource) -> Self {
        self.add_provider(SecretsProvider::new(source))
    }

    /// Append `/run/secrets` with the `__` placeholder and no prefix filter.
    pub fn add_docker_secrets_with_defaults(self) -> Self {
        self.add_docker_secrets(SecretsSource::default_source())
    }

    /// Append the default secrets directory, filtered by the comma-separated
    /// prefixes held in the environment variable `prefixes_var`.
    ///
    /// # Errors
    ///
    /// Returns `SecretsError::InvalidConfiguration` if `prefixes_var` is blank.
    pub fn add_docker_secrets_from_env(self, prefixes_var: &str) -> Result<Self, SecretsError> {
        self.add_docker_secrets_from_env_in(prefixes_var, None, None)
    }

    /// Like [`add_docker_secrets_from_env`](Self::add_docker_secrets_from_env),
    /// with an optional directory and placeholder. `None` falls back to
    /// `/run/secrets` and `__`.
    ///
    /// # Errors
    ///
    /// Returns `SecretsError::InvalidConfiguration` if `prefixes_var` is blank.
    pub fn add_docker_secrets_from_env_in(
        self,
        prefixes_var: &str,
        secrets_dir: Option<PathBuf>,
        placeholder: Option<String>,
    ) -> Result<Self, SecretsError> {
        let mut builder = SecretsSourceBuilder::new().with_allowed_prefixes_from_env(prefixes_var)?;
        if let Some(dir) = secrets_dir {
            builder = builder.with_secrets_dir(dir);
        }
        if let Some(placeholder) = placeholder {
            builder = builder.with_placeholder(placeholder);
        }
        let source = builder.with_defaults().build()?;
        Ok(self.add_docker_secrets(source))
    }

    /// Load every provider in registration order.
    ///
    /// # Errors
    ///
    /// Returns the first provider load error.
    pub fn build(self) -> Result<Configuration, SecretsError> {
        let mut configuration = Configuration {
            providers: self.providers,
        };
        configuration.reload()?;
        Ok(configuration)
    }
}

/// Loaded configuration with case-insensitive lookup across providers.
pub struct Configuration {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl fmt::Debug for ConfigurationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ConfigurationBuilder")
            .field("providers", &names)
            .finish()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl Configuration {
    /// Value for `key` from the most recently added provider that has it.
    pub fn get(&self, key: &str) -> Option<&SecretString> {
        self.providers
            .iter()
            .rev()
            .find_map(|provider| provider.try_get(key))
    }

    /// Re-run every provider's load.
    ///
    /// # Errors
    ///
    /// Returns the first provider load error; later providers are not reloaded.
    pub fn reload(&mut self) -> Result<(), SecretsError> {
        for provider in &mut self.providers {
            provider.load()?;
            tracing::debug!(provider = provider.name(), "Configuration provider loaded");
        }
        Ok(())
    }

    /// Provider names in registration order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}
