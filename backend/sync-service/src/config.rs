//! Service configuration, loaded from an optional TOML file plus
//! `SYNC__`-prefixed environment variables.

use std::path::Path;

use common_utils::CustomResult;
use domain_types::types::{AuthorizedotnetConfig, Environment as ProcessorEnvironment};
use error_stack::ResultExt;
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to load configuration")]
    Load,
    #[error("configuration failed validation")]
    Invalid,
}

/// Authorize.Net credentials and environment selection.
#[derive(Debug, Deserialize)]
pub struct AuthorizedotnetSettings {
    pub api_login_id: SecretString,
    pub transaction_key: SecretString,
    pub signature_key: SecretString,
    pub public_client_key: String,
    pub environment: ProcessorEnvironment,
}

/// Commerce-platform endpoint for transaction event reporting.
#[derive(Debug, Deserialize)]
pub struct PlatformSettings {
    pub api_url: Url,
    pub auth_token: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// Externally reachable base URL of this service.
    pub app_base_url: Url,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub authorizedotnet: AuthorizedotnetSettings,
    pub platform: PlatformSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings, environment variables overriding file values.
    /// `SYNC__AUTHORIZEDOTNET__API_LOGIN_ID` maps to
    /// `authorizedotnet.api_login_id`.
    pub fn load(file: Option<&Path>) -> CustomResult<Self, ConfigurationError> {
        let mut builder = config::Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file).required(true));
        }
        let loaded = builder
            .add_source(config::Environment::with_prefix("SYNC").separator("__"))
            .build()
            .change_context(ConfigurationError::Load)?;

        loaded
            .try_deserialize()
            .change_context(ConfigurationError::Invalid)
    }

    /// Split into the connector configuration and the platform settings.
    pub fn into_parts(self) -> (AuthorizedotnetConfig, PlatformSettings) {
        let connector = AuthorizedotnetConfig {
            api_login_id: self.authorizedotnet.api_login_id,
            transaction_key: self.authorizedotnet.transaction_key,
            signature_key: self.authorizedotnet.signature_key,
            public_client_key: self.authorizedotnet.public_client_key,
            environment: self.authorizedotnet.environment,
            app_base_url: self.server.app_base_url,
        };
        (connector, self.platform)
    }
}
