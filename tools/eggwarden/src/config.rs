//! Connection settings
//!
//! Layered lowest to highest: built-in defaults, `eggwarden.toml` (or the
//! file given with `--config`), `EGGWARDEN_` environment variables, then
//! command-line flags. Whatever no layer supplied is asked for on the
//! terminal before connecting.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use dialoguer::{theme::Theme, Input, Password};
use figment::{
    providers::{Env, Format, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "eggwarden.toml";
pub const ENV_PREFIX: &str = "EGGWARDEN_";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_USERNAME: &str = "pterodactyl";
pub const DEFAULT_DATABASE: &str = "panel";

/// Connection values as supplied by the layers; `None` means nobody set it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// Root of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseOverrides,
}

impl AppConfig {
    /// Merge every layer. `flags` wins over everything else.
    ///
    /// An explicit `config_path` must exist; the default file is optional.
    pub fn load(config_path: Option<&Path>, flags: DatabaseOverrides) -> Result<Self> {
        let mut figment = Figment::new();

        figment = match config_path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                merge_file(figment, path)
            },
            None => figment.merge(Toml::file(DEFAULT_CONFIG_FILE)),
        };

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Serialized::defaults(AppConfig { database: flags }))
            .extract()
            .context("Invalid configuration")
    }
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}

/// Fully resolved connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl DatabaseOverrides {
    /// Fill the gaps with built-in defaults, without asking
    pub fn with_defaults(self) -> DatabaseConfig {
        DatabaseConfig {
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: self.port.unwrap_or(DEFAULT_PORT),
            username: self.username.unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            password: self.password.unwrap_or_default(),
            database: self.database.unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        }
    }

    /// Ask for every missing value, defaults pre-filled. The password is
    /// read hidden.
    pub fn prompt_missing(self, theme: &dyn Theme) -> Result<DatabaseConfig> {
        let host = match self.host {
            Some(host) => host,
            None => Input::<String>::with_theme(theme)
                .with_prompt("MySQL host")
                .default(DEFAULT_HOST.to_string())
                .interact_text()?,
        };
        let port = match self.port {
            Some(port) => port,
            None => Input::<u16>::with_theme(theme)
                .with_prompt("MySQL port")
                .default(DEFAULT_PORT)
                .interact_text()?,
        };
        let username = match self.username {
            Some(username) => username,
            None => Input::<String>::with_theme(theme)
                .with_prompt("MySQL username")
                .default(DEFAULT_USERNAME.to_string())
                .interact_text()?,
        };
        let password = match self.password {
            Some(password) => password,
            None => Password::with_theme(theme)
                .with_prompt("MySQL password")
                .allow_empty_password(true)
                .interact()?,
        };
        let database = match self.database {
            Some(database) => database,
            None => Input::<String>::with_theme(theme)
                .with_prompt("Database name")
                .default(DEFAULT_DATABASE.to_string())
                .interact_text()?,
        };

        Ok(DatabaseConfig {
            host,
            port,
            username,
            password,
            database,
        })
    }
}

impl DatabaseConfig {
    /// `mysql://` URL with user and password percent-encoded
    pub fn connection_url(&self) -> Result<String> {
        let mut url = Url::parse("mysql://localhost/").context("Failed to build base URL")?;
        url.set_host(Some(&self.host))
            .with_context(|| format!("Invalid host: {}", self.host))?;
        url.set_port(Some(self.port))
            .map_err(|()| anyhow!("Cannot set port {}", self.port))?;
        url.set_username(&self.username)
            .map_err(|()| anyhow!("Invalid username: {}", self.username))?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|()| anyhow!("Password cannot be encoded"))?;
        }
        url.set_path(&self.database);
        Ok(url.into())
    }

    /// `user@host:port/database`, safe to log
    pub fn target(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.username, self.host, self.port, self.database
        )
    }
}
