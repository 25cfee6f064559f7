//! Server configuration.
//!
//! Values are layered, lowest precedence first: built-in defaults, a TOML
//! file, `LDN_*` environment variables, then command-line flags (applied by
//! the binary).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result, StatusPolicy};

/// Default API endpoint of the ESIP community ontology registry.
pub const DEFAULT_REGISTRY_API_URL: &str = "http://cor.esipfed.org/ont/api/v0";
/// Default IRI the inbox graph is published under in the registry.
pub const DEFAULT_REGISTRY_INBOX_IRI: &str = "http://cor.esipfed.org/ont/ldn/inbox";

/// Where notifications are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StorageMode {
    /// In process memory, lost on restart.
    #[default]
    #[serde(rename = "mem", alias = "memory")]
    Memory,
    /// In a remote ontology registry.
    #[serde(rename = "registry", alias = "esip_cor")]
    Registry,
}

impl FromStr for StorageMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mem" | "memory" => Ok(Self::Memory),
            "registry" | "esip_cor" => Ok(Self::Registry),
            other => Err(Error::Config(format!(
                "unknown storage mode '{}' (expected 'mem' or 'registry')",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("mem"),
            Self::Registry => f.write_str("registry"),
        }
    }
}

/// Connection settings for the ontology registry backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of the registry API, without a trailing slash.
    pub api_url: String,
    /// IRI of the inbox graph inside the registry.
    pub inbox_iri: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Organization new notification entries are registered under.
    pub org_name: Option<String>,
    /// Timeout for each registry call, in seconds.
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_REGISTRY_API_URL.to_string(),
            inbox_iri: DEFAULT_REGISTRY_INBOX_IRI.to_string(),
            username: None,
            password: None,
            org_name: None,
            timeout_secs: 10,
        }
    }
}

/// Configuration for the `InboxServer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxConfig {
    /// The host address to bind the server to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Public scheme and host of the server, used to build the inbox IRI.
    pub base_url: String,
    /// Path the inbox is mounted at, with leading and trailing `/`.
    pub inbox_path: String,
    /// Overrides the derived inbox IRI (e.g. behind a reverse proxy).
    pub inbox_iri: Option<String>,
    pub storage: StorageMode,
    pub registry: Option<RegistryConfig>,
    /// Answer malformed notification POSTs with 500 instead of 400/415.
    pub legacy_status_codes: bool,
    /// If `true`, Cross-Origin Resource Sharing (CORS) headers will be enabled.
    pub cors_enabled: bool,
    /// If `true`, HTTP request tracing will be enabled.
    pub tracing: bool,
}

impl Default for InboxConfig {
    /// Returns a default configuration suitable for local development.
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8088,
            base_url: "http://127.0.0.1".to_string(),
            inbox_path: "/inbox/".to_string(),
            inbox_iri: None,
            storage: StorageMode::Memory,
            registry: None,
            legacy_status_codes: false,
            cors_enabled: true,
            tracing: true,
        }
    }
}

impl InboxConfig {
    /// Load configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.inbox_path = normalize_path(&config.inbox_path);
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Overrides values from `LDN_*` environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overrides values from an arbitrary variable lookup.
    ///
    /// Recognized keys: `LDN_HOST`, `LDN_PORT`, `LDN_BASE_URL`,
    /// `LDN_INBOX_PATH`, `LDN_INBOX_IRI`, `LDN_STORAGE`,
    /// `LDN_LEGACY_STATUS_CODES`, `LDN_REGISTRY_API_URL`,
    /// `LDN_REGISTRY_INBOX_IRI`, `LDN_REGISTRY_USERNAME`,
    /// `LDN_REGISTRY_PASSWORD` and `LDN_REGISTRY_ORG`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("LDN_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("LDN_PORT") {
            self.port = port
                .parse()
                .map_err(|_| Error::Config(format!("LDN_PORT is not a valid port: {}", port)))?;
        }
        if let Some(base_url) = lookup("LDN_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(path) = lookup("LDN_INBOX_PATH") {
            self.inbox_path = normalize_path(&path);
        }
        if let Some(iri) = lookup("LDN_INBOX_IRI") {
            self.inbox_iri = Some(iri);
        }
        if let Some(storage) = lookup("LDN_STORAGE") {
            self.storage = storage.parse()?;
        }
        if let Some(flag) = lookup("LDN_LEGACY_STATUS_CODES") {
            self.legacy_status_codes = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        let registry_vars = [
            "LDN_REGISTRY_API_URL",
            "LDN_REGISTRY_INBOX_IRI",
            "LDN_REGISTRY_USERNAME",
            "LDN_REGISTRY_PASSWORD",
            "LDN_REGISTRY_ORG",
        ]
        .map(|key| lookup(key));
        if registry_vars.iter().any(Option::is_some) {
            let [api_url, inbox_iri, username, password, org_name] = registry_vars;
            let registry = self.registry.get_or_insert_with(RegistryConfig::default);
            if let Some(api_url) = api_url {
                registry.api_url = api_url;
            }
            if let Some(inbox_iri) = inbox_iri {
                registry.inbox_iri = inbox_iri;
            }
            registry.username = username.or(registry.username.take());
            registry.password = password.or(registry.password.take());
            registry.org_name = org_name.or(registry.org_name.take());
        }

        Ok(())
    }

    /// Sets the port for the server to listen on.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the host address for the server.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the inbox mount path, normalizing leading and trailing slashes.
    pub fn with_inbox_path(mut self, path: &str) -> Self {
        self.inbox_path = normalize_path(path);
        self
    }

    /// The IRI identifying the inbox container, without a trailing slash.
    ///
    /// Derived as `base_url[:port]inbox_path` unless set explicitly; the port
    /// is omitted when it is 80.
    pub fn inbox_iri(&self) -> String {
        if let Some(iri) = &self.inbox_iri {
            return iri.trim_end_matches('/').to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        let port = if self.port == 80 {
            String::new()
        } else {
            format!(":{}", self.port)
        };
        format!("{}{}{}", base, port, self.inbox_path.trim_end_matches('/'))
    }

    /// Registry settings, falling back to defaults when the table is absent.
    pub fn registry_or_default(&self) -> RegistryConfig {
        self.registry.clone().unwrap_or_default()
    }

    pub fn status_policy(&self) -> StatusPolicy {
        if self.legacy_status_codes {
            StatusPolicy::Legacy
        } else {
            StatusPolicy::Recommended
        }
    }

    /// Checks the configuration is usable. Failures are fatal at startup.
    pub fn validate(&self) -> Result<()> {
        if normalize_path(&self.inbox_path) == "/" {
            return Err(Error::Config(
                "inbox_path must not be the server root".into(),
            ));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }

        if self.storage == StorageMode::Registry {
            let registry = self.registry.as_ref().ok_or_else(|| {
                Error::Config("registry storage requires a [registry] section".into())
            })?;
            for (name, value) in [
                ("username", &registry.username),
                ("password", &registry.password),
                ("org_name", &registry.org_name),
            ] {
                if value.as_deref().map_or(true, str::is_empty) {
                    return Err(Error::Config(format!(
                        "registry storage requires registry.{}",
                        name
                    )));
                }
            }
            if registry.timeout_secs == 0 {
                return Err(Error::Config(
                    "registry.timeout_secs must be greater than zero".into(),
                ));
            }
        }
        Ok(())
    }

    /// Logs the effective configuration, leaving out credentials.
    pub fn log_summary(&self) {
        info!("Current LDN inbox configuration");
        info!("Base URL: {}", self.base_url);
        info!("Inbox path: {}", self.inbox_path);
        info!("Inbox IRI: {}", self.inbox_iri());
        info!("Storage implementation: {}", self.storage);
        if self.storage == StorageMode::Registry {
            let registry = self.registry_or_default();
            info!("Registry API: {}", registry.api_url);
            info!("Registry inbox IRI: {}", registry.inbox_iri);
        }
        if self.legacy_status_codes {
            info!("Legacy status codes enabled");
        }
    }
}

/// Ensures `path` starts and ends with a single `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = InboxConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8088);
        assert_eq!(config.inbox_path, "/inbox/");
        assert_eq!(config.storage, StorageMode::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inbox_iri_derivation() {
        let config = InboxConfig::default();
        assert_eq!(config.inbox_iri(), "http://127.0.0.1:8088/inbox");

        let config = InboxConfig {
            base_url: "https://ldn.example.org/".into(),
            ..Default::default()
        }
        .with_port(80)
        .with_inbox_path("notifications");
        assert_eq!(config.inbox_iri(), "https://ldn.example.org/notifications");

        let config = InboxConfig {
            inbox_iri: Some("http://proxy.example/inbox/".into()),
            ..Default::default()
        };
        assert_eq!(config.inbox_iri(), "http://proxy.example/inbox");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("inbox"), "/inbox/");
        assert_eq!(normalize_path("/inbox"), "/inbox/");
        assert_eq!(normalize_path("//a/b//"), "/a/b/");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn test_from_toml() {
        let config = InboxConfig::from_toml(
            r#"
            port = 9000
            inbox_path = "ldn"
            storage = "esip_cor"

            [registry]
            username = "alice"
            password = "secret"
            org_name = "esip"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.inbox_path, "/ldn/");
        assert_eq!(config.storage, StorageMode::Registry);
        let registry = config.registry.clone().unwrap();
        assert_eq!(registry.api_url, DEFAULT_REGISTRY_API_URL);
        assert_eq!(registry.timeout_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_rejects_unknown_storage() {
        assert!(matches!(
            InboxConfig::from_toml("storage = \"s3\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_registry_mode_requires_credentials() {
        let config = InboxConfig {
            storage: StorageMode::Registry,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = InboxConfig {
            storage: StorageMode::Registry,
            registry: Some(RegistryConfig {
                username: Some("alice".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn test_root_inbox_path_is_rejected() {
        let config = InboxConfig::default().with_inbox_path("/");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("LDN_PORT", "9100"),
            ("LDN_STORAGE", "registry"),
            ("LDN_INBOX_PATH", "box"),
            ("LDN_REGISTRY_USERNAME", "bob"),
            ("LDN_REGISTRY_PASSWORD", "hunter2"),
            ("LDN_REGISTRY_ORG", "org"),
            ("LDN_LEGACY_STATUS_CODES", "true"),
        ]
        .into_iter()
        .collect();

        let mut config = InboxConfig::default();
        config
            .apply_env_from(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.inbox_path, "/box/");
        assert_eq!(config.storage, StorageMode::Registry);
        assert_eq!(config.status_policy(), StatusPolicy::Legacy);
        let registry = config.registry.clone().unwrap();
        assert_eq!(registry.username.as_deref(), Some("bob"));
        assert_eq!(registry.inbox_iri, DEFAULT_REGISTRY_INBOX_IRI);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_rejects_bad_port() {
        let mut config = InboxConfig::default();
        let result = config.apply_env_from(|key| (key == "LDN_PORT").then(|| "http".to_string()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ldn.toml");
        std::fs::write(&path, "port = 9090\ninbox_path = \"notifications\"\n").unwrap();

        let config = InboxConfig::from_file(&path).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.inbox_path, "/notifications/");

        let missing = InboxConfig::from_file(dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
