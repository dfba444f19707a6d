//! Service settings for the rampart control plane.
//!
//! A TOML file plus `RAMPART_`-prefixed environment overrides, resolved
//! through `figment`. The binary layers `--config` and verbosity flags
//! on top of what this crate loads.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rampart_rpc::{RpcTimeouts, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("settings loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings structs ────────────────────────────────────────────────

/// Top-level service settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// HTTP listen address for the control-plane API.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Connection to the privileged daemon.
    #[serde(default)]
    pub daemon: DaemonSettings,

    #[serde(default)]
    pub backups: BackupSettings,

    #[serde(default)]
    pub log: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            daemon: DaemonSettings::default(),
            backups: BackupSettings::default(),
            log: LogSettings::default(),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1:8484".into()
}

/// How to reach rampartd's control endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DaemonSettings {
    /// Control endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the shared-secret token. The token
    /// itself never lives in the settings file.
    #[serde(default = "default_auth_token_env")]
    pub auth_token_env: String,

    /// Accept self-signed certificates on an `https://` endpoint.
    #[serde(default)]
    pub accept_invalid_certs: bool,

    #[serde(default)]
    pub timeouts: TimeoutSettings,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            auth_token_env: default_auth_token_env(),
            accept_invalid_certs: false,
            timeouts: TimeoutSettings::default(),
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:9601".into()
}
fn default_auth_token_env() -> String {
    "RAMPART_DAEMON_TOKEN".into()
}

impl DaemonSettings {
    /// Transport settings with the shared secret resolved from the
    /// environment.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            accept_invalid_certs: self.accept_invalid_certs,
            auth_token: self.auth_token(),
            ..TransportConfig::default()
        }
    }

    /// Shared-secret token for the control endpoint, if configured.
    pub fn auth_token(&self) -> Option<SecretString> {
        std::env::var(&self.auth_token_env)
            .ok()
            .filter(|token| !token.is_empty())
            .map(SecretString::from)
    }
}

/// Per-operation RPC deadlines, in seconds.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct TimeoutSettings {
    #[serde(default = "default_read_secs")]
    pub read_secs: u64,
    #[serde(default = "default_apply_secs")]
    pub apply_secs: u64,
    #[serde(default = "default_discard_secs")]
    pub discard_secs: u64,
    #[serde(default = "default_save_secs")]
    pub save_secs: u64,
    #[serde(default = "default_restore_secs")]
    pub restore_secs: u64,
    #[serde(default = "default_backup_secs")]
    pub backup_secs: u64,
    #[serde(default = "default_ping_grace_secs")]
    pub ping_grace_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            read_secs: default_read_secs(),
            apply_secs: default_apply_secs(),
            discard_secs: default_discard_secs(),
            save_secs: default_save_secs(),
            restore_secs: default_restore_secs(),
            backup_secs: default_backup_secs(),
            ping_grace_secs: default_ping_grace_secs(),
        }
    }
}

fn default_read_secs() -> u64 {
    5
}
fn default_apply_secs() -> u64 {
    15
}
fn default_discard_secs() -> u64 {
    10
}
fn default_save_secs() -> u64 {
    10
}
fn default_restore_secs() -> u64 {
    10
}
fn default_backup_secs() -> u64 {
    10
}
fn default_ping_grace_secs() -> u64 {
    2
}

impl TimeoutSettings {
    /// Translate to the client's per-operation deadlines.
    pub fn rpc_timeouts(&self) -> RpcTimeouts {
        RpcTimeouts {
            read: Duration::from_secs(self.read_secs),
            apply: Duration::from_secs(self.apply_secs),
            discard: Duration::from_secs(self.discard_secs),
            save: Duration::from_secs(self.save_secs),
            restore: Duration::from_secs(self.restore_secs),
            backup: Duration::from_secs(self.backup_secs),
            ping_grace: Duration::from_secs(self.ping_grace_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct BackupSettings {
    /// Retention limit for unpinned backups, pushed to the daemon on
    /// startup. Must be at least 1.
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            max_backups: default_max_backups(),
        }
    }
}

fn default_max_backups() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogSettings {
    /// Default log level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

// ── Settings file path ──────────────────────────────────────────────

const SYSTEM_CONFIG_PATH: &str = "/etc/rampart/config.toml";

/// Resolve the settings file path: the system location when present,
/// otherwise the per-user XDG location.
pub fn config_path() -> PathBuf {
    let system = PathBuf::from(SYSTEM_CONFIG_PATH);
    if system.exists() {
        return system;
    }
    ProjectDirs::from("net", "rampart", "rampart").map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("rampart");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load settings from `path` (or the resolved default location) and
/// the environment, then validate.
///
/// Nested keys use `__` in environment overrides, e.g.
/// `RAMPART_DAEMON__ENDPOINT`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("RAMPART_").split("__"));

    let settings: Settings = figment.extract()?;
    settings.validate()?;
    Ok(settings)
}

impl Settings {
    /// Cross-field constraints the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Validation {
                field: "listen".into(),
                reason: format!("not a socket address: {}", self.listen),
            });
        }
        if let Err(e) = url::Url::parse(&self.daemon.endpoint) {
            return Err(ConfigError::Validation {
                field: "daemon.endpoint".into(),
                reason: format!("invalid URL {}: {e}", self.daemon.endpoint),
            });
        }
        if self.backups.max_backups == 0 {
            return Err(ConfigError::Validation {
                field: "backups.max_backups".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_validate() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.listen, "127.0.0.1:8484");
        assert_eq!(settings.daemon.endpoint, "http://127.0.0.1:9601");
        assert_eq!(settings.daemon.timeouts.apply_secs, 15);
        assert_eq!(settings.backups.max_backups, 10);
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
listen = "0.0.0.0:8080"

[daemon]
endpoint = "http://10.0.0.2:9601"

[daemon.timeouts]
apply_secs = 30

[backups]
max_backups = 25
"#
        )
        .unwrap();

        let settings = load_settings(Some(file.path())).unwrap();
        assert_eq!(settings.listen, "0.0.0.0:8080");
        assert_eq!(settings.daemon.endpoint, "http://10.0.0.2:9601");
        assert_eq!(settings.daemon.timeouts.apply_secs, 30);
        // Unset fields keep their defaults.
        assert_eq!(settings.daemon.timeouts.read_secs, 5);
        assert_eq!(settings.backups.max_backups, 25);
    }

    #[test]
    fn invalid_listen_is_rejected() {
        let settings = Settings {
            listen: "not-an-address".into(),
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { field, .. } if field == "listen"));
    }

    #[test]
    fn zero_retention_is_rejected() {
        let mut settings = Settings::default();
        settings.backups.max_backups = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn timeouts_translate_to_rpc_deadlines() {
        let timeouts = TimeoutSettings::default().rpc_timeouts();
        assert_eq!(timeouts.read, Duration::from_secs(5));
        assert_eq!(timeouts.apply, Duration::from_secs(15));
        assert_eq!(timeouts.ping_grace, Duration::from_secs(2));
    }
}
