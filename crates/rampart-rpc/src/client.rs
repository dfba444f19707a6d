// Hand-crafted async client for the rampartd control protocol (v1).
//
// Base path: /v1/
// Every public method races the HTTP exchange against its operation's
// deadline from `RpcTimeouts`; an elapsed deadline surfaces as
// `Error::Timeout`, never as a transport failure.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{self, BackupInfo, DaemonStatus, PingReply};

// ── Per-operation deadlines ──────────────────────────────────────────

/// Deadlines raced against each RPC class.
///
/// Reads and probes are short; apply/discard/restore get longer budgets
/// because the daemon reprograms the packet filter under them.
#[derive(Debug, Clone)]
pub struct RpcTimeouts {
    /// Config/status/backup fetches.
    pub read: Duration,
    /// `apply_config`.
    pub apply: Duration,
    /// `discard_config`.
    pub discard: Duration,
    /// `save_config`.
    pub save: Duration,
    /// `restore_backup`.
    pub restore: Duration,
    /// Backup create/pin/retention calls.
    pub backup: Duration,
    /// Slack added on top of the caller-supplied per-target ping budget,
    /// covering RPC overhead around the probe itself.
    pub ping_grace: Duration,
}

impl Default for RpcTimeouts {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(5),
            apply: Duration::from_secs(15),
            discard: Duration::from_secs(10),
            save: Duration::from_secs(10),
            restore: Duration::from_secs(10),
            backup: Duration::from_secs(10),
            ping_grace: Duration::from_secs(2),
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the rampartd control endpoint.
///
/// Configuration payloads are generic: the daemon shares the control
/// plane's configuration schema, so callers supply their own serde types
/// for the config-bearing operations.
pub struct DaemonClient {
    http: reqwest::Client,
    base_url: Url,
    timeouts: RpcTimeouts,
}

impl DaemonClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an endpoint URL and transport settings.
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        timeouts: RpcTimeouts,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeouts,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages headers).
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        timeouts: RpcTimeouts,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeouts,
        })
    }

    /// Normalize the endpoint so relative joins of `v1/…` work.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// Join a relative path (e.g. `"v1/status"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining relative paths works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    // ── Deadline racing ──────────────────────────────────────────────

    async fn within<T>(
        operation: &'static str,
        budget: Duration,
        fut: impl Future<Output = Result<T, Error>>,
    ) -> Result<T, Error> {
        match tokio::time::timeout(budget, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                operation,
                timeout_secs: budget.as_secs(),
            }),
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn get_text(&self, path: &str) -> Result<String, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.text().await?)
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_empty(resp).await
    }

    async fn post_empty(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.http.post(url).send().await?;
        self.handle_empty(resp).await
    }

    async fn put_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path);
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Unauthorized;
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<types::ErrorResponse>(&raw) {
            Error::Daemon {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                code: err.code,
            }
        } else {
            Error::Daemon {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Status ───────────────────────────────────────────────────────

    pub async fn status(&self) -> Result<DaemonStatus, Error> {
        Self::within("status", self.timeouts.read, self.get_json("v1/status")).await
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Fetch the daemon's mirror of the staged configuration.
    pub async fn get_config<C: DeserializeOwned>(&self) -> Result<C, Error> {
        Self::within(
            "get_config",
            self.timeouts.read,
            self.get_json("v1/config/staged"),
        )
        .await
    }

    /// Fetch the authoritative running configuration.
    pub async fn get_running_config<C: DeserializeOwned>(&self) -> Result<C, Error> {
        Self::within(
            "get_running_config",
            self.timeouts.read,
            self.get_json("v1/config/running"),
        )
        .await
    }

    /// Push a candidate configuration into the packet filter.
    ///
    /// On success the daemon is running the candidate; persistence to disk
    /// is a separate step (`save_config`).
    pub async fn apply_config<C: Serialize + Sync>(&self, config: &C) -> Result<(), Error> {
        Self::within(
            "apply_config",
            self.timeouts.apply,
            self.post_no_response("v1/config/apply", config),
        )
        .await
    }

    /// Tell the daemon to drop its independently tracked staged state.
    pub async fn discard_config(&self) -> Result<(), Error> {
        Self::within(
            "discard_config",
            self.timeouts.discard,
            self.post_empty("v1/config/discard"),
        )
        .await
    }

    /// Persist the running configuration to durable storage.
    pub async fn save_config(&self) -> Result<(), Error> {
        Self::within(
            "save_config",
            self.timeouts.save,
            self.post_empty("v1/config/save"),
        )
        .await
    }

    // ── Backups ──────────────────────────────────────────────────────

    pub async fn list_backups(&self) -> Result<Vec<BackupInfo>, Error> {
        Self::within(
            "list_backups",
            self.timeouts.read,
            self.get_json("v1/backups"),
        )
        .await
    }

    pub async fn create_backup(
        &self,
        description: &str,
        pinned: bool,
    ) -> Result<BackupInfo, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            description: &'a str,
            pinned: bool,
        }

        Self::within(
            "create_backup",
            self.timeouts.backup,
            self.post_json(
                "v1/backups",
                &Body {
                    description,
                    pinned,
                },
            ),
        )
        .await
    }

    /// Restore the running configuration from a stored backup version.
    pub async fn restore_backup(&self, version: u64) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body {
            version: u64,
        }

        Self::within(
            "restore_backup",
            self.timeouts.restore,
            self.post_no_response("v1/backups/restore", &Body { version }),
        )
        .await
    }

    /// Fetch the raw content snapshot of one backup.
    pub async fn get_backup_content(&self, version: u64) -> Result<String, Error> {
        Self::within(
            "get_backup_content",
            self.timeouts.read,
            self.get_text(&format!("v1/backups/{version}/content")),
        )
        .await
    }

    pub async fn pin_backup(&self, version: u64, pinned: bool) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body {
            version: u64,
            pinned: bool,
        }

        Self::within(
            "pin_backup",
            self.timeouts.backup,
            self.post_no_response("v1/backups/pin", &Body { version, pinned }),
        )
        .await
    }

    /// Set the retention limit for unpinned backups.
    pub async fn set_max_backups(&self, max_backups: u32) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body {
            max_backups: u32,
        }

        Self::within(
            "set_max_backups",
            self.timeouts.backup,
            self.put_no_response("v1/backups/settings", &Body { max_backups }),
        )
        .await
    }

    // ── Connectivity probes ──────────────────────────────────────────

    /// Ask the daemon to probe `target` from inside the new ruleset.
    ///
    /// `timeout_secs` bounds the probe on the daemon side; the RPC itself
    /// gets that budget plus `ping_grace`.
    pub async fn ping(&self, target: &str, timeout_secs: u64) -> Result<PingReply, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            target: &'a str,
            timeout_secs: u64,
        }

        let budget = Duration::from_secs(timeout_secs) + self.timeouts.ping_grace;
        Self::within(
            "ping",
            budget,
            self.post_json(
                "v1/ping",
                &Body {
                    target,
                    timeout_secs,
                },
            ),
        )
        .await
    }
}
