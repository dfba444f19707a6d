// Transport configuration for the rampartd control connection.
//
// The control endpoint normally lives on loopback (plain HTTP); remote or
// TLS-fronted daemons are supported for lab setups. The optional shared
// secret rides on every request as a sensitive default header.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;

use crate::error::Error;

/// Header carrying the control-socket shared secret.
pub const TOKEN_HEADER: &str = "x-rampart-token";

/// Connection settings for building the underlying `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Socket-level request timeout. The per-operation deadlines in
    /// [`crate::RpcTimeouts`] are raced on top of this, so this only
    /// bounds pathological connects and stalled bodies.
    pub timeout: Duration,

    /// Accept self-signed certificates on an `https://` endpoint.
    pub accept_invalid_certs: bool,

    /// Shared secret expected by rampartd, if configured.
    pub auth_token: Option<secrecy::SecretString>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            auth_token: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        if let Some(ref token) = self.auth_token {
            let mut value =
                HeaderValue::from_str(token.expose_secret()).map_err(|e| Error::Auth {
                    message: format!("token is not a valid header value: {e}"),
                })?;
            value.set_sensitive(true);
            headers.insert(TOKEN_HEADER, value);
        }

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("rampart/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(builder.build()?)
    }
}
