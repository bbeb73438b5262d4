use super::constants::*;
use crate::Credential;
use log::warn;
use osskit_core::{Context, Error, Result};
use std::str::FromStr;
use std::time::Duration;

/// Config carries all the configuration for an OSS client.
///
/// Explicitly set fields always win over values loaded by [`Config::from_env`].
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `access_key_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_ACCESS_KEY_SECRET`]
    pub access_key_secret: Option<String>,
    /// `host` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_OSS_HOST`]
    /// - default to [`DEFAULT_HOST`]
    pub host: Option<String>,
    /// `port` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_OSS_PORT`]
    /// - default to [`DEFAULT_PORT`]
    pub port: Option<u16>,
    /// Idle/read timeout applied to every connection.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_OSS_TIMEOUT`], in milliseconds
    /// - default to [`DEFAULT_TIMEOUT`]
    pub timeout: Option<Duration>,
    /// Maximum number of requests in flight at once.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_OSS_MAX_CONNECTIONS`]
    /// - default to [`DEFAULT_MAX_CONNECTIONS`]
    pub max_connections: Option<usize>,
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_ACCESS_KEY_SECRET) {
            self.access_key_secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_OSS_HOST) {
            self.host.get_or_insert(v);
        }
        if let Some(v) = parse_env(ctx, ALIBABA_CLOUD_OSS_PORT) {
            self.port.get_or_insert(v);
        }
        if let Some(v) = parse_env(ctx, ALIBABA_CLOUD_OSS_TIMEOUT) {
            self.timeout.get_or_insert(Duration::from_millis(v));
        }
        if let Some(v) = parse_env(ctx, ALIBABA_CLOUD_OSS_MAX_CONNECTIONS) {
            self.max_connections.get_or_insert(v);
        }

        self
    }

    /// Host of the service endpoint.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Port of the service endpoint.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Connection idle/read timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Cap on concurrent requests, never less than one.
    pub fn max_connections(&self) -> usize {
        self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS).max(1)
    }

    /// Base URL every request path is appended to.
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.host(), self.port())
    }

    /// Build the credential, failing if either half is missing.
    pub fn credential(&self) -> Result<Credential> {
        match (&self.access_key_id, &self.access_key_secret) {
            (Some(ak), Some(sk)) if !ak.is_empty() && !sk.is_empty() => {
                Ok(Credential::new(ak, sk))
            }
            _ => Err(Error::config_invalid(
                "access_key_id and access_key_secret are required",
            )),
        }
    }
}

fn parse_env<T: FromStr>(ctx: &Context, key: &str) -> Option<T> {
    let raw = ctx.env_var(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring env {key}: {raw:?} is not a valid value");
            None
        }
    }
}
