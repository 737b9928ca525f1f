use anyhow::{anyhow, Context, Result};
use common_session::{
    CredentialStore, FileCredentialStore, GateConfig, MemoryCredentialStore, DEFAULT_CREDENTIAL_KEY,
};
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub store_dir: Option<PathBuf>,
    pub store_key: String,
    pub revalidate_seconds: u64,
    pub enforce_expiry_on_load: bool,
    pub identity_base_url: String,
    pub landing_path: String,
    pub host: String,
    pub port: u16,
}

impl PortalConfig {
    /// Builds the config from any key lookup; `load_portal_config` wires it
    /// to the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_dir = lookup("SESSION_STORE_DIR")
            .and_then(|value| normalize_optional(&value))
            .map(PathBuf::from);
        let store_key = lookup("SESSION_STORE_KEY")
            .and_then(|value| normalize_optional(&value))
            .unwrap_or_else(|| DEFAULT_CREDENTIAL_KEY.to_string());
        if store_key.contains(['/', '\\']) {
            return Err(anyhow!("SESSION_STORE_KEY must be a plain name, got '{store_key}'"));
        }

        let revalidate_seconds = lookup("SESSION_REVALIDATE_SECONDS")
            .map(|value| parse_seconds(&value))
            .transpose()
            .context("Failed to parse SESSION_REVALIDATE_SECONDS")?
            .unwrap_or(60)
            .max(1);
        let enforce_expiry_on_load = lookup("SESSION_ENFORCE_EXPIRY_ON_LOAD")
            .map(|value| parse_bool(&value))
            .unwrap_or(true);

        let identity_base_url = lookup("IDENTITY_BASE_URL")
            .and_then(|value| normalize_optional(&value))
            .unwrap_or_else(|| "http://localhost:8085".to_string());
        let landing_path = lookup("PORTAL_LANDING_PATH")
            .and_then(|value| normalize_optional(&value))
            .unwrap_or_else(|| "/".to_string());

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("PORT")
            .map(|value| value.trim().parse::<u16>())
            .transpose()
            .context("Failed to parse PORT")?
            .unwrap_or(8090);

        Ok(Self {
            store_dir,
            store_key,
            revalidate_seconds,
            enforce_expiry_on_load,
            identity_base_url,
            landing_path,
            host,
            port,
        })
    }

    pub fn gate_config(&self) -> GateConfig {
        GateConfig::new()
            .with_revalidate_every(Duration::from_secs(self.revalidate_seconds))
            .with_expiry_on_load(self.enforce_expiry_on_load)
    }

    pub fn credential_store(&self) -> Arc<dyn CredentialStore> {
        match &self.store_dir {
            Some(dir) => Arc::new(FileCredentialStore::new(dir, self.store_key.clone())),
            None => Arc::new(MemoryCredentialStore::new(self.store_key.clone())),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("Invalid HOST '{}'", self.host))?;
        Ok(SocketAddr::from((ip, self.port)))
    }
}

pub fn load_portal_config() -> Result<PortalConfig> {
    PortalConfig::from_lookup(|key| env::var(key).ok())
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_seconds(value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|err| anyhow!("Invalid seconds value '{}': {err}", value.trim()))
}

fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
