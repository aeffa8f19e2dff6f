use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub request_timeout: Duration,
    pub probe_url: Option<String>,
    pub mount_id: String,
    pub index_path: Option<PathBuf>,
    pub max_body_size: usize,
    /// Form instances untouched for this long are dropped.
    pub form_idle_timeout: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let api_base_url = env_required("STAFFDESK_API_BASE_URL")?
            .trim_end_matches('/')
            .to_string();
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(format!(
                "Invalid STAFFDESK_API_BASE_URL: expected http(s) URL, got '{api_base_url}'"
            ));
        }

        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("STAFFDESK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid STAFFDESK_HOST: {e}"))?;

        let port: u16 = env_or("STAFFDESK_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid STAFFDESK_PORT: {e}"))?;

        let timeout_secs: u64 = env_or("STAFFDESK_REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| format!("Invalid STAFFDESK_REQUEST_TIMEOUT_SECS: {e}"))?;

        let probe_url = std::env::var("STAFFDESK_PROBE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let mount_id = env_or("STAFFDESK_MOUNT_ID", "root");
        if mount_id.trim().is_empty() {
            return Err("STAFFDESK_MOUNT_ID must not be empty".to_string());
        }

        let index_path = std::env::var("STAFFDESK_INDEX_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let max_body_size: usize = env_or("STAFFDESK_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid STAFFDESK_MAX_BODY_SIZE: {e}"))?;

        let form_idle_secs: u64 = env_or("STAFFDESK_FORM_IDLE_SECS", "3600")
            .parse()
            .map_err(|e| format!("Invalid STAFFDESK_FORM_IDLE_SECS: {e}"))?;
        if form_idle_secs == 0 {
            return Err("STAFFDESK_FORM_IDLE_SECS must be greater than 0".to_string());
        }

        let log_level = env_or("STAFFDESK_LOG_LEVEL", "info");

        Ok(Config {
            api_base_url,
            jwt_secret,
            host,
            port,
            request_timeout: Duration::from_secs(timeout_secs),
            probe_url,
            mount_id,
            index_path,
            max_body_size,
            form_idle_timeout: Duration::from_secs(form_idle_secs),
            log_level,
        })
    }

    /// URL hit by the diagnostic `OPTIONS` probe.
    pub fn probe_url(&self) -> String {
        self.probe_url
            .clone()
            .unwrap_or_else(|| format!("{}{}", self.api_base_url, crate::request::ENDPOINT))
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
