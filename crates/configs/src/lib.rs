use std::time::Duration;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_tenant_header")]
    pub tenant_header: String,
    /// Per-request timeout; `0` disables it.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tenant_header: default_tenant_header(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Where the client-side session lives and under which names.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_file")]
    pub file: String,
    #[serde(default = "default_tenant_cookie")]
    pub tenant_cookie: String,
    #[serde(default = "default_user_key")]
    pub user_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_session_file(),
            tenant_cookie: default_tenant_cookie(),
            user_key: default_user_key(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { poll_interval_ms: default_poll_interval(), locale: default_locale() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

fn default_base_url() -> String { "http://localhost:3000".into() }
fn default_tenant_header() -> String { "x-tenant-slug".into() }
fn default_request_timeout() -> u64 { 30 }
fn default_session_file() -> String { "data/session.json".into() }
fn default_tenant_cookie() -> String { "tenantSlug".into() }
fn default_user_key() -> String { "user".into() }
fn default_poll_interval() -> u64 { 3000 }
fn default_locale() -> String { "pt-BR".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `CONFIG_PATH` (or `config.toml`); a missing file falls back to defaults.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.api.apply_base_url_override(std::env::var("API_URL").ok());
        if let Ok(file) = std::env::var("SESSION_FILE") {
            cfg.session.file = file;
        }
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.api.normalize()?;
        self.session.validate()?;
        self.dashboard.validate()?;
        Ok(())
    }
}

impl ApiConfig {
    /// Environment wins over the file when set and non-empty.
    pub fn apply_base_url_override(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
    }

    fn normalize(&mut self) -> Result<()> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            self.base_url = default_base_url();
        } else {
            self.base_url = trimmed;
        }
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("api.base_url must start with http:// or https://"));
        }
        self.tenant_header = self.tenant_header.trim().to_lowercase();
        if self.tenant_header.is_empty() {
            self.tenant_header = default_tenant_header();
        }
        let valid = self
            .tenant_header
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid {
            return Err(anyhow!("api.tenant_header contains invalid characters"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

impl SessionConfig {
    fn validate(&self) -> Result<()> {
        if self.file.trim().is_empty() {
            return Err(anyhow!("session.file is empty"));
        }
        if self.tenant_cookie.trim().is_empty() || self.user_key.trim().is_empty() {
            return Err(anyhow!("session.tenant_cookie and session.user_key must be set"));
        }
        Ok(())
    }
}

impl DashboardConfig {
    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(anyhow!("dashboard.poll_interval_ms must be positive"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() -> Result<()> {
        let mut cfg = parse("")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.api.base_url, "http://localhost:3000");
        assert_eq!(cfg.api.tenant_header, "x-tenant-slug");
        assert_eq!(cfg.api.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.session.tenant_cookie, "tenantSlug");
        assert_eq!(cfg.session.user_key, "user");
        assert_eq!(cfg.dashboard.poll_interval(), Duration::from_millis(3000));
        assert!(!cfg.logging.json);
        Ok(())
    }

    #[test]
    fn trailing_slash_and_header_case_normalized() -> Result<()> {
        let mut cfg = parse(
            r#"
            [api]
            base_url = "https://api.example.com/"
            tenant_header = "X-Tenant-Slug"
            request_timeout_secs = 0
            "#,
        )?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.api.base_url, "https://api.example.com");
        assert_eq!(cfg.api.tenant_header, "x-tenant-slug");
        assert_eq!(cfg.api.request_timeout(), None);
        Ok(())
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut cfg = parse("[api]\nbase_url = \"ftp://nope\"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let mut cfg = parse("[dashboard]\npoll_interval_ms = 0\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn env_override_ignores_blank() {
        let mut api = ApiConfig::default();
        api.apply_base_url_override(Some("   ".into()));
        assert_eq!(api.base_url, "http://localhost:3000");
        api.apply_base_url_override(Some("http://backend:8080".into()));
        assert_eq!(api.base_url, "http://backend:8080");
    }

    #[test]
    fn loads_from_disk() -> Result<()> {
        let path = std::env::temp_dir().join(format!("configs_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[session]\nfile = \"/tmp/s.json\"\n")?;
        let cfg = load_from_file(&path.to_string_lossy())?;
        assert_eq!(cfg.session.file, "/tmp/s.json");
        let _ = std::fs::remove_file(&path);
        Ok(())
    }
}
