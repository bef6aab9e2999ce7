use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Origins allowed to send state-changing requests (and CORS requests).
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8000, worker_threads: Some(4), allowed_origins: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Page sizes of the paginated list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_users_per_page")]
    pub users_per_page: u64,
    #[serde(default = "default_advertisements_per_page")]
    pub advertisements_per_page: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            users_per_page: default_users_per_page(),
            advertisements_per_page: default_advertisements_per_page(),
        }
    }
}

fn default_users_per_page() -> u64 { 10 }
fn default_advertisements_per_page() -> u64 { 5 }

/// Where uploaded advertisement images live and how they are addressed.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_root")]
    pub root: String,
    #[serde(default = "default_media_url_prefix")]
    pub url_prefix: String,
    /// Prepended to image URLs, e.g. `https://cdn.example.com`. Empty keeps URLs host-relative.
    #[serde(default)]
    pub public_base_url: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            url_prefix: default_media_url_prefix(),
            public_base_url: String::new(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_media_root() -> String { "media".into() }
fn default_media_url_prefix() -> String { "/media".into() }
fn default_max_upload_bytes() -> usize { 5 * 1024 * 1024 }

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`); without a file, fall back to defaults plus env vars.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_path_and_validate(&path)
    }

    /// Only a missing file falls back to env; unreadable or malformed files are errors.
    pub fn load_path_and_validate(path: &str) -> Result<Self> {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => load_from_str(&content).map_err(|e| anyhow!("{path}: {e}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::from_env(),
            Err(e) => return Err(anyhow!("{path}: {e}")),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `SERVER_HOST` / `SERVER_PORT`; the database URL is filled later.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        // 归一化 database（支持从环境变量填充 URL）
        self.database.normalize_from_env();
        self.database.validate()?;
        self.pagination.validate()?;
        self.media.normalize_and_validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        // 去掉结尾的 '/'，与浏览器发送的 Origin 头保持一致
        for origin in self.allowed_origins.iter_mut() {
            *origin = origin.trim().trim_end_matches('/').to_string();
        }
        self.allowed_origins.retain(|o| !o.is_empty());
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // 若 TOML 中未提供 URL，则尝试从环境变量填充
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url 为空；请在 config.toml 或环境变量 DATABASE_URL 中提供"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url 必须以 postgresql:// 或 postgres:// 开头"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections 必须 >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections 必须 >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database 超时配置必须为正整数秒"));
        }
        Ok(())
    }
}

impl PaginationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.users_per_page == 0 || self.advertisements_per_page == 0 {
            return Err(anyhow!("pagination 每页条数必须 >= 1"));
        }
        Ok(())
    }
}

impl MediaConfig {
    fn normalize_and_validate(&mut self) -> Result<()> {
        if self.root.trim().is_empty() {
            self.root = default_media_root();
        }
        if !self.url_prefix.starts_with('/') {
            return Err(anyhow!("media.url_prefix 必须以 '/' 开头"));
        }
        self.url_prefix = self.url_prefix.trim_end_matches('/').to_string();
        if self.url_prefix.is_empty() {
            return Err(anyhow!("media.url_prefix 不能为根路径 '/'"));
        }
        self.public_base_url = self.public_base_url.trim().trim_end_matches('/').to_string();
        if self.max_upload_bytes == 0 {
            return Err(anyhow!("media.max_upload_bytes 必须 >= 1"));
        }
        Ok(())
    }
}
