use serde::Deserialize;

/// Where the book catalog is loaded from
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// CSV fetched over HTTP
    Remote,
    /// CSV file on local disk
    File,
    /// `books` table in the configured database
    Postgres,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL. Without it, records live in memory.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL. Without it, login tokens live in memory.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Catalog source
    #[serde(default = "default_catalog_source")]
    pub catalog_source: CatalogKind,

    /// URL or path of the catalog CSV (ignored for the postgres source)
    #[serde(default = "default_catalog_location")]
    pub catalog_location: String,

    /// Lifetime of a login token in seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// Maximum pooled database connections
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_source() -> CatalogKind {
    CatalogKind::Remote
}

fn default_catalog_location() -> String {
    "https://raw.githubusercontent.com/galstyan11/reading-app/main/reading_app_db.csv".to_string()
}

fn default_session_ttl() -> u64 {
    604800 // 1 week
}

fn default_max_connections() -> u32 {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
