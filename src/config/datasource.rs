//! Data-source settings from the environment (`.env` honoured via dotenvy).

use crate::error::ConfigError;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SQLMAP_DIR: &str = "sqlmap";

/// Connection settings for the write and read channels.
#[derive(Clone, Debug)]
pub struct DataSourceConfig {
    /// `DATABASE_URL`; the write channel.
    pub write_url: String,
    /// `DATABASE_READ_URL`; falls back to the write URL.
    pub read_url: String,
    /// `DATABASE_MAX_CONNECTIONS`, per pool.
    pub max_connections: u32,
    /// `SQLMAP_DIR`: directory of sql-map JSON files.
    pub sqlmap_dir: String,
    /// `SQLMAP_NAMESPACE`: namespace the DAO prefixes statement ids with.
    pub namespace: Option<String>,
}

impl DataSourceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let write_url = get("DATABASE_URL")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingEnv("DATABASE_URL"))?;
        let read_url = get("DATABASE_READ_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| write_url.clone());
        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(s) => s.parse().map_err(|_| {
                ConfigError::Validation(format!("DATABASE_MAX_CONNECTIONS: invalid number '{}'", s))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        Ok(DataSourceConfig {
            write_url,
            read_url,
            max_connections,
            sqlmap_dir: get("SQLMAP_DIR").unwrap_or_else(|| DEFAULT_SQLMAP_DIR.into()),
            namespace: get("SQLMAP_NAMESPACE").filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn has_separate_read(&self) -> bool {
        self.read_url != self.write_url
    }
}

/// Mask the password portion of a database URL for safe logging.
pub fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
