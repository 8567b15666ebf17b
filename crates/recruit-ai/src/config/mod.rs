use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REMOTE_CSV_URL: &str =
    "https://raw.githubusercontent.com/allmore0/min_sesgos/main/candidatos.csv";
pub const DEFAULT_AUDIT_TOP_N: usize = 10;
pub const DEFAULT_CIPHER_SEED: u64 = 42;
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub screening: ScreeningConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            screening: ScreeningConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where candidate records come from and how the audit is sized.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningConfig {
    pub data_dir: PathBuf,
    /// `None` disables the remote source entirely.
    pub remote: Option<RemoteSourceConfig>,
    pub audit_top_n: usize,
    pub cipher_seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSourceConfig {
    pub primary_url: String,
    pub fallback_url: String,
    pub timeout: Duration,
}

impl RemoteSourceConfig {
    /// Fallback differs from the primary only in the branch segment.
    pub fn with_derived_fallback(primary_url: String, timeout: Duration) -> Self {
        let fallback_url = primary_url.replacen("/main/", "/master/", 1);
        Self {
            primary_url,
            fallback_url,
            timeout,
        }
    }
}

impl ScreeningConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let data_dir = env::var("APP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let timeout_secs = match env::var("APP_REMOTE_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidRemoteTimeout)?,
            Err(_) => DEFAULT_REMOTE_TIMEOUT_SECS,
        };
        let timeout = Duration::from_secs(timeout_secs);

        let primary_url =
            env::var("APP_REMOTE_CSV_URL").unwrap_or_else(|_| DEFAULT_REMOTE_CSV_URL.to_string());
        let remote = if primary_url.trim().is_empty() {
            None
        } else {
            let mut remote = RemoteSourceConfig::with_derived_fallback(primary_url, timeout);
            if let Ok(fallback) = env::var("APP_REMOTE_CSV_FALLBACK_URL") {
                if !fallback.trim().is_empty() {
                    remote.fallback_url = fallback;
                }
            }
            Some(remote)
        };

        let audit_top_n = match env::var("APP_AUDIT_TOP_N") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidTopN)?,
            Err(_) => DEFAULT_AUDIT_TOP_N,
        };

        let cipher_seed = match env::var("APP_CIPHER_SEED") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidCipherSeed)?,
            Err(_) => DEFAULT_CIPHER_SEED,
        };

        Ok(Self {
            data_dir,
            remote,
            audit_top_n,
            cipher_seed,
        })
    }

    pub fn local_csv_path(&self) -> PathBuf {
        self.data_dir.join("new_candidates.csv")
    }

    pub fn json_archive_path(&self) -> PathBuf {
        self.data_dir.join("database.json")
    }

    pub fn obfuscated_archive_path(&self) -> PathBuf {
        self.data_dir.join("encrypted_database.txt")
    }
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            remote: Some(RemoteSourceConfig::with_derived_fallback(
                DEFAULT_REMOTE_CSV_URL.to_string(),
                Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
            )),
            audit_top_n: DEFAULT_AUDIT_TOP_N,
            cipher_seed: DEFAULT_CIPHER_SEED,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRemoteTimeout,
    InvalidTopN,
    InvalidCipherSeed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRemoteTimeout => {
                write!(f, "APP_REMOTE_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::InvalidTopN => write!(f, "APP_AUDIT_TOP_N must be a positive integer"),
            ConfigError::InvalidCipherSeed => write!(f, "APP_CIPHER_SEED must be a valid u64"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
