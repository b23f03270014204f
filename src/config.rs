use std::net::IpAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "VoltCare";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "voltcare_lib=info,voltcare=info,tower_http=info"
}

/// Platform local-data dir joined with `VoltCare/`, or `./VoltCare` when unknown.
pub fn app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub database_path: PathBuf,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup so tests need not touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = parse_or_default(&lookup, "PORT", DEFAULT_PORT);
        let bind = parse_or_default(&lookup, "VOLTCARE_BIND", IpAddr::from([0, 0, 0, 0]));

        let data_dir = lookup("VOLTCARE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(app_data_dir);
        let database_path = lookup("VOLTCARE_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("voltcare.db"));
        let upload_dir = lookup("VOLTCARE_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("uploads"));
        let public_base_url = lookup("VOLTCARE_PUBLIC_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        Self {
            bind,
            port,
            database_path,
            upload_dir,
            public_base_url,
        }
    }
}

fn parse_or_default<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparsable setting, using default");
            default
        }),
        None => default,
    }
}
