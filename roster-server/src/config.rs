use std::env::var;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;
use roster_users::UserMapConfig;

/// Application configuration with environment variable overrides
#[derive(Debug, Clone)]
pub struct Config {
    /// Server data folder, record files live in its `userdata` directory
    /// Env: DATA_FOLDER (default: "data")
    pub data_folder: PathBuf,

    /// Record file extension
    /// Env: USER_FILE_EXTENSION (default: "yml")
    pub user_file_extension: String,

    /// Maximum number of user records kept in memory
    /// Env: USER_CACHE_CAPACITY (default: 10000)
    pub user_cache_capacity: u64,

    /// Drop user records not read for this many seconds
    /// Env: USER_CACHE_IDLE_SECS (default: 0 = never)
    pub user_cache_idle: Option<Duration>,

    /// Players to treat as connected, comma separated
    /// Env: ONLINE_PLAYERS (default: none)
    pub online_players: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let _ = dotenv(); //for debugging mostly
        let idle_secs: u64 = env_or_default("USER_CACHE_IDLE_SECS", 0);
        Self {
            data_folder: PathBuf::from(env_or_default_string("DATA_FOLDER", "data")),
            user_file_extension: env_or_default_string("USER_FILE_EXTENSION", "yml"),
            user_cache_capacity: env_or_default("USER_CACHE_CAPACITY", 10_000),
            user_cache_idle: (idle_secs > 0).then(|| Duration::from_secs(idle_secs)),
            online_players: parse_list(&env_or_default_string("ONLINE_PLAYERS", "")),
        }
    }

    /// Create configuration with all default values
    pub fn default() -> Self {
        Self {
            data_folder: PathBuf::from("data"),
            user_file_extension: "yml".to_string(),
            user_cache_capacity: 10_000,
            user_cache_idle: None,
            online_players: Vec::new(),
        }
    }

    /// Settings for the user map
    pub fn user_map(&self) -> UserMapConfig {
        UserMapConfig {
            data_folder: self.data_folder.clone(),
            extension: self.user_file_extension.clone(),
            cache_capacity: self.user_cache_capacity,
            cache_idle_timeout: self.user_cache_idle,
        }
    }
}

/// Parse environment variable or return default value
fn env_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    var(key)
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or(default)
}

/// Parse environment variable string or return default value
fn env_or_default_string(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
