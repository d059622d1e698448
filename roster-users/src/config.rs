use std::path::PathBuf;
use std::time::Duration;

/// Name of the directory under the data folder that holds one record file per player.
pub const USERDATA_DIR: &str = "userdata";

/// User map configuration
#[derive(Debug, Clone)]
pub struct UserMapConfig {
    /// Server data folder; record files live in `<data_folder>/userdata`
    pub data_folder: PathBuf,
    /// Record file extension, without the leading dot
    pub extension: String,
    /// Maximum number of records kept in memory
    pub cache_capacity: u64,
    /// Drop records that have not been read for this long
    pub cache_idle_timeout: Option<Duration>,
}

impl UserMapConfig {
    pub fn new(data_folder: impl Into<PathBuf>) -> Self {
        Self {
            data_folder: data_folder.into(),
            ..Self::default()
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn userdata_dir(&self) -> PathBuf {
        self.data_folder.join(USERDATA_DIR)
    }
}

impl Default for UserMapConfig {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::from("data"),
            extension: "yml".to_string(),
            cache_capacity: 10_000,
            cache_idle_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_config() {
        let config = UserMapConfig::default();
        assert_eq!(config.data_folder, PathBuf::from("data"));
        assert_eq!(config.extension, "yml");
        assert_eq!(config.cache_capacity, 10_000);
        assert!(config.cache_idle_timeout.is_none());
        assert_eq!(config.userdata_dir(), Path::new("data").join("userdata"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = UserMapConfig::new("/srv/mc")
            .with_extension("rec")
            .with_cache_capacity(8);
        assert_eq!(config.userdata_dir(), Path::new("/srv/mc/userdata"));
        assert_eq!(config.extension, "rec");
        assert_eq!(config.cache_capacity, 8);
    }
}
