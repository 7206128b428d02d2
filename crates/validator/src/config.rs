//! Validator Configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// REST bind address
    pub rest_addr: String,
    /// sled directory; in-memory state when unset
    pub data_dir: Option<PathBuf>,
    /// Genesis validator set, applied when no set is stored yet
    pub genesis: Option<PathBuf>,
    /// Largest proposer preview served over REST
    pub max_preview: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rest_addr: "127.0.0.1:1317".to_string(),
            data_dir: None,
            genesis: None,
            max_preview: rpc_server::DEFAULT_MAX_PREVIEW,
            log_level: "info".to_string(),
        }
    }
}

impl NodeConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rest_addr": "0.0.0.0:9000", "max_preview": 50}}"#).unwrap();

        let config = NodeConfig::load(file.path()).unwrap();
        assert_eq!(config.rest_addr, "0.0.0.0:9000");
        assert_eq!(config.max_preview, 50);
        assert_eq!(config.log_level, "info");
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_bad_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(NodeConfig::load(file.path()).is_err());
    }
}
