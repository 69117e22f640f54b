use crate::error::{DispatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "dispatch.yaml";

/// Longest poll window accepted, in seconds.
pub const MAX_POLL_TIMEOUT_SECS: u64 = 3600;

/// Server settings, read from `dispatch.yaml` and overridable from the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// How long a driver poll waits for a command before answering "no action".
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9000
}

fn default_poll_timeout() -> u64 {
    20
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static_files")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            poll_timeout_secs: default_poll_timeout(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: ServerConfig = serde_yaml::from_str(&data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_timeout_secs == 0 {
            return Err(DispatchError::InvalidConfig(
                "poll_timeout_secs must be at least 1".into(),
            ));
        }
        if self.poll_timeout_secs > MAX_POLL_TIMEOUT_SECS {
            return Err(DispatchError::InvalidConfig(format!(
                "poll_timeout_secs must be at most {MAX_POLL_TIMEOUT_SECS}, got {}",
                self.poll_timeout_secs
            )));
        }
        if self.host.trim().is_empty() {
            return Err(DispatchError::InvalidConfig("host must not be empty".into()));
        }
        Ok(())
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = ServerConfig::load(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(cfg, ServerConfig::default());
        assert_eq!(cfg.bind_addr(), "127.0.0.1:9000");
        assert_eq!(cfg.poll_timeout(), Duration::from_secs(20));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "port: 9100\npoll_timeout_secs: 5\n").unwrap();

        let cfg = ServerConfig::load(&path).unwrap();
        assert_eq!(cfg.port, 9100);
        assert_eq!(cfg.poll_timeout_secs, 5);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.static_dir, PathBuf::from("static_files"));
    }

    #[test]
    fn full_file_overrides_every_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            "host: 0.0.0.0\nport: 8080\npoll_timeout_secs: 30\nstatic_dir: public\n",
        )
        .unwrap();

        let cfg = ServerConfig::load(&path).unwrap();
        assert_eq!(
            cfg,
            ServerConfig {
                host: "0.0.0.0".into(),
                port: 8080,
                poll_timeout_secs: 30,
                static_dir: PathBuf::from("public"),
            }
        );
    }

    #[test]
    fn timeout_above_ceiling_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "poll_timeout_secs: 18446744073709551615\n").unwrap();
        assert!(matches!(
            ServerConfig::load(&path).unwrap_err(),
            DispatchError::InvalidConfig(_)
        ));

        let at_ceiling = ServerConfig {
            poll_timeout_secs: MAX_POLL_TIMEOUT_SECS,
            ..ServerConfig::default()
        };
        assert!(at_ceiling.validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "poll_timeout_secs: 0\n").unwrap();
        assert!(matches!(
            ServerConfig::load(&path).unwrap_err(),
            DispatchError::InvalidConfig(_)
        ));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "port: [not a port\n").unwrap();
        assert!(matches!(
            ServerConfig::load(&path).unwrap_err(),
            DispatchError::Yaml(_)
        ));
    }
}
