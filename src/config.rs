//! Camera client configuration.
//!
//! Everything that used to be process-wide (credentials, port, storage root)
//! lives here and is handed to [`CameraClient::new`](crate::CameraClient::new).
//! A config can be built in code or loaded from a JSON file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MOVE_INTERVAL, HTTP_PORT, SNAPSHOT_ROOT, SNAPSHOT_USER};
use crate::error::{CamError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Base64 of `username:password`, the payload of a Basic auth header.
    pub fn basic_token(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.username, self.password))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub port: u16,
    pub credentials: Credentials,
    /// Root under which `<host>/<date>/img_*.jpg` snapshots are stored.
    pub snapshot_root: PathBuf,
    /// Value of the `user` query parameter on the snapshot endpoint.
    pub snapshot_user: String,
    /// Seconds a directional move runs before its stop command.
    pub move_interval: f64,
    /// Host used by the CLI when no action is given.
    pub default_host: Option<String>,
    /// Optional per-request timeout in seconds. Unset means wait forever.
    pub request_timeout: Option<f64>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            port: HTTP_PORT,
            credentials: Credentials::default(),
            snapshot_root: PathBuf::from(SNAPSHOT_ROOT),
            snapshot_user: SNAPSHOT_USER.to_string(),
            move_interval: DEFAULT_MOVE_INTERVAL,
            default_host: None,
            request_timeout: None,
        }
    }
}

impl CameraConfig {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Credentials::new(username, password);
        self
    }

    pub fn with_snapshot_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.snapshot_root = root.into();
        self
    }

    pub fn with_move_interval(mut self, seconds: f64) -> Self {
        self.move_interval = seconds;
        self
    }

    pub fn with_default_host(mut self, host: impl Into<String>) -> Self {
        self.default_host = Some(host.into());
        self
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CamError::ConfigError(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| CamError::ConfigError(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(CamError::ConfigError("port must be non-zero".to_string()));
        }
        move_interval(self.move_interval)
            .map_err(|e| CamError::ConfigError(format!("move_interval: {e}")))?;
        if let Some(t) = self.request_timeout
            && !(t > 0.0 && Duration::try_from_secs_f64(t).is_ok())
        {
            return Err(CamError::ConfigError(format!(
                "request_timeout must be a positive number of seconds, got {t}"
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout.and_then(|t| Duration::try_from_secs_f64(t).ok())
    }
}

/// Convert a move interval in (possibly fractional) seconds to a `Duration`.
pub fn move_interval(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds).map_err(|e| {
        CamError::InvalidArgument(format!(
            "move interval must be a non-negative number of seconds, got {seconds}: {e}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_token_encodes_user_and_password() {
        let creds = Credentials::new("admin", "secret");
        assert_eq!(creds.basic_token(), "YWRtaW46c2VjcmV0");
    }

    #[test]
    fn defaults_match_device_conventions() {
        let cfg = CameraConfig::default();
        assert_eq!(cfg.port, 80);
        assert_eq!(cfg.snapshot_user, "admin");
        assert_eq!(cfg.move_interval, 0.8);
        assert!(cfg.request_timeout().is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: CameraConfig = serde_json::from_str(
            r#"{"port": 8080, "credentials": {"username": "u", "password": "p"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.credentials.username, "u");
        assert_eq!(cfg.move_interval, DEFAULT_MOVE_INTERVAL);
        assert_eq!(cfg.snapshot_root, PathBuf::from(SNAPSHOT_ROOT));
    }

    #[test]
    fn example_config_is_valid() {
        let cfg: CameraConfig =
            serde_json::from_str(include_str!("../camctrl.example.json")).unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.default_host.as_deref(), Some("cam1.local"));
    }

    #[test]
    fn rejects_bad_intervals() {
        assert!(move_interval(-1.0).is_err());
        assert!(move_interval(f64::NAN).is_err());
        assert_eq!(move_interval(0.25).unwrap(), Duration::from_millis(250));

        let cfg = CameraConfig::default().with_move_interval(f64::INFINITY);
        assert!(matches!(cfg.validate(), Err(CamError::ConfigError(_))));
    }

    #[test]
    fn huge_intervals_are_errors_not_panics() {
        assert!(matches!(move_interval(1e20), Err(CamError::InvalidArgument(_))));

        let cfg = CameraConfig::default().with_move_interval(1e30);
        assert!(matches!(cfg.validate(), Err(CamError::ConfigError(_))));

        let cfg = CameraConfig {
            request_timeout: Some(1e30),
            ..CameraConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CamError::ConfigError(_))));
        assert!(cfg.request_timeout().is_none());
    }

    #[test]
    fn missing_config_file_is_a_config_error() {
        let err = CameraConfig::from_file(Path::new("/nonexistent/camctrl.json")).unwrap_err();
        assert!(matches!(err, CamError::ConfigError(_)));
    }
}
