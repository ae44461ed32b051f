use crate::config::CameraConfig;
use crate::error::{CamError, Result};
use log::debug;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use url::Url;

/// HTTP client for one set of camera credentials. Hosts are supplied per call.
#[derive(Debug, Clone)]
pub struct CameraClient {
    pub(crate) config: CameraConfig,
    pub(crate) http: Client,
    auth_header: String,
}

impl CameraClient {
    pub fn new(config: CameraConfig) -> Result<Self> {
        config.validate()?;

        // No idle connections are kept, so every request dials the camera anew.
        let mut builder = Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| CamError::ConfigError(format!("HTTP client: {}", e)))?;

        let auth_header = format!("Basic {}", config.credentials.basic_token());

        Ok(Self {
            config,
            http,
            auth_header,
        })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Authenticated GET returning the whole response body.
    ///
    /// Failing to reach the camera maps to `ConnectionError`; anything that
    /// breaks after the connection is up, including a non-2xx status such as
    /// a 401 for bad credentials, maps to `TransportError`.
    pub(crate) async fn get(&self, url: Url) -> Result<Vec<u8>> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .header(AUTHORIZATION, &self.auth_header)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CamError::TransportError(format!("{} answered {}", url, status)));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| CamError::TransportError(format!("reading {}: {}", url, e)))?;

        debug!("{} -> {} ({} bytes)", url, status, body.len());
        Ok(body.to_vec())
    }
}
