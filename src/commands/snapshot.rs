use crate::camera::CameraClient;
use crate::error::Result;
use crate::protocol::snapshot_url;
use crate::storage::store_image;
use async_trait::async_trait;
use chrono::NaiveDateTime;

#[async_trait]
pub trait Snapshot: Send + Sync {
    /// Fetch a still frame without saving it
    async fn fetch_snapshot(&self, host: &str) -> Result<Vec<u8>>;

    /// Fetch a still frame and store it under the snapshot root.
    /// Returns the generated file name.
    async fn snapshot(&self, host: &str) -> Result<String>;

    /// Like `snapshot`, stamping the image with `now` instead of the clock
    async fn snapshot_at(&self, host: &str, now: NaiveDateTime) -> Result<String>;
}

#[async_trait]
impl Snapshot for CameraClient {
    async fn fetch_snapshot(&self, host: &str) -> Result<Vec<u8>> {
        let url = snapshot_url(host, self.port(), &self.config.snapshot_user)?;
        self.get(url).await
    }

    async fn snapshot(&self, host: &str) -> Result<String> {
        let image = self.fetch_snapshot(host).await?;
        let now = chrono::Local::now().naive_local();
        store_image(&self.config.snapshot_root, host, now, image).await
    }

    async fn snapshot_at(&self, host: &str, now: NaiveDateTime) -> Result<String> {
        let image = self.fetch_snapshot(host).await?;
        store_image(&self.config.snapshot_root, host, now, image).await
    }
}
