use crate::camera::CameraClient;
use crate::commands::DecoderControl;
use crate::config::move_interval;
use crate::error::Result;
use crate::protocol::MoveDirection;
use async_trait::async_trait;
use log::{debug, warn};
use tokio::time::sleep;

#[async_trait]
pub trait PTZ: Send + Sync {
    /// Move in `direction` for `interval` seconds, then stop.
    ///
    /// The stop command goes out even when the start command fails, so a
    /// half-delivered start never leaves the head moving. A start failure is
    /// still reported after the stop attempt.
    async fn move_for(&self, direction: MoveDirection, host: &str, interval: f64) -> Result<()>;

    /// Move in `direction` for the configured default interval
    async fn step(&self, direction: MoveDirection, host: &str) -> Result<()>;

    async fn tilt_up(&self, host: &str, interval: f64) -> Result<()> {
        self.move_for(MoveDirection::Up, host, interval).await
    }

    async fn tilt_down(&self, host: &str, interval: f64) -> Result<()> {
        self.move_for(MoveDirection::Down, host, interval).await
    }

    async fn pan_left(&self, host: &str, interval: f64) -> Result<()> {
        self.move_for(MoveDirection::Left, host, interval).await
    }

    async fn pan_right(&self, host: &str, interval: f64) -> Result<()> {
        self.move_for(MoveDirection::Right, host, interval).await
    }
}

#[async_trait]
impl PTZ for CameraClient {
    async fn move_for(&self, direction: MoveDirection, host: &str, interval: f64) -> Result<()> {
        let wait = move_interval(interval)?;

        let started = self.dispatch(direction.start(), host).await;
        if let Err(e) = &started {
            warn!("{} start on {} failed, sending stop anyway: {}", direction, host, e);
        }

        sleep(wait).await;
        let stopped = self.dispatch(direction.stop(), host).await;
        debug!("{} on {} stopped after {:?}", direction, host, wait);

        started?;
        stopped?;
        Ok(())
    }

    async fn step(&self, direction: MoveDirection, host: &str) -> Result<()> {
        self.move_for(direction, host, self.config.move_interval).await
    }
}
