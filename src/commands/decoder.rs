use crate::camera::CameraClient;
use crate::error::Result;
use crate::protocol::{DecoderCommand, Patrol, decoder_control_url};
use async_trait::async_trait;
use log::debug;

#[async_trait]
pub trait DecoderControl: Send + Sync {
    /// Send one decoder command to the camera at `host`
    async fn dispatch(&self, command: DecoderCommand, host: &str) -> Result<Vec<u8>>;

    /// Turn infrared (night vision) on
    async fn ir_on(&self, host: &str) -> Result<()>;

    /// Turn infrared off
    async fn ir_off(&self, host: &str) -> Result<()>;

    /// Return the head to its center position
    async fn center(&self, host: &str) -> Result<()>;

    async fn start_patrol(&self, patrol: Patrol, host: &str) -> Result<()>;

    async fn stop_patrol(&self, patrol: Patrol, host: &str) -> Result<()>;
}

#[async_trait]
impl DecoderControl for CameraClient {
    async fn dispatch(&self, command: DecoderCommand, host: &str) -> Result<Vec<u8>> {
        let url = decoder_control_url(host, self.port(), command)?;
        debug!("{} -> {} (code {})", command, host, command.code());
        self.get(url).await
    }

    async fn ir_on(&self, host: &str) -> Result<()> {
        self.dispatch(DecoderCommand::IoOn, host).await?;
        Ok(())
    }

    async fn ir_off(&self, host: &str) -> Result<()> {
        self.dispatch(DecoderCommand::IoOff, host).await?;
        Ok(())
    }

    async fn center(&self, host: &str) -> Result<()> {
        self.dispatch(DecoderCommand::Center, host).await?;
        Ok(())
    }

    async fn start_patrol(&self, patrol: Patrol, host: &str) -> Result<()> {
        self.dispatch(patrol.start(), host).await?;
        Ok(())
    }

    async fn stop_patrol(&self, patrol: Patrol, host: &str) -> Result<()> {
        self.dispatch(patrol.stop(), host).await?;
        Ok(())
    }
}
