pub mod camera;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod protocol;
pub mod storage;

pub use camera::CameraClient;
pub use commands::*;
pub use config::{CameraConfig, Credentials};
pub use error::{CamError, Result};
pub use protocol::{DecoderCommand, MoveDirection, Patrol};
