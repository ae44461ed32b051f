use crate::constants::{DECODER_CONTROL_PATH, SNAPSHOT_PATH};
use crate::error::{CamError, Result};
use strum_macros::{AsRefStr, Display, EnumIter};
use url::Url;

/// Action codes accepted by `decoder_control.cgi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum DecoderCommand {
    TiltUp = 0,
    TiltUpStop = 1,
    TiltDown = 2,
    TiltDownStop = 3,
    PanRight = 4,
    PanLeftStop = 5,
    PanLeft = 6,
    PanRightStop = 7,
    PelcoDHorizontalPatrol = 20,
    PelcoDHorizontalPatrolStop = 21,
    Center = 25,
    VerticalPatrol = 26,
    VerticalPatrolStop = 27,
    HorizontalPatrol = 28,
    HorizontalPatrolStop = 29,
    RightUp = 90,
    LeftUp = 91,
    RightDown = 92,
    LeftDown = 93,
    IoOff = 94,
    IoOn = 95,
}

impl DecoderCommand {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// A directional move that must be followed by its own stop code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    pub fn start(self) -> DecoderCommand {
        match self {
            MoveDirection::Up => DecoderCommand::TiltUp,
            MoveDirection::Down => DecoderCommand::TiltDown,
            MoveDirection::Left => DecoderCommand::PanLeft,
            MoveDirection::Right => DecoderCommand::PanRight,
        }
    }

    pub fn stop(self) -> DecoderCommand {
        match self {
            MoveDirection::Up => DecoderCommand::TiltUpStop,
            MoveDirection::Down => DecoderCommand::TiltDownStop,
            MoveDirection::Left => DecoderCommand::PanLeftStop,
            MoveDirection::Right => DecoderCommand::PanRightStop,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Patrol {
    Vertical,
    Horizontal,
    PelcoDHorizontal,
}

impl Patrol {
    pub fn start(self) -> DecoderCommand {
        match self {
            Patrol::Vertical => DecoderCommand::VerticalPatrol,
            Patrol::Horizontal => DecoderCommand::HorizontalPatrol,
            Patrol::PelcoDHorizontal => DecoderCommand::PelcoDHorizontalPatrol,
        }
    }

    pub fn stop(self) -> DecoderCommand {
        match self {
            Patrol::Vertical => DecoderCommand::VerticalPatrolStop,
            Patrol::Horizontal => DecoderCommand::HorizontalPatrolStop,
            Patrol::PelcoDHorizontal => DecoderCommand::PelcoDHorizontalPatrolStop,
        }
    }
}

/// Reject anything that is not a bare `host` or `host:port`. The host doubles
/// as a directory name under the snapshot root, so it must stay one segment.
pub fn check_host(host: &str) -> Result<()> {
    if host.is_empty() {
        return Err(CamError::InvalidArgument("Empty camera host".to_string()));
    }
    let bad_char = |c: char| {
        matches!(c, '/' | '\\' | '?' | '#' | '@') || c.is_whitespace() || c.is_control()
    };
    if host == "." || host == ".." || host.chars().any(bad_char) {
        return Err(CamError::InvalidArgument(format!(
            "Camera host must be a bare network address, got {:?}",
            host
        )));
    }
    Ok(())
}

fn base_url(host: &str, port: u16, path: &str) -> Result<Url> {
    check_host(host)?;
    let mut url = Url::parse(&format!("http://{}{}", host, path))
        .map_err(|e| CamError::InvalidArgument(format!("Bad camera host {:?}: {}", host, e)))?;
    if url.host_str().is_none() || url.path() != path {
        return Err(CamError::InvalidArgument(format!("Bad camera host {:?}", host)));
    }
    url.set_port(Some(port))
        .map_err(|_| CamError::InvalidArgument(format!("Cannot set port on {:?}", host)))?;
    Ok(url)
}

/// `http://<host>:<port>/decoder_control.cgi?command=<code>`
pub fn decoder_control_url(host: &str, port: u16, command: DecoderCommand) -> Result<Url> {
    let mut url = base_url(host, port, DECODER_CONTROL_PATH)?;
    url.query_pairs_mut()
        .append_pair("command", &command.code().to_string());
    Ok(url)
}

/// `http://<host>:<port>/snapshot.cgi?user=<user>`
pub fn snapshot_url(host: &str, port: u16, user: &str) -> Result<Url> {
    let mut url = base_url(host, port, SNAPSHOT_PATH)?;
    url.query_pairs_mut().append_pair("user", user);
    Ok(url)
}
