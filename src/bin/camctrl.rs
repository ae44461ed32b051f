//! Command-line front end for foscam-rs.
//!
//! Usage:
//!   camctrl -c camctrl.json                      # snapshot of the config's default_host
//!   camctrl s cam1.local                         # snapshot with built-in defaults
//!   camctrl -c camctrl.json u cam1.local 0.5     # tilt up for half a second
//!   camctrl -c camctrl.json ir_on cam1.local

use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;
use foscam_rs::constants::ACTION_ALIASES;
use foscam_rs::{CamError, CameraClient, CameraConfig, DecoderControl, PTZ, Result, Snapshot};
use log::info;
use strum_macros::{AsRefStr, EnumIter, EnumString};

#[derive(Debug, Parser)]
#[command(name = "camctrl", about = "Pan, tilt, toggle IR and take snapshots on Foscam-style IP cameras")]
struct Cli {
    /// Path to a JSON configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Action name or its one-letter alias (r, l, u, d, s). Without one, a
    /// snapshot of the config's `default_host` is taken, which needs `-c`.
    action: Option<String>,

    /// Positional arguments for the action, usually `HOST [INTERVAL]`.
    args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
enum Action {
    PanRight,
    PanLeft,
    TiltUp,
    TiltDown,
    Snapshot,
    IrOn,
    IrOff,
    Center,
}

impl Action {
    fn parse(name: &str) -> Result<Self> {
        let full = ACTION_ALIASES.get(name).copied().unwrap_or(name);
        Action::from_str(full)
            .map_err(|_| CamError::InvalidArgument(format!("unknown action {:?}", name)))
    }

    /// Minimum and maximum number of positional arguments.
    fn arity(self) -> (usize, usize) {
        match self {
            Action::PanRight | Action::PanLeft | Action::TiltUp | Action::TiltDown => (1, 2),
            Action::Snapshot => (0, 1),
            Action::IrOn | Action::IrOff | Action::Center => (1, 1),
        }
    }
}

#[derive(Debug, PartialEq)]
struct Invocation {
    action: Action,
    host: String,
    interval: Option<f64>,
}

fn plan(action: Option<&str>, args: &[String], config: &CameraConfig) -> Result<Invocation> {
    let action = match action {
        Some(name) => Action::parse(name)?,
        None => Action::Snapshot,
    };

    let (min, max) = action.arity();
    if args.len() < min || args.len() > max {
        return Err(CamError::InvalidArgument(format!(
            "{} takes {} to {} arguments, got {}",
            action.as_ref(),
            min,
            max,
            args.len()
        )));
    }

    let host = match args.first() {
        Some(host) => host.clone(),
        None => config.default_host.clone().ok_or_else(|| {
            CamError::InvalidArgument(
                "no host given and no default_host configured (pass -c CONFIG or a HOST)"
                    .to_string(),
            )
        })?,
    };

    let interval = args
        .get(1)
        .map(|raw| {
            raw.parse::<f64>()
                .map_err(|_| CamError::InvalidArgument(format!("bad interval {:?}", raw)))
        })
        .transpose()?;

    Ok(Invocation {
        action,
        host,
        interval,
    })
}

async fn run(client: &CameraClient, inv: &Invocation) -> Result<()> {
    let interval = inv.interval.unwrap_or(client.config().move_interval);
    let host = inv.host.as_str();

    match inv.action {
        Action::PanRight => client.pan_right(host, interval).await,
        Action::PanLeft => client.pan_left(host, interval).await,
        Action::TiltUp => client.tilt_up(host, interval).await,
        Action::TiltDown => client.tilt_down(host, interval).await,
        Action::IrOn => client.ir_on(host).await,
        Action::IrOff => client.ir_off(host).await,
        Action::Center => client.center(host).await,
        Action::Snapshot => {
            let name = client.snapshot(host).await?;
            println!("{}", name);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CameraConfig::from_file(path),
        None => Ok(CameraConfig::default()),
    };
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            eprintln!("camctrl: {}", e);
            process::exit(1);
        }
    };

    let invocation = match plan(cli.action.as_deref(), &cli.args, &config) {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("camctrl: {}", e);
            process::exit(2);
        }
    };

    let client = match CameraClient::new(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("camctrl: {}", e);
            process::exit(1);
        }
    };

    info!("{} on {}", invocation.action.as_ref(), invocation.host);
    if let Err(e) = run(&client, &invocation).await {
        eprintln!("camctrl: {} on {} failed: {}", invocation.action.as_ref(), invocation.host, e);
        process::exit(1);
    }
}
