use phf::phf_map;

/// Directory component for a snapshot's day, `date.isoformat()` style.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp embedded in snapshot file names.
pub const IMAGE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

pub const IMAGE_PREFIX: &str = "img_";
pub const IMAGE_EXTENSION: &str = "jpg";

pub const DECODER_CONTROL_PATH: &str = "/decoder_control.cgi";
pub const SNAPSHOT_PATH: &str = "/snapshot.cgi";

pub const HTTP_PORT: u16 = 80;
pub const SNAPSHOT_USER: &str = "admin";
pub const SNAPSHOT_ROOT: &str = "/var/www/camctrl/img";

/// Default time a directional command stays active, in seconds.
pub const DEFAULT_MOVE_INTERVAL: f64 = 0.8;

/// Permission bits for new snapshot files.
pub const IMAGE_FILE_MODE: u32 = 0o644;

/// Short CLI spellings mapped to their full action names.
pub static ACTION_ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "r" => "pan_right",
    "l" => "pan_left",
    "u" => "tilt_up",
    "d" => "tilt_down",
    "s" => "snapshot",
};
