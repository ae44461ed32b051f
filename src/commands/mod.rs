mod decoder;
mod ptz;
mod snapshot;

pub use decoder::DecoderControl;
pub use ptz::PTZ;
pub use snapshot::Snapshot;
