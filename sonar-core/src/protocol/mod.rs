mod error;
mod frame;

pub use error::{FrameError, FrameResult};
pub use frame::{RawFrame, checksum, extract_distance};

/// Byte sent to a rangefinder to request one measurement.
pub const POLL_COMMAND: u8 = 0x55;
/// First byte of every well-formed response frame.
pub const FRAME_HEADER: u8 = 0xFF;
/// Length of a response frame in bytes.
pub const FRAME_LEN: usize = 4;
