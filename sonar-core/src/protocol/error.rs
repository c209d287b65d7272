pub type FrameResult<T> = core::result::Result<T, FrameError>;

/// Reasons a poll produced no usable distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("timed out with {received} of 4 bytes available")]
    Timeout { received: usize },

    #[error("unexpected header byte {0:#04x}")]
    BadHeader(u8),

    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    Checksum { expected: u8, actual: u8 },

    #[error("distance {0} cm out of range")]
    OutOfRange(u16),
}
