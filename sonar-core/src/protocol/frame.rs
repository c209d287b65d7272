use super::{FRAME_HEADER, FRAME_LEN, FrameError, FrameResult};
use crate::Centimeters;

// frame structure : header(1) + distance_mm big-endian(2) + checksum(1)

/// Low byte of the sum of the first three frame bytes.
pub fn checksum(header: u8, high: u8, low: u8) -> u8 {
    header.wrapping_add(high).wrapping_add(low)
}

/// Converts the two distance bytes of a frame to whole centimeters,
/// truncating the millimeter remainder.
pub fn extract_distance(high: u8, low: u8) -> u16 {
    u16::from_be_bytes([high, low]) / 10
}

/// One response from a rangefinder, exactly as received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame([u8; FRAME_LEN]);

impl RawFrame {
    pub const fn from_bytes(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds the well-formed frame a rangefinder sends for `mm`.
    pub fn for_millimeters(mm: u16) -> Self {
        let [high, low] = mm.to_be_bytes();
        Self([FRAME_HEADER, high, low, checksum(FRAME_HEADER, high, low)])
    }

    pub const fn bytes(&self) -> [u8; FRAME_LEN] {
        self.0
    }

    pub fn distance_mm(&self) -> u16 {
        u16::from_be_bytes([self.0[1], self.0[2]])
    }

    /// Checks the header byte and the trailing checksum.
    pub fn validate(&self) -> FrameResult<()> {
        let [header, high, low, actual] = self.0;

        if header != FRAME_HEADER {
            return Err(FrameError::BadHeader(header));
        }

        let expected = checksum(header, high, low);
        if actual != expected {
            return Err(FrameError::Checksum { expected, actual });
        }

        Ok(())
    }

    /// Validates the frame and converts it to an in-range distance.
    pub fn decode(&self) -> FrameResult<Centimeters> {
        self.validate()?;

        let cm = extract_distance(self.0[1], self.0[2]);
        Centimeters::new(cm).ok_or(FrameError::OutOfRange(cm))
    }
}

impl From<[u8; FRAME_LEN]> for RawFrame {
    fn from(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }
}
