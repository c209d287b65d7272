use std::fmt;

use serde::{Deserialize, Serialize};

pub mod payload;
pub mod protocol;

pub use payload::{PayloadError, PullBody, PushPayload};
pub use protocol::{FrameError, FrameResult, RawFrame, checksum, extract_distance};

/// Largest distance, in centimeters, a reading may carry.
pub const MAX_DISTANCE_CM: u16 = 600;

/// Wire value standing in for a channel without a valid reading.
pub const UNAVAILABLE: i32 = -1;

/// One named distance-measurement source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Left,
    Right,
    Under,
    Front,
    Back,
}

/// Which node produces the readings of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Polled by the hub itself.
    Local,
    /// Pushed by the relay node.
    Pushed,
    /// Accepted from pushes but not produced by any node yet.
    Reserved,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Left,
        Channel::Right,
        Channel::Under,
        Channel::Front,
        Channel::Back,
    ];

    /// Lowercase name used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Channel::Left => "left",
            Channel::Right => "right",
            Channel::Under => "under",
            Channel::Front => "front",
            Channel::Back => "back",
        }
    }

    /// Capitalized name used on the status display.
    pub const fn label(self) -> &'static str {
        match self {
            Channel::Left => "Left",
            Channel::Right => "Right",
            Channel::Under => "Under",
            Channel::Front => "Front",
            Channel::Back => "Back",
        }
    }

    pub const fn source(self) -> Source {
        match self {
            Channel::Left | Channel::Right => Source::Local,
            Channel::Front | Channel::Back => Source::Pushed,
            Channel::Under => Source::Reserved,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A distance in whole centimeters, always within `0..=MAX_DISTANCE_CM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Centimeters(u16);

impl Centimeters {
    /// Returns `None` when `value` exceeds [`MAX_DISTANCE_CM`].
    pub const fn new(value: u16) -> Option<Self> {
        if value <= MAX_DISTANCE_CM {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

/// The latest state of a channel: a measurement or nothing usable.
///
/// On the wire a distance is an integer centimeter value with `-1` standing
/// for [`Distance::Unavailable`]. Decoding never fails on range: anything
/// outside `0..=600` collapses to `Unavailable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i32")]
pub enum Distance {
    Measured(Centimeters),
    #[default]
    Unavailable,
}

impl Distance {
    pub fn from_cm(cm: i64) -> Self {
        u16::try_from(cm)
            .ok()
            .and_then(Centimeters::new)
            .map_or(Distance::Unavailable, Distance::Measured)
    }

    pub fn cm(self) -> Option<u16> {
        match self {
            Distance::Measured(cm) => Some(cm.get()),
            Distance::Unavailable => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Distance::Measured(_))
    }

    pub fn to_wire(self) -> i32 {
        self.cm().map_or(UNAVAILABLE, i32::from)
    }
}

impl From<Centimeters> for Distance {
    fn from(cm: Centimeters) -> Self {
        Distance::Measured(cm)
    }
}

impl From<i64> for Distance {
    fn from(cm: i64) -> Self {
        Distance::from_cm(cm)
    }
}

impl From<Distance> for i32 {
    fn from(distance: Distance) -> Self {
        distance.to_wire()
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Measured(cm) => write!(f, "{} cm", cm.get()),
            Distance::Unavailable => f.write_str("N/A"),
        }
    }
}

/// Point-in-time copy of every channel's latest distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    slots: [Distance; 5],
}

impl Snapshot {
    pub fn get(&self, channel: Channel) -> Distance {
        self.slots[channel.index()]
    }

    pub fn set(&mut self, channel: Channel, distance: Distance) {
        self.slots[channel.index()] = distance;
    }

    /// Channels in display order with their distances.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, Distance)> + '_ {
        Channel::ALL.iter().map(|&channel| (channel, self.get(channel)))
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (channel, distance)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", channel.label(), distance)?;
        }
        Ok(())
    }
}
