use serde::{Deserialize, Serialize};

use crate::{Channel, Distance, Snapshot};

/// Why a push body was refused.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("No data received")]
    Empty,

    #[error("Invalid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Body served by the pull endpoint: every channel, `-1` when unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullBody {
    pub left: Distance,
    pub right: Distance,
    pub under: Distance,
    pub front: Distance,
    pub back: Distance,
}

impl From<&Snapshot> for PullBody {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            left: snapshot.get(Channel::Left),
            right: snapshot.get(Channel::Right),
            under: snapshot.get(Channel::Under),
            front: snapshot.get(Channel::Front),
            back: snapshot.get(Channel::Back),
        }
    }
}

impl From<PullBody> for Snapshot {
    fn from(body: PullBody) -> Self {
        let mut snapshot = Snapshot::default();
        snapshot.set(Channel::Left, body.left);
        snapshot.set(Channel::Right, body.right);
        snapshot.set(Channel::Under, body.under);
        snapshot.set(Channel::Front, body.front);
        snapshot.set(Channel::Back, body.back);
        snapshot
    }
}

/// Readings pushed from the relay node. Absent fields leave the hub's
/// slot untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PushPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<Distance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back: Option<Distance>,
    /// Reserved for a third source; the relay never fills it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub under: Option<Distance>,
}

impl PushPayload {
    /// Parses a raw request body.
    ///
    /// A blank body is [`PayloadError::Empty`]; anything other than a JSON
    /// object whose known fields are integers is [`PayloadError::Malformed`].
    pub fn parse(body: &[u8]) -> Result<Self, PayloadError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(PayloadError::Empty);
        }

        // Parsing into a map first keeps JSON arrays from being accepted as
        // positional struct fields.
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(body)?;
        Ok(serde_json::from_value(serde_json::Value::Object(object))?)
    }

    /// The channels carried by this payload and their values.
    pub fn fields(&self) -> impl Iterator<Item = (Channel, Distance)> {
        [
            (Channel::Front, self.front),
            (Channel::Back, self.back),
            (Channel::Under, self.under),
        ]
        .into_iter()
        .filter_map(|(channel, distance)| distance.map(|d| (channel, d)))
    }

    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }
}
