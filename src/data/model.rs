use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Interval – a labeled time span
// ---------------------------------------------------------------------------

/// A labeled span of the recording, in whole seconds (`start <= end`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
    pub description: String,
}

impl Interval {
    pub fn new(start: u64, end: u64, description: impl Into<String>) -> Self {
        Interval {
            start,
            end,
            description: description.into(),
        }
    }
}

/// Stable key the store hands out for each interval it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntervalId(pub(crate) u64);

impl fmt::Display for IntervalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where an interval in the session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Paired from the annotation file at load time.
    Loaded,
    /// Added by the user during this session.
    User,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Loaded => write!(f, "file"),
            Origin::User => write!(f, "user"),
        }
    }
}

// ---------------------------------------------------------------------------
// Marker – one raw line of the annotation file
// ---------------------------------------------------------------------------

/// A single open (`…1`) or close (`…2`) marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub time: u64,
    pub description: String,
}

impl Marker {
    pub fn new(time: u64, description: impl Into<String>) -> Self {
        Marker {
            time,
            description: description.into(),
        }
    }

    /// Split into (base label, trailing character).
    pub fn split_suffix(&self) -> Option<(&str, char)> {
        let (idx, last) = self.description.char_indices().last()?;
        Some((&self.description[..idx], last))
    }
}

// ---------------------------------------------------------------------------
// Recording – decoded channels
// ---------------------------------------------------------------------------

/// One recorded signal stream.
#[derive(Debug, Clone)]
pub struct Channel {
    pub label: String,
    /// Physical sample values.
    pub samples: Vec<f64>,
    /// Samples per second.
    pub sample_rate: f64,
}

/// Every signal channel of a recording, in file order.
#[derive(Debug, Clone, Default)]
pub struct Recording {
    pub channels: Vec<Channel>,
}

impl Recording {
    pub fn channel(&self, label: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.label == label)
    }

    pub fn labels(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.label.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
