use serde::{Deserialize, Serialize};

/// Tracked input field whose change authorizes a redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedrawTopic {
    QueryResult,
    Annotations,
    Width,
    Height,
    ForceRender,
    ColorScheme,
    CacheBuster,
}

impl RedrawTopic {
    pub const ALL: [Self; 7] = [
        Self::QueryResult,
        Self::Annotations,
        Self::Width,
        Self::Height,
        Self::ForceRender,
        Self::ColorScheme,
        Self::CacheBuster,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::QueryResult => 1 << 0,
            Self::Annotations => 1 << 1,
            Self::Width => 1 << 2,
            Self::Height => 1 << 3,
            Self::ForceRender => 1 << 4,
            Self::ColorScheme => 1 << 5,
            Self::CacheBuster => 1 << 6,
        }
    }
}

/// Bitmask of changed input fields between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RedrawTopics {
    bits: u8,
}

impl RedrawTopics {
    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn from_topic(topic: RedrawTopic) -> Self {
        Self { bits: topic.bit() }
    }

    #[must_use]
    pub const fn with_topic(self, topic: RedrawTopic) -> Self {
        Self {
            bits: self.bits | topic.bit(),
        }
    }

    #[must_use]
    pub const fn with_topic_if(self, topic: RedrawTopic, changed: bool) -> Self {
        if changed { self.with_topic(topic) } else { self }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn contains(self, topic: RedrawTopic) -> bool {
        (self.bits & topic.bit()) != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }

    /// True when the only changes are geometry or styling, not new results.
    #[must_use]
    pub const fn is_cosmetic(self) -> bool {
        !self.is_none() && !self.contains(RedrawTopic::QueryResult)
    }

    pub fn iter(self) -> impl Iterator<Item = RedrawTopic> {
        RedrawTopic::ALL
            .into_iter()
            .filter(move |topic| self.contains(*topic))
    }
}
