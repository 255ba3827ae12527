use std::fmt;

/// Lifecycle of the crawl frontier
///
/// ```text
/// Empty --seed--> Seeded --first pop--> Draining --queue empty / ceiling--> Exhausted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontierState {
    /// Created, nothing enqueued yet
    Empty,

    /// Start URL (and sitemap URLs) enqueued, nothing dequeued
    Seeded,

    /// At least one target dequeued, work remains
    Draining,

    /// Queue empty or page ceiling reached; terminal
    Exhausted,
}

impl FrontierState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: FrontierState) -> bool {
        use FrontierState::*;
        matches!(
            (self, next),
            (Empty, Seeded)
                | (Empty, Exhausted)
                | (Seeded, Seeded)
                | (Seeded, Draining)
                | (Seeded, Exhausted)
                | (Draining, Draining)
                | (Draining, Exhausted)
                | (Exhausted, Exhausted)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Seeded => "seeded",
            Self::Draining => "draining",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for FrontierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
