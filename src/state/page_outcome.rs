/// Per-page outcome definitions reported while crawling
///
/// Every dequeued target ends in exactly one of these outcomes.
use std::fmt;

/// What happened to one dequeued crawl target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    // ===== Written States =====
    /// Page rendered, content extracted and written
    Saved,

    /// Page rendered and written, but extraction produced no text
    Empty,

    // ===== Not Fetched =====
    /// Target points at a non-document resource; never rendered and not
    /// counted against the page ceiling
    Skipped,

    // ===== Error States =====
    /// Render (navigation, timeout, non-HTML) or write failure
    Failed,
}

impl PageOutcome {
    /// Returns true if the page counts as a fetch attempt
    pub fn is_attempt(&self) -> bool {
        !matches!(self, Self::Skipped)
    }

    /// Short label used in progress logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Empty => "empty",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible outcomes
    pub fn all_outcomes() -> Vec<Self> {
        vec![Self::Saved, Self::Empty, Self::Skipped, Self::Failed]
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_attempt() {
        assert!(PageOutcome::Saved.is_attempt());
        assert!(PageOutcome::Empty.is_attempt());
        assert!(PageOutcome::Failed.is_attempt());

        assert!(!PageOutcome::Skipped.is_attempt());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PageOutcome::Saved), "saved");
        assert_eq!(format!("{}", PageOutcome::Empty), "empty");
        assert_eq!(format!("{}", PageOutcome::Failed), "failed");
    }

    #[test]
    fn test_all_outcomes_distinct_labels() {
        let labels: std::collections::HashSet<_> = PageOutcome::all_outcomes()
            .iter()
            .map(|o| o.as_str())
            .collect();
        assert_eq!(labels.len(), 4);
    }
}
