//! Running crawl counters
//!
//! Updated once per dequeued target and printed when the crawl finishes.

use crate::state::PageOutcome;
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// Fetch attempts (every outcome except `Skipped`)
    pub attempted: u64,

    /// Pages written with content
    pub saved: u64,

    /// Pages written with an empty body
    pub empty: u64,

    /// Targets skipped as non-document resources
    pub skipped: u64,

    /// Render or write failures
    pub failed: u64,

    /// Links accepted into the frontier
    pub links_discovered: u64,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStats {
    pub fn new() -> Self {
        Self {
            attempted: 0,
            saved: 0,
            empty: 0,
            skipped: 0,
            failed: 0,
            links_discovered: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Counts one page outcome
    pub fn record(&mut self, outcome: PageOutcome) {
        if outcome.is_attempt() {
            self.attempted += 1;
        }

        match outcome {
            PageOutcome::Saved => self.saved += 1,
            PageOutcome::Empty => self.empty += 1,
            PageOutcome::Skipped => self.skipped += 1,
            PageOutcome::Failed => self.failed += 1,
        }
    }

    pub fn record_links(&mut self, count: usize) {
        self.links_discovered += count as u64;
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Pages that produced a file
    pub fn written(&self) -> u64 {
        self.saved + self.empty
    }

    pub fn duration_seconds(&self) -> i64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_seconds()
    }

    /// One-line progress summary for logs
    pub fn progress_line(&self) -> String {
        format!(
            "{} attempted, {} saved, {} empty, {} failed, {} skipped",
            self.attempted, self.saved, self.empty, self.failed, self.skipped
        )
    }

    /// Prints statistics to stdout in a formatted manner
    pub fn print_summary(&self) {
        println!("=== Crawl Statistics ===\n");

        println!("Overview:");
        println!("  Fetch attempts: {}", self.attempted);
        println!("  Links discovered: {}", self.links_discovered);
        println!("  Duration: {}s", self.duration_seconds());
        println!();

        println!("Pages by Outcome:");
        for outcome in PageOutcome::all_outcomes() {
            let count = match outcome {
                PageOutcome::Saved => self.saved,
                PageOutcome::Empty => self.empty,
                PageOutcome::Skipped => self.skipped,
                PageOutcome::Failed => self.failed,
            };
            println!("  {}: {}", outcome, count);
        }
        println!();

        let success_rate = if self.attempted > 0 {
            (self.saved as f64 / self.attempted as f64) * 100.0
        } else {
            0.0
        };

        println!(
            "Success Rate: {:.1}% ({} / {} pages saved with content)",
            success_rate, self.saved, self.attempted
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_outcomes() {
        let mut stats = CrawlStats::new();
        stats.record(PageOutcome::Saved);
        stats.record(PageOutcome::Saved);
        stats.record(PageOutcome::Empty);
        stats.record(PageOutcome::Failed);
        stats.record(PageOutcome::Skipped);

        assert_eq!(stats.attempted, 4);
        assert_eq!(stats.saved, 2);
        assert_eq!(stats.empty, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.written(), 3);
    }

    #[test]
    fn test_progress_line() {
        let mut stats = CrawlStats::new();
        stats.record(PageOutcome::Saved);
        stats.record_links(7);

        assert_eq!(
            stats.progress_line(),
            "1 attempted, 1 saved, 0 empty, 0 failed, 0 skipped"
        );
        assert_eq!(stats.links_discovered, 7);
    }

    #[test]
    fn test_finish_sets_end() {
        let mut stats = CrawlStats::new();
        assert!(stats.finished_at.is_none());
        stats.finish();
        assert!(stats.finished_at.is_some());
        assert!(stats.duration_seconds() >= 0);
    }
}
