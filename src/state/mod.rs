//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageOutcome`: What happened to each dequeued target (saved, empty, skipped, failed)
//! - `FrontierState`: Lifecycle of the crawl frontier (empty, seeded, draining, exhausted)

mod frontier_state;
mod page_outcome;

// Re-export main types
pub use frontier_state::FrontierState;
pub use page_outcome::PageOutcome;
