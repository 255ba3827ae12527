//! Breadth-first crawl frontier
//!
//! This module handles:
//! - The FIFO queue of pending targets
//! - The visited set and the set of every target ever enqueued
//! - The page ceiling on fetch attempts

use crate::state::FrontierState;
use crate::url::CrawlTarget;
use std::collections::{HashSet, VecDeque};

/// Frontier manages crawl order and termination
///
/// Invariants:
/// - a target is enqueued at most once per run
/// - a visited target is never enqueued again
/// - at most `max_pages` fetch attempts are handed out
#[derive(Debug)]
pub struct Frontier {
    /// Pending targets, earliest-enqueued first
    queue: VecDeque<CrawlTarget>,

    /// Targets already dequeued
    visited: HashSet<CrawlTarget>,

    /// Every target ever enqueued, dequeued or not
    seen: HashSet<CrawlTarget>,

    /// Fetch attempts recorded so far
    attempts: u32,

    /// Hard ceiling on fetch attempts
    max_pages: u32,

    state: FrontierState,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `max_pages` - Maximum number of fetch attempts for the run
    pub fn new(max_pages: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            seen: HashSet::new(),
            attempts: 0,
            max_pages,
            state: FrontierState::Empty,
        }
    }

    /// Seeds the frontier before the crawl starts
    ///
    /// Seeds are depth-0 peers: the start URL first, then sitemap URLs in
    /// the order given. Duplicates are ignored.
    ///
    /// # Returns
    ///
    /// The number of seeds actually added
    pub fn seed<I>(&mut self, targets: I) -> usize
    where
        I: IntoIterator<Item = CrawlTarget>,
    {
        let added = targets
            .into_iter()
            .filter(|target| self.push(target.clone()))
            .count();

        if added > 0 && self.state == FrontierState::Empty {
            self.transition(FrontierState::Seeded);
        }
        added
    }

    /// Enqueues a discovered target at the back of the queue
    ///
    /// # Returns
    ///
    /// `true` if the target was new; `false` if it was already enqueued or
    /// visited, or the frontier is exhausted
    pub fn push(&mut self, target: CrawlTarget) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        if self.visited.contains(&target) || !self.seen.insert(target.clone()) {
            return false;
        }

        self.queue.push_back(target);
        true
    }

    /// Dequeues the next target and marks it visited
    ///
    /// Returns `None` once the queue is empty or the ceiling is reached; the
    /// frontier is then `Exhausted` for good.
    pub fn next_target(&mut self) -> Option<CrawlTarget> {
        if self.state.is_terminal() {
            return None;
        }

        if self.attempts >= self.max_pages {
            tracing::info!("Page ceiling of {} reached", self.max_pages);
            self.exhaust();
            return None;
        }

        match self.queue.pop_front() {
            Some(target) => {
                self.visited.insert(target.clone());
                self.transition(FrontierState::Draining);
                Some(target)
            }
            None => {
                self.exhaust();
                None
            }
        }
    }

    /// Counts one fetch attempt against the ceiling
    pub fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    fn exhaust(&mut self) {
        self.transition(FrontierState::Exhausted);
        self.queue.clear();
    }

    fn transition(&mut self, next: FrontierState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal frontier transition {} -> {}",
            self.state,
            next
        );
        self.state = next;
    }

    pub fn state(&self) -> FrontierState {
        self.state
    }

    /// Number of pending targets
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_visited(&self, target: &CrawlTarget) -> bool {
        self.visited.contains(target)
    }
}
