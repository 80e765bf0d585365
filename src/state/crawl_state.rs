//! Crawl run state machine
//!
//! A run starts in `Running` and moves to `Done` exactly once. [`StopReason`]
//! records why.

use std::fmt;

/// Reason the crawl loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// No pending URLs remain
    FrontierExhausted,

    /// The page budget has been used up
    BudgetReached,

    /// The operator asked the run to stop
    Interrupted,
}

/// Represents the current state of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    Running,
    Done(StopReason),
}

impl CrawlState {
    /// Returns true while the loop should keep iterating
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Moves the run to `Done`
    ///
    /// A run that is already done keeps its original stop reason.
    pub fn finish(&mut self, reason: StopReason) {
        if self.is_running() {
            *self = Self::Done(reason);
        }
    }

    /// The stop reason, once the run is done
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            Self::Running => None,
            Self::Done(reason) => Some(*reason),
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FrontierExhausted => "frontier exhausted",
            Self::BudgetReached => "page budget reached",
            Self::Interrupted => "interrupted",
        };
        write!(f, "{}", s)
    }
}
