//! Generation tokens for overlapping submissions.
//!
//! Each submission takes a ticket; only the holder of the newest ticket may
//! apply its result. Older in-flight analyses still run to completion but
//! their outcome is discarded.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Submission {
    generation: u64,
}

impl Submission {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
pub struct SubmissionTracker {
    latest: AtomicU64,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new submission, superseding every earlier one
    pub fn begin(&self) -> Submission {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Submission { generation }
    }

    pub fn is_current(&self, submission: Submission) -> bool {
        self.latest.load(Ordering::SeqCst) == submission.generation
    }
}
