// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// The execution mode used for the rendering process.
pub enum ExecutionMode {
    /// Compute and composite one row after the other on the calling thread.
    #[default]
    Serial,
    /// Compute the coverage of all rows on the rayon thread pool, then composite them in order
    /// on the calling thread.
    #[cfg(feature = "multithreading")]
    Parallel,
}

/// A flag to request that running operations stop early.
///
/// Clones share the same flag, so a token can be cancelled from another thread while an
/// operation polls it.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Whether an optional token has been cancelled.
#[inline]
pub(crate) fn is_cancelled(token: Option<&CancellationToken>) -> bool {
    token.is_some_and(|t| t.is_cancelled())
}

#[cfg(test)]
mod tests {
    use super::{is_cancelled, CancellationToken};

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let clone = token.clone();

        assert!(!is_cancelled(Some(&token)));
        clone.cancel();
        assert!(token.is_cancelled());
        assert!(is_cancelled(Some(&token)));
        assert!(!is_cancelled(None));
    }

    #[test]
    fn cancel_from_other_thread() {
        let token = CancellationToken::new();
        let remote = token.clone();

        std::thread::spawn(move || remote.cancel()).join().unwrap();

        assert!(token.is_cancelled());
    }
}
