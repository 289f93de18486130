//! Lock-free work distribution over an immutable item list.
//!
//! Workers share one `DispatchCursor` and call `claim` until it returns
//! `None`. Each index in `[0, len)` is handed out exactly once.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared "next unclaimed index" over a list of `len` items.
#[derive(Debug)]
pub struct DispatchCursor {
    next: AtomicUsize,
    len: usize,
}

impl DispatchCursor {
    pub fn new(len: usize) -> Self {
        Self {
            next: AtomicUsize::new(0),
            len,
        }
    }

    /// Claim the next index, or `None` once the list is exhausted.
    ///
    /// Claim values are strictly increasing across all callers. Only the
    /// counter is synchronised, so `Relaxed` is enough: the item list is
    /// built before the workers start and never written during the run.
    pub fn claim(&self) -> Option<usize> {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        (index < self.len).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_in_order_then_ends() {
        let cursor = DispatchCursor::new(3);
        assert_eq!(cursor.claim(), Some(0));
        assert_eq!(cursor.claim(), Some(1));
        assert_eq!(cursor.claim(), Some(2));
        assert_eq!(cursor.claim(), None);
        assert_eq!(cursor.claim(), None);
    }

    #[test]
    fn empty_list_ends_immediately() {
        let cursor = DispatchCursor::new(0);
        assert_eq!(cursor.claim(), None);
    }

    #[test]
    fn concurrent_claims_cover_every_index_once() {
        const LEN: usize = 10_000;
        for threads in [1, 2, 8, 32] {
            let cursor = DispatchCursor::new(LEN);
            let mut claimed: Vec<usize> = std::thread::scope(|s| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        s.spawn(|| {
                            let mut mine = Vec::new();
                            while let Some(i) = cursor.claim() {
                                mine.push(i);
                            }
                            mine
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .flat_map(|h| h.join().unwrap())
                    .collect()
            });
            assert_eq!(claimed.len(), LEN, "threads={threads}");
            claimed.sort_unstable();
            assert!(claimed.iter().copied().eq(0..LEN), "threads={threads}");
        }
    }

    #[test]
    fn per_thread_claims_are_increasing() {
        let cursor = DispatchCursor::new(5_000);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let mut last = None;
                    while let Some(i) = cursor.claim() {
                        if let Some(prev) = last {
                            assert!(i > prev);
                        }
                        last = Some(i);
                    }
                });
            }
        });
    }
}
