//! Observability: process-wide operation counters with an explicit
//! snapshot/reset lifecycle. The engine never performs I/O; callers
//! read snapshots and ship them wherever they like.

use std::sync::atomic::{AtomicU64, Ordering};

static ENCODE_CALLS: AtomicU64 = AtomicU64::new(0);
static DECODE_CALLS: AtomicU64 = AtomicU64::new(0);
static DECODE_FAILURES: AtomicU64 = AtomicU64::new(0);
static DECODE_ISSUES: AtomicU64 = AtomicU64::new(0);

///
/// ObsSnapshot
/// Point-in-time view of the engine counters.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ObsSnapshot {
    pub encode_calls: u64,
    pub decode_calls: u64,
    pub decode_failures: u64,
    pub decode_issues: u64,
}

/// Read the current counter values.
#[must_use]
pub fn snapshot() -> ObsSnapshot {
    ObsSnapshot {
        encode_calls: ENCODE_CALLS.load(Ordering::Relaxed),
        decode_calls: DECODE_CALLS.load(Ordering::Relaxed),
        decode_failures: DECODE_FAILURES.load(Ordering::Relaxed),
        decode_issues: DECODE_ISSUES.load(Ordering::Relaxed),
    }
}

/// Reset every counter to zero.
pub fn reset() {
    ENCODE_CALLS.store(0, Ordering::Relaxed);
    DECODE_CALLS.store(0, Ordering::Relaxed);
    DECODE_FAILURES.store(0, Ordering::Relaxed);
    DECODE_ISSUES.store(0, Ordering::Relaxed);
}

pub(crate) fn record_encode() {
    ENCODE_CALLS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_decode() {
    DECODE_CALLS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_decode_failure(issues: usize) {
    DECODE_FAILURES.fetch_add(1, Ordering::Relaxed);
    DECODE_ISSUES.fetch_add(issues as u64, Ordering::Relaxed);
}
