//! Atomic merge helper for cross-group reduction commits

use std::sync::atomic::{AtomicI32, Ordering};

/// Merge `value` into `slot` through a compare-and-swap retry loop.
///
/// Relaxed ordering is sufficient: the slot is the only location shared
/// between groups, and the combining function must be associative and
/// commutative, so the final value is independent of commit order.
#[inline]
pub fn atomic_combine(slot: &AtomicI32, value: i32, combine: impl Fn(i32, i32) -> i32) {
    let mut current = slot.load(Ordering::Relaxed);
    loop {
        let new = combine(current, value);
        match slot.compare_exchange_weak(current, new, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(actual) => current = actual,
        }
    }
}
