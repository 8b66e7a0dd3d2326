//! Common test utilities
#![allow(dead_code)]

use ndkern::prelude::*;

/// Create a queue over the default host device
pub fn make_queue() -> Queue {
    Queue::new(Device::host()).expect("host queue")
}

/// Create a queue over a device with pinned sub-group widths
///
/// The reduction work-group width is four times the largest width, so this
/// pins the sequential/parallel cutover for deterministic tests.
pub fn make_queue_with_sub_groups(sizes: &[usize]) -> Queue {
    Queue::new(Device::with_sub_group_sizes(sizes)).expect("host queue")
}

/// Read-only view over a whole buffer with the given layout
pub fn view_of<T: Element>(buf: &DeviceBuffer, layout: Layout) -> ArrayView {
    unsafe { ArrayView::new(buf.ptr(), buf.len_for(T::DTYPE), T::DTYPE, layout) }
}

/// Mutable view over a whole buffer with the given layout
pub fn view_mut_of<T: Element>(buf: &DeviceBuffer, layout: Layout) -> ArrayViewMut {
    unsafe { ArrayViewMut::new(buf.ptr(), buf.len_for(T::DTYPE), T::DTYPE, layout) }
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}
