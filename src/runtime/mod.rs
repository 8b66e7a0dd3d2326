//! Execution runtime: device description, submission queue, events, memory
//!
//! All compute proceeds as asynchronous task submissions onto a [`Queue`].
//! Submitting returns a non-blocking [`Event`]; tasks are ordered only by the
//! explicit dependency edges passed at submission, never by submission order.
//!
//! # Architecture
//!
//! ```text
//! Device  (capability descriptor: lane widths, compute units, collectives)
//! Queue   (task submission, dependency resolution, shared worker pool)
//! Event   (completion handle: pending -> complete | failed)
//! DeviceBuffer (aligned allocation addressed as u64, deferred release)
//! ```

mod alloc;
mod device;
mod event;
mod queue;

pub use alloc::DeviceBuffer;
pub use device::Device;
pub use event::{Event, EventStatus};
pub use queue::{Queue, TaskScope};
