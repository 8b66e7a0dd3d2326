//! # ndkern
//!
//! **Kernel execution engine for n-dimensional array computing.**
//!
//! ndkern is the compute core that sits underneath an array library: it
//! evaluates elementwise binary operations and boolean reductions (any/all)
//! over arbitrarily strided n-dimensional views, scheduling every kernel as an
//! asynchronous task with explicit dependency edges.
//!
//! ## What lives here
//!
//! - **Offset indexers**: pure mappings from a flat logical index to one, two,
//!   or three memory offsets, so a single kernel body serves contiguous and
//!   strided layouts alike
//! - **Elementwise evaluator**: chunked contiguous and general strided
//!   execution of a binary functor (multiply is the built-in operation)
//! - **Boolean reduction engine**: any/all along a reduction axis, with a
//!   sequential path for short axes and a two-level parallel path (group fold
//!   plus atomic cross-group merge) for long ones
//! - **Broadcast fast path**: contiguous matrix x contiguous row multiply via
//!   a cyclically padded copy of the row
//! - **Dispatch tables**: build-once tables mapping (operation, dtype pair) to
//!   compiled kernel entry points
//! - **Runtime**: submission queue, completion events, device descriptor, and
//!   aligned device buffers
//!
//! ## What does not live here
//!
//! The high-level array type, broadcasting/shape negotiation, argument
//! validation, and type *promotion* policy are the caller's responsibility.
//! This crate only resolves whether a dtype pair is directly supported; mixed
//! pairs must be converted upstream before reaching the engine.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use ndkern::prelude::*;
//! use ndkern::dispatch::multiply_kernels;
//!
//! let queue = Queue::new(Device::host())?;
//!
//! let kernel = multiply_kernels()
//!     .contig
//!     .lookup(DType::F32, DType::F32)
//!     .expect("f32 multiply is supported");
//! let ev = kernel(&queue, n, &a_view, &b_view, &out_view, &[])?;
//! ev.wait()?;
//! ```
//!
//! ## Feature flags
//!
//! - `f16`: half-precision element types (F16, BF16) via the `half` crate

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dispatch;
pub mod dtype;
pub mod error;
pub mod kernels;
pub mod runtime;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::runtime::{Device, DeviceBuffer, Event, EventStatus, Queue};
    pub use crate::tensor::{ArrayView, ArrayViewMut, Layout};
}
