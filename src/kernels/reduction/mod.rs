//! Reduction kernels
//!
//! Boolean any/all reductions along a folded axis, with a sequential path for
//! short axes and a two-level parallel path (group fold plus atomic
//! cross-group merge) for long ones.

pub mod boolean;
