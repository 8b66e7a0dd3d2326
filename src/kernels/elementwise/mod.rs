//! Elementwise binary kernels
//!
//! [`common`] holds the operation-agnostic evaluators (contiguous, strided,
//! and the matrix x row broadcast form); operation modules supply the functor
//! and the public entry points the dispatch tables point at.

pub mod common;
pub mod multiply;

pub use common::BinaryFunctor;
