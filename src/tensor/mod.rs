//! Memory layout descriptions and array views
//!
//! Kernels never own array storage. The caller describes each operand once at
//! the boundary as an [`ArrayView`] (pointer, length, dtype, layout) and the
//! engine reads offsets and strides from it; elements are addressed through
//! the indexers in [`crate::kernels::indexer`].

mod layout;
mod view;

pub use layout::{Layout, Shape, Strides};
pub use view::{ArrayView, ArrayViewMut};
