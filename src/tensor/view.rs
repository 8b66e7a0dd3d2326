//! Owned, bounds-described views over externally managed buffers
//!
//! A view bundles everything a kernel needs to address one operand: the base
//! address, the allocation length, the element dtype, and the layout. Views
//! are built once at the call boundary and passed by reference into kernel
//! entry points; all pointer arithmetic happens behind the indexers.

use super::Layout;
use crate::dtype::{DType, Element};

/// Read-only view of an array operand
///
/// The view never owns the storage it points at; the caller guarantees the
/// buffer outlives every task that reads through the view.
#[derive(Clone, Debug)]
pub struct ArrayView {
    ptr: u64,
    len: usize,
    dtype: DType,
    layout: Layout,
}

impl ArrayView {
    /// Create a view over externally owned storage
    ///
    /// `ptr` is the base address of the allocation, `len` its extent in
    /// elements of `dtype`.
    ///
    /// # Safety
    /// - `ptr` must point to an allocation of at least `len` elements of
    ///   `dtype`, valid for reads for as long as any task addresses this view
    /// - every offset reachable through `layout` must stay within the
    ///   allocation; the engine does not re-check this
    pub unsafe fn new(ptr: u64, len: usize, dtype: DType, layout: Layout) -> Self {
        Self {
            ptr,
            len,
            dtype,
            layout,
        }
    }

    /// Element dtype of the underlying buffer
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Layout (shape, strides, offset) of this view
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Allocation length in elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the allocation is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Base address of the allocation, without the layout offset applied
    #[inline]
    pub(crate) fn addr(&self) -> u64 {
        self.ptr
    }

    /// Typed base address with the layout offset applied
    #[inline]
    pub(crate) fn typed_addr<T: Element>(&self) -> u64 {
        debug_assert_eq!(self.dtype, T::DTYPE);
        self.ptr + (self.layout.offset() * std::mem::size_of::<T>()) as u64
    }
}

/// Mutable view of an array operand
///
/// Identical to [`ArrayView`] except that kernels may write through it. The
/// distinction is a contract at the boundary: the engine writes only to the
/// designated output range of a mutable view and never through a read view.
#[derive(Clone, Debug)]
pub struct ArrayViewMut {
    ptr: u64,
    len: usize,
    dtype: DType,
    layout: Layout,
}

impl ArrayViewMut {
    /// Create a mutable view over externally owned storage
    ///
    /// # Safety
    /// - `ptr` must point to an allocation of at least `len` elements of
    ///   `dtype`, valid for reads and writes for as long as any task addresses
    ///   this view
    /// - every offset reachable through `layout` must stay within the
    ///   allocation
    /// - the designated output range must not overlap any concurrently read
    ///   input view
    pub unsafe fn new(ptr: u64, len: usize, dtype: DType, layout: Layout) -> Self {
        Self {
            ptr,
            len,
            dtype,
            layout,
        }
    }

    /// Element dtype of the underlying buffer
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Layout (shape, strides, offset) of this view
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Allocation length in elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the allocation is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Base address of the allocation, without the layout offset applied
    #[inline]
    pub(crate) fn addr(&self) -> u64 {
        self.ptr
    }

    /// Typed base address with the layout offset applied
    #[inline]
    pub(crate) fn typed_addr<T: Element>(&self) -> u64 {
        debug_assert_eq!(self.dtype, T::DTYPE);
        self.ptr + (self.layout.offset() * std::mem::size_of::<T>()) as u64
    }
}
