//! Offset indexers: pure mappings from a flat logical index to memory offsets
//!
//! An indexer is constructed once per kernel launch from an ndim + offset +
//! shape/strides triple and invoked once per logical index during execution.
//! Iterating the logical index over `[0, N)` visits every logical element
//! exactly once, honoring arbitrary (including zero and negative) strides.
//!
//! Combined indexers bundle two or three logically independent offset
//! computations behind one call so a single kernel body can address multiple
//! operands without branching on layout.
//!
//! Behavior on an out-of-range index is undefined; kernels never produce one
//! by construction, and no error paths exist at this level.

use crate::tensor::{Layout, Shape, Strides};

/// Mapping from a flat logical index to a single memory offset (in elements)
pub trait Indexer: Send + Sync + 'static {
    /// Offset of logical element `gid`
    fn offset(&self, gid: usize) -> isize;
}

/// Mapping from a flat logical index to two independent memory offsets
pub trait PairIndexer: Send + Sync + 'static {
    /// Offsets of logical element `gid` in the two address spaces
    fn offsets(&self, gid: usize) -> (isize, isize);
}

/// Mapping from a flat logical index to three independent memory offsets
pub trait TripleIndexer: Send + Sync + 'static {
    /// Offsets of logical element `gid` in the three address spaces
    fn offsets(&self, gid: usize) -> (isize, isize, isize);
}

/// Identity indexer for already-contiguous addressing: offset == index
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpIndexer;

impl Indexer for NoOpIndexer {
    #[inline]
    fn offset(&self, gid: usize) -> isize {
        gid as isize
    }
}

/// One-dimensional strided indexer: `offset + gid * step`
#[derive(Clone, Copy, Debug)]
pub struct Strided1DIndexer {
    offset: isize,
    step: isize,
}

impl Strided1DIndexer {
    /// Create an indexer stepping `step` elements from `offset`
    pub fn new(offset: isize, step: isize) -> Self {
        Self { offset, step }
    }
}

impl Indexer for Strided1DIndexer {
    #[inline]
    fn offset(&self, gid: usize) -> isize {
        self.offset + gid as isize * self.step
    }
}

#[inline]
fn unflatten_dot(gid: usize, shape: &[usize], strides: &[isize], base: isize) -> isize {
    let mut rem = gid;
    let mut off = base;
    for d in (0..shape.len()).rev() {
        let extent = shape[d];
        off += (rem % extent) as isize * strides[d];
        rem /= extent;
    }
    off
}

/// General strided indexer: unflattens the logical index against the shape
/// and dot-products the coordinates with the strides
#[derive(Clone, Debug)]
pub struct StridedIndexer {
    offset: isize,
    shape: Shape,
    strides: Strides,
}

impl StridedIndexer {
    /// Create an indexer from explicit shape/strides and a base offset
    pub fn new(offset: isize, shape: &[usize], strides: &[isize]) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Self {
            offset,
            shape: shape.iter().copied().collect(),
            strides: strides.iter().copied().collect(),
        }
    }

    /// Create an indexer from a layout
    pub fn from_layout(layout: &Layout) -> Self {
        Self::new(layout.offset() as isize, layout.shape(), layout.strides())
    }
}

impl Indexer for StridedIndexer {
    #[inline]
    fn offset(&self, gid: usize) -> isize {
        unflatten_dot(gid, &self.shape, &self.strides, self.offset)
    }
}

/// Strided indexer resolving one logical index to offsets in two address
/// spaces sharing an iteration shape (e.g. one input and one output array)
#[derive(Clone, Debug)]
pub struct TwoOffsetsStridedIndexer {
    offset1: isize,
    offset2: isize,
    shape: Shape,
    strides1: Strides,
    strides2: Strides,
}

impl TwoOffsetsStridedIndexer {
    /// Create from a shared iteration shape and per-operand strides/offsets
    pub fn new(
        shape: &[usize],
        offset1: isize,
        strides1: &[isize],
        offset2: isize,
        strides2: &[isize],
    ) -> Self {
        debug_assert_eq!(shape.len(), strides1.len());
        debug_assert_eq!(shape.len(), strides2.len());
        Self {
            offset1,
            offset2,
            shape: shape.iter().copied().collect(),
            strides1: strides1.iter().copied().collect(),
            strides2: strides2.iter().copied().collect(),
        }
    }

    /// Create from two layouts; the first layout supplies the iteration shape
    pub fn from_layouts(first: &Layout, second: &Layout) -> Self {
        Self::new(
            first.shape(),
            first.offset() as isize,
            first.strides(),
            second.offset() as isize,
            second.strides(),
        )
    }
}

impl PairIndexer for TwoOffsetsStridedIndexer {
    #[inline]
    fn offsets(&self, gid: usize) -> (isize, isize) {
        let mut rem = gid;
        let mut off1 = self.offset1;
        let mut off2 = self.offset2;
        for d in (0..self.shape.len()).rev() {
            let coord = (rem % self.shape[d]) as isize;
            rem /= self.shape[d];
            off1 += coord * self.strides1[d];
            off2 += coord * self.strides2[d];
        }
        (off1, off2)
    }
}

/// Strided indexer resolving one logical index to offsets in three address
/// spaces sharing an iteration shape (two inputs and one output)
#[derive(Clone, Debug)]
pub struct ThreeOffsetsStridedIndexer {
    offset1: isize,
    offset2: isize,
    offset3: isize,
    shape: Shape,
    strides1: Strides,
    strides2: Strides,
    strides3: Strides,
}

impl ThreeOffsetsStridedIndexer {
    /// Create from a shared iteration shape and per-operand strides/offsets
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        shape: &[usize],
        offset1: isize,
        strides1: &[isize],
        offset2: isize,
        strides2: &[isize],
        offset3: isize,
        strides3: &[isize],
    ) -> Self {
        debug_assert_eq!(shape.len(), strides1.len());
        debug_assert_eq!(shape.len(), strides2.len());
        debug_assert_eq!(shape.len(), strides3.len());
        Self {
            offset1,
            offset2,
            offset3,
            shape: shape.iter().copied().collect(),
            strides1: strides1.iter().copied().collect(),
            strides2: strides2.iter().copied().collect(),
            strides3: strides3.iter().copied().collect(),
        }
    }

    /// Create from three layouts; the third (output) layout supplies the
    /// iteration shape
    pub fn from_layouts(first: &Layout, second: &Layout, third: &Layout) -> Self {
        Self::new(
            third.shape(),
            first.offset() as isize,
            first.strides(),
            second.offset() as isize,
            second.strides(),
            third.offset() as isize,
            third.strides(),
        )
    }
}

impl TripleIndexer for ThreeOffsetsStridedIndexer {
    #[inline]
    fn offsets(&self, gid: usize) -> (isize, isize, isize) {
        let mut rem = gid;
        let mut off1 = self.offset1;
        let mut off2 = self.offset2;
        let mut off3 = self.offset3;
        for d in (0..self.shape.len()).rev() {
            let coord = (rem % self.shape[d]) as isize;
            rem /= self.shape[d];
            off1 += coord * self.strides1[d];
            off2 += coord * self.strides2[d];
            off3 += coord * self.strides3[d];
        }
        (off1, off2, off3)
    }
}

/// Bundles two independent single-offset indexers behind one pair call
#[derive(Clone, Copy, Debug)]
pub struct TwoOffsetsCombinedIndexer<A, B> {
    first: A,
    second: B,
}

impl<A: Indexer, B: Indexer> TwoOffsetsCombinedIndexer<A, B> {
    /// Combine two independent indexers
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Indexer, B: Indexer> PairIndexer for TwoOffsetsCombinedIndexer<A, B> {
    #[inline]
    fn offsets(&self, gid: usize) -> (isize, isize) {
        (self.first.offset(gid), self.second.offset(gid))
    }
}
