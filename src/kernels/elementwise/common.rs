//! Operation-agnostic elementwise evaluators
//!
//! Each evaluator submits one task that applies a [`BinaryFunctor`] over two
//! input streams into an output stream:
//!
//! - contiguous: the flat range is split into fixed-size chunks per work
//!   item; functors over wide-loadable types process `VEC_SZ`-element blocks
//!   (chunked so the compiler can vectorize), everything else goes scalar
//! - strided: a three-offset indexer resolves every logical index to the two
//!   input offsets and the output offset; scalar application only
//! - matrix x row broadcast: sub-group-aligned blocks read the matrix
//!   contiguously and the row from a cyclically padded copy, so no modular
//!   arithmetic runs inside the lane loop
//!
//! Evaluators write only the designated output range and never mutate inputs.

use crate::dtype::Element;
use crate::kernels::indexer::{ThreeOffsetsStridedIndexer, TripleIndexer};
use crate::runtime::{Event, Queue};

/// Elements per vectorized block
pub const VEC_SZ: usize = 4;
/// Vectorized blocks per work item
pub const N_VECS: usize = 2;

/// A scalar binary operation, optionally applied in `VEC_SZ`-wide blocks
pub trait BinaryFunctor: Send + Sync + 'static {
    /// First input element type
    type Arg1: Element;
    /// Second input element type
    type Arg2: Element;
    /// Output element type
    type Res: Element;

    /// Whether the contiguous evaluator may use the blocked path
    const SUPPORTS_VEC: bool;

    /// Apply the operation to one element pair
    fn apply(a: Self::Arg1, b: Self::Arg2) -> Self::Res;

    /// Apply the operation to a block of element pairs
    #[inline]
    fn apply_vec(a: &[Self::Arg1; VEC_SZ], b: &[Self::Arg2; VEC_SZ]) -> [Self::Res; VEC_SZ] {
        let mut out = [<Self::Res as Element>::zero(); VEC_SZ];
        for l in 0..VEC_SZ {
            out[l] = Self::apply(a[l], b[l]);
        }
        out
    }
}

/// Submit the contiguous evaluator for `nelems` flat elements
///
/// The addresses already include each operand's element offset.
pub(crate) fn submit_binary_contig<F: BinaryFunctor>(
    queue: &Queue,
    nelems: usize,
    arg1_addr: u64,
    arg2_addr: u64,
    res_addr: u64,
    depends: &[Event],
) -> Event {
    queue.submit(depends, move |scope| {
        let elems_per_wi = VEC_SZ * N_VECS;
        let num_items = (nelems + elems_per_wi - 1) / elems_per_wi;
        scope.parallel_for(num_items, |wi| unsafe {
            let a = arg1_addr as *const F::Arg1;
            let b = arg2_addr as *const F::Arg2;
            let r = res_addr as *mut F::Res;
            let start = wi * elems_per_wi;
            let end = (start + elems_per_wi).min(nelems);
            if F::SUPPORTS_VEC {
                let mut i = start;
                while i + VEC_SZ <= end {
                    let mut va = [<F::Arg1 as Element>::zero(); VEC_SZ];
                    let mut vb = [<F::Arg2 as Element>::zero(); VEC_SZ];
                    for l in 0..VEC_SZ {
                        va[l] = *a.add(i + l);
                        vb[l] = *b.add(i + l);
                    }
                    let vr = F::apply_vec(&va, &vb);
                    for l in 0..VEC_SZ {
                        *r.add(i + l) = vr[l];
                    }
                    i += VEC_SZ;
                }
                while i < end {
                    *r.add(i) = F::apply(*a.add(i), *b.add(i));
                    i += 1;
                }
            } else {
                for i in start..end {
                    *r.add(i) = F::apply(*a.add(i), *b.add(i));
                }
            }
        });
        Ok(())
    })
}

/// Submit the strided evaluator for `nelems` logical elements
///
/// The addresses are allocation bases; all offsets live in the indexer.
pub(crate) fn submit_binary_strided<F: BinaryFunctor>(
    queue: &Queue,
    nelems: usize,
    arg1_addr: u64,
    arg2_addr: u64,
    res_addr: u64,
    indexer: ThreeOffsetsStridedIndexer,
    depends: &[Event],
) -> Event {
    queue.submit(depends, move |scope| {
        scope.parallel_for(nelems, |gid| unsafe {
            let a = arg1_addr as *const F::Arg1;
            let b = arg2_addr as *const F::Arg2;
            let r = res_addr as *mut F::Res;
            let (off1, off2, off3) = indexer.offsets(gid);
            *r.offset(off3) = F::apply(*a.offset(off1), *b.offset(off2));
        });
        Ok(())
    })
}

/// Submit the broadcast evaluator over `n_elems = n0 * n1` flat elements
///
/// `padded_vec_addr` points at a row of at least `n1 + sub_group_size`
/// elements satisfying `padded[i] = row[i % n1]`. Each sub-group-aligned
/// block of flat indices shares one row-aligned base into the padded copy,
/// and the cyclic padding keeps every lane read in bounds whether or not `n1`
/// divides the block width.
pub(crate) fn submit_binary_matrix_row_broadcast<F: BinaryFunctor>(
    queue: &Queue,
    n_elems: usize,
    n1: usize,
    mat_addr: u64,
    padded_vec_addr: u64,
    res_addr: u64,
    depends: &[Event],
) -> Event {
    let sg_size = queue.device().max_sub_group_size();
    queue.submit(depends, move |scope| {
        let n_blocks = (n_elems + sg_size - 1) / sg_size;
        scope.parallel_for(n_blocks, |blk| unsafe {
            let mat = mat_addr as *const F::Arg1;
            let vec = padded_vec_addr as *const F::Arg2;
            let r = res_addr as *mut F::Res;
            let block_start = blk * sg_size;
            let lanes = sg_size.min(n_elems - block_start);
            let base_j = block_start % n1;
            for l in 0..lanes {
                *r.add(block_start + l) = F::apply(*mat.add(block_start + l), *vec.add(base_j + l));
            }
        });
        Ok(())
    })
}
