//! Elementwise multiply kernels
//!
//! Entry points for MUL(x1, x2) in contiguous, strided, and broadcast forms.
//! The dispatch tables in [`crate::dispatch`] select the monomorphized entry
//! for a dtype pair; see [`crate::dtype::multiply_result_type`] for which
//! pairs exist.

use super::common::{
    submit_binary_contig, submit_binary_matrix_row_broadcast, submit_binary_strided, BinaryFunctor,
};
use crate::dtype::Element;
use crate::kernels::indexer::ThreeOffsetsStridedIndexer;
use crate::runtime::{DeviceBuffer, Event, Queue};
use crate::tensor::{ArrayView, ArrayViewMut};
use crate::error::Result;
use std::marker::PhantomData;

/// Scalar multiply functor; wide blocks permitted except for complex types
pub struct MultiplyFunctor<T>(PhantomData<T>);

impl<T: Element> BinaryFunctor for MultiplyFunctor<T> {
    type Arg1 = T;
    type Arg2 = T;
    type Res = T;

    const SUPPORTS_VEC: bool = T::SUPPORTS_WIDE_LOADS;

    #[inline]
    fn apply(a: T, b: T) -> T {
        a.mul(b)
    }
}

/// Multiply two contiguous streams of `nelems` elements
///
/// Each view's layout offset locates its stream within the allocation.
pub fn multiply_contig_impl<T: Element>(
    queue: &Queue,
    nelems: usize,
    arg1: &ArrayView,
    arg2: &ArrayView,
    res: &ArrayViewMut,
    depends: &[Event],
) -> Result<Event> {
    Ok(submit_binary_contig::<MultiplyFunctor<T>>(
        queue,
        nelems,
        arg1.typed_addr::<T>(),
        arg2.typed_addr::<T>(),
        res.typed_addr::<T>(),
        depends,
    ))
}

/// Multiply two strided streams of `nelems` logical elements
///
/// The output view's shape is the shared iteration space; each operand
/// contributes its own strides and offset to the combined indexer.
pub fn multiply_strided_impl<T: Element>(
    queue: &Queue,
    nelems: usize,
    arg1: &ArrayView,
    arg2: &ArrayView,
    res: &ArrayViewMut,
    depends: &[Event],
) -> Result<Event> {
    let indexer =
        ThreeOffsetsStridedIndexer::from_layouts(arg1.layout(), arg2.layout(), res.layout());
    Ok(submit_binary_strided::<MultiplyFunctor<T>>(
        queue,
        nelems,
        arg1.addr(),
        arg2.addr(),
        res.addr(),
        indexer,
        depends,
    ))
}

/// Multiply a C-contiguous `(n0, n1)` matrix by a contiguous length-`n1` row:
/// `res[i, j] = mat[i, j] * row[j]`
///
/// Instead of a general strided indexer, the row is replicated once into a
/// temporary buffer padded by the sub-group width (`padded[i] = row[i % n1]`),
/// so the hot loop reads both operands with plain contiguous loads. The
/// padded buffer is released by a cleanup task that depends only on the
/// compute task; its event is appended to `host_tasks`, which the caller must
/// keep alive until consumed or waited.
///
/// Allocation failure is reported synchronously, before any task is
/// submitted.
pub fn multiply_contig_matrix_contig_row_broadcast_impl<T: Element>(
    queue: &Queue,
    host_tasks: &mut Vec<Event>,
    n0: usize,
    n1: usize,
    mat: &ArrayView,
    row: &ArrayView,
    res: &ArrayViewMut,
    depends: &[Event],
) -> Result<Event> {
    let sg_size = queue.device().max_sub_group_size();
    let n1_padded = n1 + sg_size;
    let padded = DeviceBuffer::alloc(n1_padded, T::DTYPE)?;
    let padded_addr = padded.ptr();

    let row_addr = row.typed_addr::<T>();
    let make_padded_ev = queue.submit(depends, move |scope| {
        scope.parallel_for(n1_padded, |i| unsafe {
            let src = row_addr as *const T;
            let dst = padded_addr as *mut T;
            *dst.add(i) = *src.add(i % n1);
        });
        Ok(())
    });

    let comp_ev = submit_binary_matrix_row_broadcast::<MultiplyFunctor<T>>(
        queue,
        n0 * n1,
        n1,
        mat.typed_addr::<T>(),
        padded_addr,
        res.typed_addr::<T>(),
        &[make_padded_ev],
    );

    let cleanup_ev = queue.submit(&[comp_ev.clone()], move |_scope| {
        drop(padded);
        Ok(())
    });
    host_tasks.push(cleanup_ev);

    Ok(comp_ev)
}

/// Multiply a contiguous length-`n1` row by a C-contiguous `(n0, n1)` matrix:
/// `res[i, j] = row[j] * mat[i, j]`
///
/// Delegates to the matrix x row kernel with the operands swapped; this is
/// valid only because multiply is commutative and must not be imitated for
/// non-commutative operations.
pub fn multiply_contig_row_contig_matrix_broadcast_impl<T: Element>(
    queue: &Queue,
    host_tasks: &mut Vec<Event>,
    n0: usize,
    n1: usize,
    row: &ArrayView,
    mat: &ArrayView,
    res: &ArrayViewMut,
    depends: &[Event],
) -> Result<Event> {
    multiply_contig_matrix_contig_row_broadcast_impl::<T>(
        queue, host_tasks, n0, n1, mat, row, res, depends,
    )
}
