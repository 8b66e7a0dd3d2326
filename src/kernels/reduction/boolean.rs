//! Boolean reduction kernels (any / all)
//!
//! For every iteration index, the reduction operator is folded over every
//! element the reduction-axis offsets visit, after converting each element
//! through the boolean predicate (non-zero is true, and NaN is true because
//! it compares unequal to zero).
//!
//! Two execution paths, selected per launch against the work-group width
//! `wg = 4 * max_sub_group_size`:
//!
//! - axis shorter than `wg`: one work item per iteration index folds the
//!   whole axis alone, no synchronization; an empty axis leaves the
//!   accumulator at the identity (`all` of nothing is true, `any` is false)
//! - otherwise: an init task pre-fills every output slot with the identity,
//!   then a grid of `iter_nelems x reduction_groups` work groups runs; each
//!   lane folds a strided chunk, the group combines lane partials through
//!   [`GroupFold`], and the group leader merges into the output slot with the
//!   relaxed compare-and-swap loop. The output slot is the only memory
//!   location shared between groups.

use crate::dtype::Element;
use crate::kernels::atomic::atomic_combine;
use crate::kernels::group::{BooleanOp, GroupFold, NativeGroupFold, TreeGroupFold};
use crate::kernels::indexer::{
    Indexer, NoOpIndexer, PairIndexer, Strided1DIndexer, StridedIndexer,
    TwoOffsetsCombinedIndexer, TwoOffsetsStridedIndexer,
};
use crate::runtime::{Device, Event, Queue};
use crate::tensor::{ArrayView, ArrayViewMut, Layout};
use crate::error::Result;
use smallvec::SmallVec;
use std::sync::atomic::AtomicI32;

/// Chunk length each work item folds before the group combine, when the axis
/// is long enough to amortize group overhead
const PREFERRED_REDUCTIONS_PER_WI: usize = 4;

/// Work-group width heuristic balancing occupancy and per-group overhead
#[inline]
fn work_group_size(device: &Device) -> usize {
    4 * device.max_sub_group_size()
}

#[inline]
fn reductions_per_wi(reduction_nelems: usize, wg: usize) -> usize {
    if reduction_nelems < PREFERRED_REDUCTIONS_PER_WI * wg {
        (reduction_nelems + wg - 1) / wg
    } else {
        PREFERRED_REDUCTIONS_PER_WI
    }
}

/// One work item per iteration index folds the entire axis alone
fn submit_sequential<T, Op, P, R>(
    queue: &Queue,
    iter_nelems: usize,
    reduction_nelems: usize,
    arg_addr: u64,
    res_addr: u64,
    iter_indexer: P,
    reduction_indexer: R,
    depends: &[Event],
) -> Event
where
    T: Element,
    Op: BooleanOp,
    P: PairIndexer,
    R: Indexer,
{
    queue.submit(depends, move |scope| {
        scope.parallel_for(iter_nelems, |gid| unsafe {
            let arg = arg_addr as *const T;
            let res = res_addr as *mut i32;
            let (inp_iter_offset, out_iter_offset) = iter_indexer.offsets(gid);
            let mut red_val = Op::IDENTITY;
            for m in 0..reduction_nelems {
                let inp_offset = inp_iter_offset + reduction_indexer.offset(m);
                // convert to boolean first so NaN folds as true
                let val = (*arg.offset(inp_offset)).is_nonzero() as i32;
                red_val = Op::combine(red_val, val);
            }
            *res.offset(out_iter_offset) = red_val;
        });
        Ok(())
    })
}

/// Pre-fill every output slot with the operator identity
fn submit_identity_init<Op, I>(
    queue: &Queue,
    iter_nelems: usize,
    res_addr: u64,
    res_indexer: I,
    depends: &[Event],
) -> Event
where
    Op: BooleanOp,
    I: Indexer,
{
    queue.submit(depends, move |scope| {
        scope.parallel_for(iter_nelems, |gid| unsafe {
            let res = res_addr as *mut i32;
            *res.offset(res_indexer.offset(gid)) = Op::IDENTITY;
        });
        Ok(())
    })
}

/// Two-level parallel fold over contiguous reduction rows
///
/// `arg_addr` points at the first reduction row; row `i` occupies the span
/// `[i * reduction_nelems, (i + 1) * reduction_nelems)`.
fn submit_parallel_contig<T, Op, G>(
    queue: &Queue,
    iter_nelems: usize,
    reduction_nelems: usize,
    wg: usize,
    arg_addr: u64,
    res_addr: u64,
    depends: &[Event],
) -> Event
where
    T: Element,
    Op: BooleanOp,
    G: GroupFold<Op>,
{
    let per_wi = reductions_per_wi(reduction_nelems, wg);
    let reduction_groups = (reduction_nelems + per_wi * wg - 1) / (per_wi * wg);
    queue.submit(depends, move |scope| {
        scope.parallel_for(iter_nelems * reduction_groups, |grid_id| unsafe {
            let reduction_id = grid_id / reduction_groups;
            let reduction_batch_id = grid_id % reduction_groups;
            let arg = arg_addr as *const T;
            let res = res_addr as *mut i32;

            let base = reduction_id * reduction_nelems;
            let start = base + reduction_batch_id * wg * per_wi;
            let end = (start + wg * per_wi).min(base + reduction_nelems);

            // reduction to the work-group level happens inside the group fold
            let span = std::slice::from_raw_parts(arg.add(start), end - start);
            let red_val_over_wg = G::fold_contig(span);

            let slot = &*(res.add(reduction_id) as *const AtomicI32);
            atomic_combine(slot, red_val_over_wg, Op::combine);
        });
        Ok(())
    })
}

/// Two-level parallel fold with strided iteration and reduction indexers
fn submit_parallel_strided<T, Op, G>(
    queue: &Queue,
    iter_nelems: usize,
    reduction_nelems: usize,
    wg: usize,
    arg_addr: u64,
    res_addr: u64,
    iter_indexer: TwoOffsetsStridedIndexer,
    reduction_indexer: StridedIndexer,
    depends: &[Event],
) -> Event
where
    T: Element,
    Op: BooleanOp,
    G: GroupFold<Op>,
{
    let per_wi = reductions_per_wi(reduction_nelems, wg);
    let reduction_groups = (reduction_nelems + per_wi * wg - 1) / (per_wi * wg);
    queue.submit(depends, move |scope| {
        scope.parallel_for(iter_nelems * reduction_groups, |grid_id| unsafe {
            let reduction_id = grid_id / reduction_groups;
            let reduction_batch_id = grid_id % reduction_groups;
            let arg = arg_addr as *const T;
            let res = res_addr as *mut i32;

            let (inp_iter_offset, out_iter_offset) = iter_indexer.offsets(reduction_id);

            let mut partials: SmallVec<[i32; 32]> = SmallVec::new();
            for lane in 0..wg {
                let gid0 = lane + reduction_batch_id * wg * per_wi;
                let mut local_red_val = Op::IDENTITY;
                for m in 0..per_wi {
                    let arg_reduce_gid = gid0 + m * wg;
                    if arg_reduce_gid < reduction_nelems {
                        let inp_offset =
                            inp_iter_offset + reduction_indexer.offset(arg_reduce_gid);
                        // convert to boolean first so NaN folds as true
                        let val = (*arg.offset(inp_offset)).is_nonzero() as i32;
                        local_red_val = Op::combine(local_red_val, val);
                    }
                }
                partials.push(local_red_val);
            }
            let red_val_over_wg = G::fold_lanes(&partials);

            let slot = &*(res.offset(out_iter_offset) as *const AtomicI32);
            atomic_combine(slot, red_val_over_wg, Op::combine);
        });
        Ok(())
    })
}

/// Boolean reduction over contiguous reduction rows
///
/// The input view's offset locates the first row (iteration and reduction
/// offsets combined); row `i` of length `reduction_nelems` feeds output slot
/// `i` of the contiguous output stream.
pub fn boolean_reduction_contig_impl<T, Op>(
    queue: &Queue,
    iter_nelems: usize,
    reduction_nelems: usize,
    arg: &ArrayView,
    res: &ArrayViewMut,
    depends: &[Event],
) -> Result<Event>
where
    T: Element,
    Op: BooleanOp,
    NativeGroupFold: GroupFold<Op>,
    TreeGroupFold: GroupFold<Op>,
{
    let arg_addr = arg.typed_addr::<T>();
    let res_addr = res.typed_addr::<i32>();
    let wg = work_group_size(queue.device());

    if reduction_nelems < wg {
        let iter_indexer = TwoOffsetsCombinedIndexer::new(
            Strided1DIndexer::new(0, reduction_nelems as isize),
            NoOpIndexer,
        );
        Ok(submit_sequential::<T, Op, _, _>(
            queue,
            iter_nelems,
            reduction_nelems,
            arg_addr,
            res_addr,
            iter_indexer,
            NoOpIndexer,
            depends,
        ))
    } else {
        let init_ev =
            submit_identity_init::<Op, _>(queue, iter_nelems, res_addr, NoOpIndexer, depends);
        let ev = if queue.device().group_collectives() {
            submit_parallel_contig::<T, Op, NativeGroupFold>(
                queue,
                iter_nelems,
                reduction_nelems,
                wg,
                arg_addr,
                res_addr,
                &[init_ev],
            )
        } else {
            submit_parallel_contig::<T, Op, TreeGroupFold>(
                queue,
                iter_nelems,
                reduction_nelems,
                wg,
                arg_addr,
                res_addr,
                &[init_ev],
            )
        };
        Ok(ev)
    }
}

/// Boolean reduction with strided iteration and reduction-axis addressing
///
/// The input view's layout describes the iteration axes (its shape must match
/// the output's iteration space); `reduction_axes` describes the folded axes
/// of the input, including the reduction offset.
pub fn boolean_reduction_strided_impl<T, Op>(
    queue: &Queue,
    iter_nelems: usize,
    reduction_nelems: usize,
    arg: &ArrayView,
    res: &ArrayViewMut,
    reduction_axes: &Layout,
    depends: &[Event],
) -> Result<Event>
where
    T: Element,
    Op: BooleanOp,
    NativeGroupFold: GroupFold<Op>,
    TreeGroupFold: GroupFold<Op>,
{
    let arg_addr = arg.addr();
    let res_addr = res.addr();
    let wg = work_group_size(queue.device());

    let iter_indexer = TwoOffsetsStridedIndexer::from_layouts(arg.layout(), res.layout());
    let reduction_indexer = StridedIndexer::from_layout(reduction_axes);

    if reduction_nelems < wg {
        Ok(submit_sequential::<T, Op, _, _>(
            queue,
            iter_nelems,
            reduction_nelems,
            arg_addr,
            res_addr,
            iter_indexer,
            reduction_indexer,
            depends,
        ))
    } else {
        let res_init_indexer = StridedIndexer::from_layout(res.layout());
        let init_ev =
            submit_identity_init::<Op, _>(queue, iter_nelems, res_addr, res_init_indexer, depends);
        let ev = if queue.device().group_collectives() {
            submit_parallel_strided::<T, Op, NativeGroupFold>(
                queue,
                iter_nelems,
                reduction_nelems,
                wg,
                arg_addr,
                res_addr,
                iter_indexer,
                reduction_indexer,
                &[init_ev],
            )
        } else {
            submit_parallel_strided::<T, Op, TreeGroupFold>(
                queue,
                iter_nelems,
                reduction_nelems,
                wg,
                arg_addr,
                res_addr,
                iter_indexer,
                reduction_indexer,
                &[init_ev],
            )
        };
        Ok(ev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reductions_per_wi_short_axis() {
        // Short axes shrink the chunk so one wave of groups covers the axis.
        assert_eq!(reductions_per_wi(8, 8), 1);
        assert_eq!(reductions_per_wi(17, 8), 3);
        assert_eq!(reductions_per_wi(31, 8), 4);
    }

    #[test]
    fn test_reductions_per_wi_long_axis() {
        assert_eq!(reductions_per_wi(32, 8), 4);
        assert_eq!(reductions_per_wi(10_000, 8), 4);
    }

    #[test]
    fn test_work_group_size_heuristic() {
        let device = Device::with_sub_group_sizes(&[2, 4]);
        assert_eq!(work_group_size(&device), 16);
    }
}
