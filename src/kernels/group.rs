//! Boolean reduction operators and the group-wide collective fold seam
//!
//! [`GroupFold`] is the portable interface a reduction kernel uses to combine
//! work within one group: a joint fold over a contiguous span, and a combine
//! of per-lane partials. [`NativeGroupFold`] maps onto short-circuiting
//! collective primitives; [`TreeGroupFold`] is the manual tree fallback for
//! targets without them. Kernels depend only on the interface.

use crate::dtype::Element;
use smallvec::SmallVec;

/// A boolean reduction operator: associative, commutative, with an identity.
///
/// Only operators with both properties are admissible; the cross-group merge
/// relies on them for order independence.
pub trait BooleanOp: Send + Sync + 'static {
    /// Neutral element of the fold (also the value of an empty reduction)
    const IDENTITY: i32;

    /// Combine two partial values
    fn combine(a: i32, b: i32) -> i32;
}

/// Logical AND; implements `all`. Identity is true.
pub struct LogicalAnd;

impl BooleanOp for LogicalAnd {
    const IDENTITY: i32 = 1;

    #[inline]
    fn combine(a: i32, b: i32) -> i32 {
        ((a != 0) && (b != 0)) as i32
    }
}

/// Logical OR; implements `any`. Identity is false.
pub struct LogicalOr;

impl BooleanOp for LogicalOr {
    const IDENTITY: i32 = 0;

    #[inline]
    fn combine(a: i32, b: i32) -> i32 {
        ((a != 0) || (b != 0)) as i32
    }
}

/// Group-wide collective fold over one work-group's share of a reduction
pub trait GroupFold<Op: BooleanOp>: Send + Sync + 'static {
    /// Fold a contiguous span of elements through the boolean predicate,
    /// using every lane of the group jointly
    fn fold_contig<T: Element>(span: &[T]) -> i32;

    /// Combine per-lane partial values into the group's single result
    fn fold_lanes(partials: &[i32]) -> i32;
}

/// Backend using the target's native collective primitives
pub struct NativeGroupFold;

impl GroupFold<LogicalAnd> for NativeGroupFold {
    #[inline]
    fn fold_contig<T: Element>(span: &[T]) -> i32 {
        span.iter().all(|v| v.is_nonzero()) as i32
    }

    #[inline]
    fn fold_lanes(partials: &[i32]) -> i32 {
        partials.iter().all(|&p| p != 0) as i32
    }
}

impl GroupFold<LogicalOr> for NativeGroupFold {
    #[inline]
    fn fold_contig<T: Element>(span: &[T]) -> i32 {
        span.iter().any(|v| v.is_nonzero()) as i32
    }

    #[inline]
    fn fold_lanes(partials: &[i32]) -> i32 {
        partials.iter().any(|&p| p != 0) as i32
    }
}

/// Manual pairwise tree reduction, used when no native collective exists
pub struct TreeGroupFold;

/// Lane count the tree fallback distributes a contiguous span across
const TREE_LANES: usize = 8;

impl<Op: BooleanOp> GroupFold<Op> for TreeGroupFold {
    fn fold_contig<T: Element>(span: &[T]) -> i32 {
        let mut partials = [Op::IDENTITY; TREE_LANES];
        for (i, v) in span.iter().enumerate() {
            let lane = i % TREE_LANES;
            partials[lane] = Op::combine(partials[lane], v.is_nonzero() as i32);
        }
        <Self as GroupFold<Op>>::fold_lanes(&partials)
    }

    fn fold_lanes(partials: &[i32]) -> i32 {
        let mut buf: SmallVec<[i32; 32]> = SmallVec::from_slice(partials);
        while buf.len() > 1 {
            let n = buf.len();
            let half = n / 2;
            for i in 0..half {
                buf[i] = Op::combine(buf[i], buf[n - 1 - i]);
            }
            buf.truncate(n - half);
        }
        buf.first().copied().unwrap_or(Op::IDENTITY)
    }
}
