//! Kernel dispatch tables
//!
//! Each table maps a runtime dtype key to the monomorphized kernel entry
//! point implementing it, or `None` where no specialization exists. Tables
//! are built once on first use and read-only thereafter; callers must check
//! for `None` (the "unsupported" signal) and report upstream rather than
//! invoking through an absent entry.

use crate::dtype::{multiply_result_type, DType, NUM_DTYPES};
use crate::kernels::elementwise::multiply::{
    multiply_contig_impl, multiply_contig_matrix_contig_row_broadcast_impl,
    multiply_contig_row_contig_matrix_broadcast_impl, multiply_strided_impl,
};
use crate::kernels::group::{LogicalAnd, LogicalOr};
use crate::kernels::reduction::boolean::{
    boolean_reduction_contig_impl, boolean_reduction_strided_impl,
};
use crate::runtime::{Event, Queue};
use crate::tensor::{ArrayView, ArrayViewMut, Layout};
use crate::error::Result;
use std::sync::OnceLock;

/// Entry point of a contiguous binary kernel:
/// `(queue, nelems, arg1, arg2, res, depends) -> event`
pub type BinaryContigFn =
    fn(&Queue, usize, &ArrayView, &ArrayView, &ArrayViewMut, &[Event]) -> Result<Event>;

/// Entry point of a strided binary kernel:
/// `(queue, nelems, arg1, arg2, res, depends) -> event`
pub type BinaryStridedFn =
    fn(&Queue, usize, &ArrayView, &ArrayView, &ArrayViewMut, &[Event]) -> Result<Event>;

/// Entry point of a matrix x row broadcast kernel:
/// `(queue, host_tasks, n0, n1, first, second, res, depends) -> event`
pub type BinaryBroadcastFn = fn(
    &Queue,
    &mut Vec<Event>,
    usize,
    usize,
    &ArrayView,
    &ArrayView,
    &ArrayViewMut,
    &[Event],
) -> Result<Event>;

/// Entry point of a contiguous boolean reduction kernel:
/// `(queue, iter_nelems, reduction_nelems, arg, res, depends) -> event`
pub type BooleanReductionContigFn =
    fn(&Queue, usize, usize, &ArrayView, &ArrayViewMut, &[Event]) -> Result<Event>;

/// Entry point of a strided boolean reduction kernel:
/// `(queue, iter_nelems, reduction_nelems, arg, res, reduction_axes, depends) -> event`
pub type BooleanReductionStridedFn =
    fn(&Queue, usize, usize, &ArrayView, &ArrayViewMut, &Layout, &[Event]) -> Result<Event>;

/// Dispatch helper macro binding a `DType` value to its concrete element type
///
/// Evaluates `$body` with `$T` aliased to the matching Rust type, or
/// `$unsupported` for dtypes whose backing feature is disabled. Used by the
/// table factories below; each compiled kernel entry stays monomorphic.
#[macro_export]
macro_rules! dispatch_dtype {
    ($dtype:expr, $T:ident => $body:expr, $unsupported:expr) => {
        match $dtype {
            $crate::dtype::DType::Bool => {
                type $T = $crate::dtype::Bool;
                $body
            }
            $crate::dtype::DType::I8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::U8 => {
                type $T = u8;
                $body
            }
            $crate::dtype::DType::I16 => {
                type $T = i16;
                $body
            }
            $crate::dtype::DType::U16 => {
                type $T = u16;
                $body
            }
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::U32 => {
                type $T = u32;
                $body
            }
            $crate::dtype::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::U64 => {
                type $T = u64;
                $body
            }
            $crate::dtype::DType::F16 => {
                $crate::dispatch_f16_dtype!($T, $body, $unsupported, ::half::f16)
            }
            $crate::dtype::DType::BF16 => {
                $crate::dispatch_f16_dtype!($T, $body, $unsupported, ::half::bf16)
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::Complex64 => {
                type $T = $crate::dtype::Complex64;
                $body
            }
            $crate::dtype::DType::Complex128 => {
                type $T = $crate::dtype::Complex128;
                $body
            }
        }
    };
}

/// Internal helper to dispatch types requiring the `f16` feature.
/// Parameterized by type to avoid duplicating the macro for F16 vs BF16.
#[macro_export]
#[doc(hidden)]
macro_rules! dispatch_f16_dtype {
    ($T:ident, $body:expr, $unsupported:expr, $type:ty) => {{
        #[cfg(feature = "f16")]
        {
            type $T = $type;
            $body
        }
        #[cfg(not(feature = "f16"))]
        {
            $unsupported
        }
    }};
}

/// Table of binary kernel entries keyed by an input dtype pair
pub struct BinaryTable<F: Copy + 'static> {
    entries: [[Option<F>; NUM_DTYPES]; NUM_DTYPES],
}

impl<F: Copy + 'static> BinaryTable<F> {
    fn build(factory: impl Fn(DType, DType) -> Option<F>) -> Self {
        let mut entries = [[None; NUM_DTYPES]; NUM_DTYPES];
        for lhs in DType::ALL {
            for rhs in DType::ALL {
                entries[lhs.index()][rhs.index()] = factory(lhs, rhs);
            }
        }
        Self { entries }
    }

    /// Resolve the entry for an input dtype pair, `None` if unsupported
    #[inline]
    pub fn lookup(&self, lhs: DType, rhs: DType) -> Option<F> {
        self.entries[lhs.index()][rhs.index()]
    }
}

/// Table of kernel entries keyed by a single input dtype
pub struct UnaryTable<F: Copy + 'static> {
    entries: [Option<F>; NUM_DTYPES],
}

impl<F: Copy + 'static> UnaryTable<F> {
    fn build(factory: impl Fn(DType) -> Option<F>) -> Self {
        let mut entries = [None; NUM_DTYPES];
        for dtype in DType::ALL {
            entries[dtype.index()] = factory(dtype);
        }
        Self { entries }
    }

    /// Resolve the entry for an input dtype, `None` if unsupported
    #[inline]
    pub fn lookup(&self, dtype: DType) -> Option<F> {
        self.entries[dtype.index()]
    }
}

fn multiply_contig_entry(lhs: DType, rhs: DType) -> Option<BinaryContigFn> {
    multiply_result_type(lhs, rhs)?;
    dispatch_dtype!(lhs, T => Some(multiply_contig_impl::<T> as BinaryContigFn), None)
}

fn multiply_strided_entry(lhs: DType, rhs: DType) -> Option<BinaryStridedFn> {
    multiply_result_type(lhs, rhs)?;
    dispatch_dtype!(lhs, T => Some(multiply_strided_impl::<T> as BinaryStridedFn), None)
}

fn multiply_matrix_row_broadcast_entry(lhs: DType, rhs: DType) -> Option<BinaryBroadcastFn> {
    let res = multiply_result_type(lhs, rhs)?;
    // the padded fast path exists to exploit wide contiguous loads, which
    // complex types cannot use
    if lhs.is_complex() || rhs.is_complex() || res.is_complex() {
        return None;
    }
    dispatch_dtype!(
        lhs,
        T => Some(multiply_contig_matrix_contig_row_broadcast_impl::<T> as BinaryBroadcastFn),
        None
    )
}

fn multiply_row_matrix_broadcast_entry(lhs: DType, rhs: DType) -> Option<BinaryBroadcastFn> {
    let res = multiply_result_type(lhs, rhs)?;
    if lhs.is_complex() || rhs.is_complex() || res.is_complex() {
        return None;
    }
    dispatch_dtype!(
        lhs,
        T => Some(multiply_contig_row_contig_matrix_broadcast_impl::<T> as BinaryBroadcastFn),
        None
    )
}

/// All compiled multiply kernel entries
pub struct MultiplyKernels {
    /// Contiguous evaluator entries
    pub contig: BinaryTable<BinaryContigFn>,
    /// Strided evaluator entries
    pub strided: BinaryTable<BinaryStridedFn>,
    /// Contiguous matrix x contiguous row broadcast entries
    pub matrix_row_broadcast: BinaryTable<BinaryBroadcastFn>,
    /// Contiguous row x contiguous matrix broadcast entries
    pub row_matrix_broadcast: BinaryTable<BinaryBroadcastFn>,
}

/// Multiply dispatch tables, built on first use
pub fn multiply_kernels() -> &'static MultiplyKernels {
    static TABLES: OnceLock<MultiplyKernels> = OnceLock::new();
    TABLES.get_or_init(|| MultiplyKernels {
        contig: BinaryTable::build(multiply_contig_entry),
        strided: BinaryTable::build(multiply_strided_entry),
        matrix_row_broadcast: BinaryTable::build(multiply_matrix_row_broadcast_entry),
        row_matrix_broadcast: BinaryTable::build(multiply_row_matrix_broadcast_entry),
    })
}

fn all_contig_entry(dtype: DType) -> Option<BooleanReductionContigFn> {
    dispatch_dtype!(
        dtype,
        T => Some(boolean_reduction_contig_impl::<T, LogicalAnd> as BooleanReductionContigFn),
        None
    )
}

fn all_strided_entry(dtype: DType) -> Option<BooleanReductionStridedFn> {
    dispatch_dtype!(
        dtype,
        T => Some(boolean_reduction_strided_impl::<T, LogicalAnd> as BooleanReductionStridedFn),
        None
    )
}

fn any_contig_entry(dtype: DType) -> Option<BooleanReductionContigFn> {
    dispatch_dtype!(
        dtype,
        T => Some(boolean_reduction_contig_impl::<T, LogicalOr> as BooleanReductionContigFn),
        None
    )
}

fn any_strided_entry(dtype: DType) -> Option<BooleanReductionStridedFn> {
    dispatch_dtype!(
        dtype,
        T => Some(boolean_reduction_strided_impl::<T, LogicalOr> as BooleanReductionStridedFn),
        None
    )
}

/// All compiled boolean reduction kernel entries
pub struct BooleanReductionKernels {
    /// `all` over contiguous reduction rows
    pub all_contig: UnaryTable<BooleanReductionContigFn>,
    /// `all` with strided iteration and reduction axes
    pub all_strided: UnaryTable<BooleanReductionStridedFn>,
    /// `any` over contiguous reduction rows
    pub any_contig: UnaryTable<BooleanReductionContigFn>,
    /// `any` with strided iteration and reduction axes
    pub any_strided: UnaryTable<BooleanReductionStridedFn>,
}

/// Boolean reduction dispatch tables, built on first use
pub fn boolean_reduction_kernels() -> &'static BooleanReductionKernels {
    static TABLES: OnceLock<BooleanReductionKernels> = OnceLock::new();
    TABLES.get_or_init(|| BooleanReductionKernels {
        all_contig: UnaryTable::build(all_contig_entry),
        all_strided: UnaryTable::build(all_strided_entry),
        any_contig: UnaryTable::build(any_contig_entry),
        any_strided: UnaryTable::build(any_strided_entry),
    })
}
