//! Output-type resolution tables for kernel dispatch
//!
//! These tables answer "what does this operation produce for this input
//! pair", or `None` when no kernel specialization exists. Mixed-dtype pairs
//! are deliberately absent: promotion to a common dtype (NumPy-style casting)
//! is the caller's policy, applied before buffers reach this engine.

use super::DType;

/// Result dtype of elementwise multiply for an input dtype pair
///
/// The table is checked in priority order and the first match wins. Multiply
/// is same-type preserving for every supported type, including bool x bool ->
/// bool and both complex widths; any unmatched pair is unsupported here.
pub fn multiply_result_type(lhs: DType, rhs: DType) -> Option<DType> {
    use DType::*;

    const TABLE: &[(DType, DType, DType)] = &[
        (Bool, Bool, Bool),
        (U8, U8, U8),
        (I8, I8, I8),
        (U16, U16, U16),
        (I16, I16, I16),
        (U32, U32, U32),
        (I32, I32, I32),
        (U64, U64, U64),
        (I64, I64, I64),
        (F16, F16, F16),
        (BF16, BF16, BF16),
        (F32, F32, F32),
        (F64, F64, F64),
        (Complex64, Complex64, Complex64),
        (Complex128, Complex128, Complex128),
    ];

    TABLE
        .iter()
        .find(|(a, b, _)| *a == lhs && *b == rhs)
        .map(|(_, _, res)| *res)
}

/// Result dtype of the boolean reductions (any/all)
///
/// Fixed regardless of the input dtype: reduction slots are 32-bit integers
/// holding 0 or 1, sized for the atomic merge path.
#[inline]
pub const fn boolean_reduction_result_type() -> DType {
    DType::I32
}
