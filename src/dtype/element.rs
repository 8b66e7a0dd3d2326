//! Element trait for mapping Rust types to DType

use super::{Complex64, Complex128, DType};
use bytemuck::{Pod, Zeroable};

/// Trait for types that can be elements of a kernel's input or output stream
///
/// This trait connects Rust's type system to ndkern's runtime dtype system.
/// Kernel bodies are monomorphized over `Element`; the dispatch layer picks
/// the instantiation from a buffer's `DType` tag.
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - basic kernel requirements
/// - `Pod + Zeroable` - safe byte-level reinterpretation (bytemuck)
/// - `PartialEq` - zero comparison for the boolean predicate
pub trait Element: Copy + Send + Sync + Pod + Zeroable + PartialEq + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Whether the contiguous evaluator may process this type in wide chunks.
    /// Complex types opt out and always take the scalar path.
    const SUPPORTS_WIDE_LOADS: bool = true;

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// Multiplication as used by the elementwise kernels.
    ///
    /// Fixed-width integers wrap on overflow, matching the behavior of the
    /// native multiplication operator on the measured platforms.
    fn mul(self, rhs: Self) -> Self;

    /// Boolean conversion: true iff the value is non-zero.
    ///
    /// NaN compares unequal to zero and therefore converts to true; reduction
    /// kernels rely on this when folding float streams.
    #[inline]
    fn is_nonzero(self) -> bool {
        self != Self::zero()
    }
}

/// Boolean element stored as one byte; multiplication is logical AND
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Bool(pub u8);

impl Bool {
    /// True value
    pub const TRUE: Self = Self(1);
    /// False value
    pub const FALSE: Self = Self(0);

    /// Construct from a Rust bool
    #[inline]
    pub fn new(v: bool) -> Self {
        Self(v as u8)
    }

    /// Convert to a Rust bool (any non-zero byte is true)
    #[inline]
    pub fn as_bool(self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for Bool {
    #[inline]
    fn from(v: bool) -> Self {
        Self::new(v)
    }
}

impl Element for Bool {
    const DTYPE: DType = DType::Bool;

    #[inline]
    fn zero() -> Self {
        Self::FALSE
    }

    #[inline]
    fn one() -> Self {
        Self::TRUE
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.as_bool() && rhs.as_bool())
    }

    #[inline]
    fn is_nonzero(self) -> bool {
        self.as_bool()
    }
}

macro_rules! impl_element_int {
    ($($ty:ty => $dtype:expr),* $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = $dtype;

                #[inline]
                fn zero() -> Self {
                    0
                }

                #[inline]
                fn one() -> Self {
                    1
                }

                #[inline]
                fn mul(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }
            }
        )*
    };
}

impl_element_int!(
    i8 => DType::I8,
    u8 => DType::U8,
    i16 => DType::I16,
    u16 => DType::U16,
    i32 => DType::I32,
    u32 => DType::U32,
    i64 => DType::I64,
    u64 => DType::U64,
);

macro_rules! impl_element_float {
    ($($ty:ty => $dtype:expr),* $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = $dtype;

                #[inline]
                fn zero() -> Self {
                    0.0
                }

                #[inline]
                fn one() -> Self {
                    1.0
                }

                #[inline]
                fn mul(self, rhs: Self) -> Self {
                    self * rhs
                }
            }
        )*
    };
}

impl_element_float!(
    f32 => DType::F32,
    f64 => DType::F64,
);

#[cfg(feature = "f16")]
impl Element for half::f16 {
    const DTYPE: DType = DType::F16;

    #[inline]
    fn zero() -> Self {
        half::f16::ZERO
    }

    #[inline]
    fn one() -> Self {
        half::f16::ONE
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self * rhs
    }
}

#[cfg(feature = "f16")]
impl Element for half::bf16 {
    const DTYPE: DType = DType::BF16;

    #[inline]
    fn zero() -> Self {
        half::bf16::ZERO
    }

    #[inline]
    fn one() -> Self {
        half::bf16::ONE
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self * rhs
    }
}

impl Element for Complex64 {
    const DTYPE: DType = DType::Complex64;
    const SUPPORTS_WIDE_LOADS: bool = false;

    #[inline]
    fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    fn one() -> Self {
        Self::ONE
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self * rhs
    }
}

impl Element for Complex128 {
    const DTYPE: DType = DType::Complex128;
    const SUPPORTS_WIDE_LOADS: bool = false;

    #[inline]
    fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    fn one() -> Self {
        Self::ONE
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self * rhs
    }
}
