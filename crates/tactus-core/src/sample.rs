//! Sample type abstraction for generic f32/f64 processing.
//!
//! The entire render core is generic over [`Sample`] so the same engine and
//! kernels serve single- and double-precision hosts without duplication.
//! The trait is sealed: `f32` and `f64` are the only sample types a host
//! ever hands us, and sealing lets the rest of the core rely on that.

use std::ops::{Add, AddAssign, Mul, MulAssign, Sub};

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Trait for audio sample types (`f32` or `f64`).
///
/// Provides the constants and conversions kernels need for generic DSP
/// code. All operations are trivially cheap; none allocate.
pub trait Sample:
    sealed::Sealed
    + Copy
    + Default
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + AddAssign
    + MulAssign
    + std::fmt::Debug
    + std::fmt::Display
{
    /// Additive identity (digital silence).
    const ZERO: Self;
    /// Multiplicative identity (unity gain).
    const ONE: Self;

    /// Convert from `f32`.
    fn from_f32(value: f32) -> Self;

    /// Convert from `f64`.
    fn from_f64(value: f64) -> Self;

    /// Convert to `f64` (lossless for both sample types).
    fn to_f64(self) -> f64;
}

impl Sample for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Sample for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn from_f32(value: f32) -> Self {
        f64::from(value)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}
