//! Pixel sample representations accepted at the engine boundary.
//!
//! The engine itself works on a single floating-point type (`f32` or `f64`,
//! see [`WorkingFloat`]). Every supported sample type converts into it at
//! ingest and back out at egress:
//!
//! - unsigned integers are normalised to `[0, 1]` by their full range and
//!   rounded/clamped on the way back;
//! - complex samples ingest as their magnitude and egress as a purely real
//!   value;
//! - floating-point samples pass through unchanged.
//!
//! `Sample::Working` names the intermediate precision used when an image of
//! that type is reconstructed: single precision for 8/16/32-bit integers and
//! `Complex32`, double precision for `f64` and `Complex64`.
use num_complex::{Complex32, Complex64};
use num_traits::Float;
use std::fmt::Debug;
use std::iter::Sum;

/// Floating-point type used for layers and intermediate buffers.
pub trait WorkingFloat: Float + Default + Debug + Sum + Send + Sync + 'static {
    /// Short type name used in log messages and reports.
    const NAME: &'static str;
    /// Significand bits, used to order the working precisions.
    const MANTISSA_DIGITS: u32;

    fn widen(self) -> f64;
    fn narrow(v: f64) -> Self;

    /// Converts between working precisions.
    #[inline]
    fn cast<G: WorkingFloat>(self) -> G {
        G::narrow(self.widen())
    }
}

impl WorkingFloat for f32 {
    const NAME: &'static str = "f32";
    const MANTISSA_DIGITS: u32 = f32::MANTISSA_DIGITS;

    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }
    #[inline]
    fn narrow(v: f64) -> Self {
        v as f32
    }
}

impl WorkingFloat for f64 {
    const NAME: &'static str = "f64";
    const MANTISSA_DIGITS: u32 = f64::MANTISSA_DIGITS;

    #[inline]
    fn widen(self) -> f64 {
        self
    }
    #[inline]
    fn narrow(v: f64) -> Self {
        v
    }
}

/// A pixel sample type that can be decomposed and reconstructed.
pub trait Sample: Copy + Default + Debug + Send + Sync + 'static {
    /// Intermediate precision used for this sample type.
    type Working: WorkingFloat;

    /// Short type name used in log messages and reports.
    const NAME: &'static str;

    fn to_working(self) -> Self::Working;
    fn from_working(v: Self::Working) -> Self;
}

macro_rules! unsigned_sample {
    ($t:ty, $name:expr) => {
        impl Sample for $t {
            type Working = f32;
            const NAME: &'static str = $name;

            #[inline]
            fn to_working(self) -> f32 {
                (self as f64 / <$t>::MAX as f64) as f32
            }

            #[inline]
            fn from_working(v: f32) -> Self {
                let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) as f64 };
                (v * <$t>::MAX as f64).round() as $t
            }
        }
    };
}

unsigned_sample!(u8, "u8");
unsigned_sample!(u16, "u16");
unsigned_sample!(u32, "u32");

impl Sample for f32 {
    type Working = f32;
    const NAME: &'static str = "f32";

    #[inline]
    fn to_working(self) -> f32 {
        self
    }
    #[inline]
    fn from_working(v: f32) -> Self {
        v
    }
}

impl Sample for f64 {
    type Working = f64;
    const NAME: &'static str = "f64";

    #[inline]
    fn to_working(self) -> f64 {
        self
    }
    #[inline]
    fn from_working(v: f64) -> Self {
        v
    }
}

impl Sample for Complex32 {
    type Working = f32;
    const NAME: &'static str = "complex32";

    #[inline]
    fn to_working(self) -> f32 {
        self.norm()
    }
    #[inline]
    fn from_working(v: f32) -> Self {
        Complex32::new(v, 0.0)
    }
}

impl Sample for Complex64 {
    type Working = f64;
    const NAME: &'static str = "complex64";

    #[inline]
    fn to_working(self) -> f64 {
        self.norm()
    }
    #[inline]
    fn from_working(v: f64) -> Self {
        Complex64::new(v, 0.0)
    }
}
