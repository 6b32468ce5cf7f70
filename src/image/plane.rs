//! Owned single-channel working-float plane in row-major layout (stride == width).
//!
//! Planes hold the multiscale layers and every intermediate smoothing buffer.
//! Allocation goes through [`Plane::try_new`] so that out-of-memory surfaces
//! as [`TransformError::AllocationFailed`] instead of aborting the process.
use super::sample::WorkingFloat;
use super::traits::ImageView;
use crate::error::{Result, TransformError};

#[derive(Clone, Debug, PartialEq)]
pub struct Plane<F> {
    /// Plane width in pixels
    pub w: usize,
    /// Plane height in pixels
    pub h: usize,
    /// Number of elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<F>,
}

/// Single precision plane.
pub type ImageF32 = Plane<f32>;
/// Double precision plane.
pub type ImageF64 = Plane<f64>;

pub(crate) fn allocate<T: Clone>(w: usize, h: usize, value: T) -> Result<Vec<T>> {
    let len = w
        .checked_mul(h)
        .ok_or(TransformError::AllocationFailed { width: w, height: h })?;
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| TransformError::AllocationFailed { width: w, height: h })?;
    data.resize(len, value);
    Ok(data)
}

impl<F: WorkingFloat> Plane<F> {
    /// Construct a zero-initialized plane of size `w × h`.
    ///
    /// Panics if the allocation fails; engine code uses [`Plane::try_new`].
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![F::zero(); w * h],
        }
    }

    /// Fallible zero-initialized allocation.
    pub fn try_new(w: usize, h: usize) -> Result<Self> {
        Ok(Self {
            w,
            h,
            stride: w,
            data: allocate(w, h, F::zero())?,
        })
    }

    /// Wrap existing row-major data.
    pub fn from_vec(w: usize, h: usize, data: Vec<F>) -> Result<Self> {
        if data.len() != w * h {
            return Err(TransformError::InvalidImageData {
                expected: w * h,
                actual: data.len(),
            });
        }
        Ok(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    /// Build a plane by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> F) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> F {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: F) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Fallible deep copy.
    pub fn try_clone(&self) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(self.data.len())
            .map_err(|_| TransformError::AllocationFailed {
                width: self.w,
                height: self.h,
            })?;
        data.extend_from_slice(&self.data);
        Ok(Self {
            w: self.w,
            h: self.h,
            stride: self.stride,
            data,
        })
    }

    pub fn fill(&mut self, v: F) {
        self.data.fill(v);
    }

    /// Multiply every sample by `k`.
    pub fn scale(&mut self, k: F) {
        for v in &mut self.data {
            *v = *v * k;
        }
    }

    fn ensure_same_geometry<G>(&self, other: &Plane<G>) -> Result<()> {
        if self.w != other.w || self.h != other.h {
            return Err(TransformError::GeometryMismatch {
                expected: (self.w, self.h),
                actual: (other.w, other.h),
            });
        }
        Ok(())
    }

    /// `self += other`, converting `other` into this plane's precision.
    pub fn add_plane<G: WorkingFloat>(&mut self, other: &Plane<G>) -> Result<()> {
        self.ensure_same_geometry(other)?;
        for (dst, &src) in self.data.iter_mut().zip(&other.data) {
            *dst = *dst + src.cast::<F>();
        }
        Ok(())
    }

    /// New plane holding `self - other`.
    pub fn difference(&self, other: &Plane<F>) -> Result<Self> {
        self.ensure_same_geometry(other)?;
        let mut out = Vec::new();
        out.try_reserve_exact(self.data.len())
            .map_err(|_| TransformError::AllocationFailed {
                width: self.w,
                height: self.h,
            })?;
        out.extend(self.data.iter().zip(&other.data).map(|(&a, &b)| a - b));
        Ok(Self {
            w: self.w,
            h: self.h,
            stride: self.w,
            data: out,
        })
    }

    /// Copy into another working precision.
    pub fn convert<G: WorkingFloat>(&self) -> Result<Plane<G>> {
        let mut out = Plane::<G>::try_new(self.w, self.h)?;
        for (dst, &src) in out.data.iter_mut().zip(&self.data) {
            *dst = src.cast();
        }
        Ok(out)
    }

    /// Largest absolute per-pixel difference, `None` on geometry mismatch.
    pub fn max_abs_diff(&self, other: &Plane<F>) -> Option<F> {
        if self.w != other.w || self.h != other.h {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| (a - b).abs())
                .fold(F::zero(), F::max),
        )
    }

    pub fn sum(&self) -> F {
        self.data.iter().copied().sum()
    }
}

impl<F: WorkingFloat> ImageView for Plane<F> {
    type Pixel = F;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[F] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference_and_add_restore_original() {
        let a = ImageF32::from_fn(4, 3, |x, y| (x + 2 * y) as f32 * 0.1);
        let b = ImageF32::from_fn(4, 3, |x, _| x as f32 * 0.05);
        let mut d = a.difference(&b).unwrap();
        d.add_plane(&b).unwrap();
        assert!(d.max_abs_diff(&a).unwrap() < 1e-6);
    }

    #[test]
    fn geometry_mismatch_is_reported() {
        let mut a = ImageF32::new(4, 4);
        let b = ImageF64::new(4, 5);
        let err = a.add_plane(&b).unwrap_err();
        assert!(matches!(
            err,
            TransformError::GeometryMismatch {
                expected: (4, 4),
                actual: (4, 5)
            }
        ));
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(ImageF64::from_vec(2, 2, vec![0.0; 3]).is_err());
        let p = ImageF64::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(p.get(1, 1), 4.0);
        assert_eq!(p.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn overflowing_allocation_fails_cleanly() {
        let err = ImageF32::try_new(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, TransformError::AllocationFailed { .. }));
    }
}
