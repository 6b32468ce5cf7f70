//! Owned single-channel image of any supported sample type, with an active
//! selection rectangle.
//!
//! The selection restricts which pixels the transform reads on decomposition
//! and writes on reconstruction. A freshly built image selects its full area.
use super::plane::{allocate, Plane};
use super::sample::{Sample, WorkingFloat};
use super::traits::ImageView;
use crate::error::{Result, TransformError};
use crate::types::Rect;

#[derive(Clone, Debug, PartialEq)]
pub struct Image<T> {
    w: usize,
    h: usize,
    data: Vec<T>,
    selection: Rect,
}

impl<T: Sample> Default for Image<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Sample> Image<T> {
    /// Image with zero width and height.
    pub fn empty() -> Self {
        Self {
            w: 0,
            h: 0,
            data: Vec::new(),
            selection: Rect::default(),
        }
    }

    /// Zero image of size `w × h`.
    pub fn new(w: usize, h: usize) -> Result<Self> {
        Ok(Self {
            w,
            h,
            data: allocate(w, h, T::default())?,
            selection: Rect::full(w, h),
        })
    }

    /// Wrap existing row-major data.
    pub fn from_vec(w: usize, h: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != w * h {
            return Err(TransformError::InvalidImageData {
                expected: w * h,
                actual: data.len(),
            });
        }
        Ok(Self {
            w,
            h,
            data,
            selection: Rect::full(w, h),
        })
    }

    /// Build an image by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self {
            w,
            h,
            data,
            selection: Rect::full(w, h),
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        self.data[y * self.w + x] = v;
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn selection(&self) -> Rect {
        self.selection
    }

    /// Restrict processing to `rect`, clipped to the image bounds.
    pub fn select(&mut self, rect: Rect) {
        self.selection = rect.clamped(self.w, self.h);
    }

    pub fn has_empty_selection(&self) -> bool {
        self.selection.is_empty()
    }

    /// Number of samples inside the active selection.
    pub fn selected_samples(&self) -> usize {
        self.selection.area()
    }

    /// Copy the selected region into a working plane of precision `F`.
    pub fn selection_to_plane<F: WorkingFloat>(&self) -> Result<Plane<F>> {
        let sel = self.selection;
        let mut out = Plane::<F>::try_new(sel.width(), sel.height())?;
        for (y, dst) in out.data.chunks_exact_mut(sel.width().max(1)).enumerate() {
            let src = &self.row(sel.y0 + y)[sel.x0..sel.x1];
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = s.to_working().cast();
            }
        }
        log::trace!(
            "converted {}x{} {} selection to {}",
            sel.width(),
            sel.height(),
            T::NAME,
            F::NAME
        );
        Ok(out)
    }

    /// Overwrite the selected region with `plane`, whose geometry must match.
    pub fn write_selection<F: WorkingFloat>(&mut self, plane: &Plane<F>) -> Result<()> {
        let sel = self.selection;
        if plane.w != sel.width() || plane.h != sel.height() {
            return Err(TransformError::GeometryMismatch {
                expected: (sel.width(), sel.height()),
                actual: (plane.w, plane.h),
            });
        }
        for y in 0..sel.height() {
            let start = (sel.y0 + y) * self.w + sel.x0;
            let dst = &mut self.data[start..start + sel.width()];
            for (d, &s) in dst.iter_mut().zip(plane.row(y)) {
                *d = T::from_working(s.cast());
            }
        }
        Ok(())
    }

    /// Replace geometry and contents with `plane`; selects the full area.
    pub fn assign_plane<F: WorkingFloat>(&mut self, plane: &Plane<F>) -> Result<()> {
        let mut data = allocate(plane.w, plane.h, T::default())?;
        for (d, &s) in data.iter_mut().zip(&plane.data) {
            *d = T::from_working(s.cast());
        }
        self.w = plane.w;
        self.h = plane.h;
        self.data = data;
        self.selection = Rect::full(plane.w, plane.h);
        Ok(())
    }

    /// Set every selected sample to zero.
    pub fn zero_selection(&mut self) {
        let sel = self.selection;
        for y in sel.y0..sel.y1 {
            let start = y * self.w;
            self.data[start + sel.x0..start + sel.x1].fill(T::default());
        }
    }
}

impl<T: Sample> ImageView for Image<T> {
    type Pixel = T;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[T] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}
