//! Fixed-length store of `N + 1` optional layers with a parallel enabled mask.
//!
//! Index `N` is the residual, `0..N` are detail layers. Public accessors take
//! signed indices so that negative values report `InvalidLayerIndex` rather
//! than wrapping; indices in range whose slot is empty report
//! `NonexistentLayer`.
use crate::error::{Result, TransformError};
use crate::image::{Plane, WorkingFloat};

#[derive(Clone, Debug, PartialEq)]
pub struct LayerSet<F> {
    slots: Vec<Option<Plane<F>>>,
    enabled: Vec<bool>,
}

impl<F: WorkingFloat> LayerSet<F> {
    /// `count` empty, enabled slots.
    pub fn new(count: usize) -> Self {
        Self {
            slots: vec![None; count],
            enabled: vec![true; count],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no slot holds data.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Validated slot index.
    pub fn index(&self, j: isize) -> Result<usize> {
        if j < 0 || j as usize >= self.slots.len() {
            return Err(TransformError::InvalidLayerIndex {
                index: j,
                count: self.slots.len(),
            });
        }
        Ok(j as usize)
    }

    pub fn get(&self, j: isize) -> Result<&Plane<F>> {
        let i = self.index(j)?;
        self.slots[i]
            .as_ref()
            .ok_or(TransformError::NonexistentLayer { index: i })
    }

    pub fn get_mut(&mut self, j: isize) -> Result<&mut Plane<F>> {
        let i = self.index(j)?;
        self.slots[i]
            .as_mut()
            .ok_or(TransformError::NonexistentLayer { index: i })
    }

    /// Store `plane` at `j`; its geometry must match the other stored layers.
    pub fn set(&mut self, j: isize, plane: Plane<F>) -> Result<()> {
        let i = self.index(j)?;
        let other = self
            .slots
            .iter()
            .enumerate()
            .find_map(|(k, s)| s.as_ref().filter(|_| k != i));
        if let Some(other) = other {
            if other.dimensions() != plane.dimensions() {
                return Err(TransformError::GeometryMismatch {
                    expected: other.dimensions(),
                    actual: plane.dimensions(),
                });
            }
        }
        self.slots[i] = Some(plane);
        Ok(())
    }

    pub fn is_allocated(&self, j: isize) -> Result<bool> {
        let i = self.index(j)?;
        Ok(self.slots[i].is_some())
    }

    pub fn is_enabled(&self, j: isize) -> Result<bool> {
        let i = self.index(j)?;
        Ok(self.enabled[i])
    }

    pub fn set_enabled(&mut self, j: isize, enabled: bool) -> Result<()> {
        let i = self.index(j)?;
        self.enabled[i] = enabled;
        Ok(())
    }

    /// Move the layer out, leaving the slot empty.
    pub fn take(&mut self, j: isize) -> Result<Option<Plane<F>>> {
        let i = self.index(j)?;
        Ok(self.slots[i].take())
    }

    /// Drop all layer data; the enabled mask is kept.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Plane<F>>> + '_ {
        self.slots.iter().map(Option::as_ref)
    }

    /// Geometry shared by the stored layers.
    pub fn geometry(&self) -> Option<(usize, usize)> {
        self.slots.iter().flatten().map(Plane::dimensions).next()
    }

    #[inline]
    pub(crate) fn slot_enabled(&self, i: usize) -> bool {
        self.enabled[i]
    }

    #[inline]
    pub(crate) fn store(&mut self, i: usize, plane: Plane<F>) {
        self.slots[i] = Some(plane);
    }

    /// Layer `i` if it is both allocated and enabled.
    #[inline]
    pub(crate) fn contributing(&self, i: usize) -> Option<&Plane<F>> {
        self.slots[i].as_ref().filter(|_| self.enabled[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_and_missing_are_distinguished() {
        let mut set = LayerSet::<f32>::new(3);
        assert!(matches!(
            set.get(3),
            Err(TransformError::InvalidLayerIndex { index: 3, count: 3 })
        ));
        assert!(matches!(
            set.get(-1),
            Err(TransformError::InvalidLayerIndex { index: -1, .. })
        ));
        assert!(matches!(
            set.get(1),
            Err(TransformError::NonexistentLayer { index: 1 })
        ));
        set.set(1, Plane::new(2, 2)).unwrap();
        assert!(set.get(1).is_ok());
        assert!(!set.is_empty());
    }

    #[test]
    fn set_rejects_mismatched_geometry() {
        let mut set = LayerSet::<f64>::new(2);
        set.set(0, Plane::new(4, 4)).unwrap();
        assert!(set.set(1, Plane::new(4, 3)).is_err());
        // replacing the only stored layer may change geometry
        set.set(0, Plane::new(5, 5)).unwrap();
        assert_eq!(set.geometry(), Some((5, 5)));
    }

    #[test]
    fn contributing_requires_allocation_and_enabled() {
        let mut set = LayerSet::<f32>::new(2);
        set.store(0, Plane::new(1, 1));
        assert!(set.contributing(0).is_some());
        set.set_enabled(0, false).unwrap();
        assert!(set.contributing(0).is_none());
        assert!(set.contributing(1).is_none());
        assert_eq!(set.take(0).unwrap().map(|p| p.w), Some(1));
        assert!(set.is_empty());
    }
}
