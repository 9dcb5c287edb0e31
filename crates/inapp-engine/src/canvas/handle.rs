use std::num::NonZeroU64;

use super::CanvasError;

/// Opaque, non-zero canvas handle handed across the host boundary.
///
/// Encodes a slot index (low 32 bits, offset by one) and the slot's generation
/// (high 32 bits). A destroyed canvas bumps its slot's generation, so old handles
/// resolve to `StaleHandle` instead of aliasing a newer canvas.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CanvasHandle(NonZeroU64);

impl CanvasHandle {
    fn new(index: u32, generation: u32) -> Self {
        let raw = (u64::from(generation) << 32) | (u64::from(index) + 1);
        // Low half is `index + 1 >= 1`, so `raw` is never zero.
        Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }

    /// Returns `None` for the null handle (`0`).
    #[inline]
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    #[inline]
    pub fn into_raw(self) -> u64 {
        self.0.get()
    }

    fn index(self) -> Option<usize> {
        let low = (self.0.get() & 0xFFFF_FFFF) as u32;
        low.checked_sub(1).map(|i| i as usize)
    }

    fn generation(self) -> u32 {
        (self.0.get() >> 32) as u32
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational slot map of live canvases.
///
/// Lookups never fault: null, destroyed and never-issued handles all come back as
/// `CanvasError::StaleHandle`.
pub struct CanvasRegistry<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> CanvasRegistry<T> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Stores `value` and returns its handle.
    pub fn insert(&mut self, value: T) -> CanvasHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return CanvasHandle::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        CanvasHandle::new(index, 0)
    }

    /// Resolves a raw host handle.
    pub fn get_mut(&mut self, raw: u64) -> Result<&mut T, CanvasError> {
        let stale = CanvasError::StaleHandle(raw);
        let handle = CanvasHandle::from_raw(raw).ok_or_else(|| stale.clone())?;
        let index = handle.index().ok_or_else(|| stale.clone())?;

        match self.slots.get_mut(index) {
            Some(slot) if slot.generation == handle.generation() => {
                slot.value.as_mut().ok_or(stale)
            }
            _ => Err(stale),
        }
    }

    /// Removes the value behind `raw`, invalidating every copy of its handle.
    pub fn remove(&mut self, raw: u64) -> Result<T, CanvasError> {
        let stale = CanvasError::StaleHandle(raw);
        let handle = CanvasHandle::from_raw(raw).ok_or_else(|| stale.clone())?;
        let index = handle.index().ok_or_else(|| stale.clone())?;

        let slot = match self.slots.get_mut(index) {
            Some(slot) if slot.generation == handle.generation() => slot,
            _ => return Err(stale),
        };
        let value = slot.value.take().ok_or(stale)?;

        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index as u32);
        Ok(value)
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for CanvasRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_never_null() {
        let mut reg = CanvasRegistry::new();
        let h = reg.insert("a");
        assert_ne!(h.into_raw(), 0);
        assert_eq!(CanvasHandle::from_raw(h.into_raw()), Some(h));
    }

    #[test]
    fn null_handle_is_stale() {
        let mut reg: CanvasRegistry<u8> = CanvasRegistry::new();
        assert_eq!(reg.get_mut(0), Err(CanvasError::StaleHandle(0)));
        assert_eq!(reg.remove(0), Err(CanvasError::StaleHandle(0)));
    }

    #[test]
    fn never_issued_handle_is_stale() {
        let mut reg = CanvasRegistry::new();
        reg.insert(1u8);
        assert!(reg.get_mut(0xDEAD_BEEF).is_err());
        // Index bits zero: no slot.
        assert!(reg.get_mut(1 << 32).is_err());
    }

    #[test]
    fn removed_handle_stays_stale_after_slot_reuse() {
        let mut reg = CanvasRegistry::new();
        let old = reg.insert(10).into_raw();
        assert_eq!(reg.remove(old), Ok(10));
        assert_eq!(reg.remove(old), Err(CanvasError::StaleHandle(old)));

        let new = reg.insert(20).into_raw();
        assert_ne!(old, new);
        assert!(reg.get_mut(old).is_err());
        assert_eq!(reg.get_mut(new).copied(), Ok(20));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn canvases_coexist() {
        let mut reg = CanvasRegistry::new();
        let a = reg.insert('a').into_raw();
        let b = reg.insert('b').into_raw();
        *reg.get_mut(a).unwrap() = 'x';
        assert_eq!(reg.get_mut(b).copied(), Ok('b'));
        assert_eq!(reg.get_mut(a).copied(), Ok('x'));
        assert!(!reg.is_empty());
    }
}
