//! Fixed-capacity object pool
//!
//! Slots never grow or compact. Acquire hands out the lowest free index, so
//! iteration order (and therefore tie-breaking between simultaneous hits) is
//! stable for a given history. Free slots are kept in a min-heap instead of
//! being found by a linear scan.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Bounded slot array of `T`
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<Option<T>>,
    free: BinaryHeap<Reverse<usize>>,
}

impl<T> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            free: (0..capacity).map(Reverse).collect(),
        }
    }

    /// Total slot count
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Occupy the lowest free slot with `value`
    ///
    /// Returns `None` (dropping `value`) when the pool is exhausted; live
    /// entries are never touched.
    pub fn acquire(&mut self, value: T) -> Option<usize> {
        let Reverse(index) = self.free.pop()?;
        self.slots[index] = Some(value);
        Some(index)
    }

    /// Free a slot, returning its entry
    pub fn release(&mut self, index: usize) -> Option<T> {
        let value = self.slots.get_mut(index)?.take()?;
        self.free.push(Reverse(index));
        Some(value)
    }

    /// Release every slot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.free = (0..self.slots.len()).map(Reverse).collect();
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)?.as_mut()
    }

    /// Live entries in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }

    /// Live entries in index order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|v| (i, v)))
    }

    /// Release every live entry for which `keep` returns false
    pub fn retain(&mut self, mut keep: impl FnMut(usize, &mut T) -> bool) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Some(value) = slot {
                if !keep(index, value) {
                    *slot = None;
                    self.free.push(Reverse(index));
                }
            }
        }
    }
}
