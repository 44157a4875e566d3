//! Fixed-capacity slot pool.
//!
//! Every pooled object (projectile, explosion) is pre-spawned once and then only
//! toggled between active and inactive. The pool is an array of slots plus an
//! index free-list, so `acquire` and `release` are O(1) and capacity is a hard
//! upper bound on the number of active objects.
//!
//! ```text
//!   acquire: free.pop()  -> slot.active = true  -> Some(handle)
//!            free empty  -> None (caller drops the request)
//!   release: slot.active -> slot.active = false -> free.push(index)
//!            inactive    -> no-op (idempotent)
//! ```

/// Index of one slot inside a `SlotPool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle(u32);

impl SlotHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    item: T,
    active: bool,
}

#[derive(Debug, Clone)]
pub struct SlotPool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Default for SlotPool<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T: Copy> SlotPool<T> {
    /// Build a pool over pre-created items; every slot starts inactive.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let slots: Vec<Slot<T>> = items
            .into_iter()
            .map(|item| Slot { item, active: false })
            .collect();

        // Reversed so slot 0 is handed out first.
        let free = (0..slots.len() as u32).rev().collect();
        Self { slots, free }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty()
    }

    /// Hand out a free slot, or `None` if every slot is active.
    pub fn acquire(&mut self) -> Option<(SlotHandle, T)> {
        let index = self.free.pop()?;
        let slot = &mut self.slots[index as usize];
        slot.active = true;
        Some((SlotHandle(index), slot.item))
    }

    /// Return a slot to the free list.
    ///
    /// Returns `false` if the slot was already inactive (or out of range); the
    /// pool is left untouched in that case.
    pub fn release(&mut self, handle: SlotHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index()) else {
            return false;
        };
        if !slot.active {
            return false;
        }
        slot.active = false;
        self.free.push(handle.0);
        true
    }

    #[inline]
    pub fn is_active(&self, handle: SlotHandle) -> bool {
        self.slots.get(handle.index()).is_some_and(|s| s.active)
    }

    #[inline]
    pub fn get(&self, handle: SlotHandle) -> Option<T> {
        self.slots.get(handle.index()).map(|s| s.item)
    }

    /// All pooled items with their handles, active or not.
    pub fn iter(&self) -> impl Iterator<Item = (SlotHandle, T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| (SlotHandle(i as u32), s.item))
    }

    #[cfg(test)]
    pub fn iter_active(&self) -> impl Iterator<Item = (SlotHandle, T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (SlotHandle(i as u32), s.item))
    }
}
