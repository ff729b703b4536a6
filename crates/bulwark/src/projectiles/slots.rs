//! # Slot Table
//!
//! Fixed-capacity storage where the index is the identity.
//!
//! Unlike a free-list pool, allocation always takes the LOWEST free index,
//! so ids stay small and predictable: after freeing slot 1 of {0, 1, 2},
//! the next insert gets 1 again.

/// A fixed-capacity table of optional values.
///
/// # Example
///
/// ```rust,ignore
/// let mut slots: SlotTable<Projectile> = SlotTable::new(5);
///
/// let id = slots.insert_with(|id| Projectile::new(id))?;
/// slots.remove(id);
/// ```
#[derive(Clone, Debug)]
pub struct SlotTable<T> {
    /// The storage array. Allocated once.
    storage: Box<[Option<T>]>,
    /// Number of occupied slots.
    occupied: usize,
}

impl<T> SlotTable<T> {
    /// Creates a table with `capacity` empty slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let storage: Vec<Option<T>> = (0..capacity).map(|_| None).collect();
        Self {
            storage: storage.into_boxed_slice(),
            occupied: 0,
        }
    }

    /// Returns the number of slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Returns the number of occupied slots.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.occupied
    }

    /// Returns true if no slot is occupied.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Returns true if every slot is occupied.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.occupied == self.capacity()
    }

    /// Lowest free index, scanning upward.
    #[must_use]
    pub fn first_free(&self) -> Option<usize> {
        self.storage.iter().position(Option::is_none)
    }

    /// Stores the value built for the lowest free index.
    ///
    /// Returns the index, or `None` without calling `build` if the table is
    /// full.
    pub fn insert_with(&mut self, build: impl FnOnce(usize) -> T) -> Option<usize> {
        let index = self.first_free()?;
        self.storage[index] = Some(build(index));
        self.occupied += 1;
        Some(index)
    }

    /// Empties a slot and returns what was in it.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let value = self.storage.get_mut(index)?.take()?;
        self.occupied -= 1;
        Some(value)
    }

    /// Gets the value in a slot.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.storage.get(index)?.as_ref()
    }

    /// Gets the value in a slot mutably.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.storage.get_mut(index)?.as_mut()
    }

    /// Iterates occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.storage
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (index, value)))
    }

    /// Iterates occupied slots mutably in index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.storage
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_mut().map(|value| (index, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_index_first() {
        let mut table = SlotTable::new(3);
        assert_eq!(table.insert_with(|i| i * 10), Some(0));
        assert_eq!(table.insert_with(|i| i * 10), Some(1));
        assert_eq!(table.insert_with(|i| i * 10), Some(2));
        assert!(table.is_full());

        assert_eq!(table.remove(1), Some(10));
        assert_eq!(table.first_free(), Some(1));
        assert_eq!(table.insert_with(|i| i + 100), Some(1));
        assert_eq!(table.get(1), Some(&101));
    }

    #[test]
    fn test_full_table_does_not_build() {
        let mut table = SlotTable::new(1);
        table.insert_with(|_| 'a');
        let mut built = false;
        assert_eq!(
            table.insert_with(|_| {
                built = true;
                'b'
            }),
            None
        );
        assert!(!built);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut table = SlotTable::new(2);
        table.insert_with(|_| ());
        assert_eq!(table.remove(0), Some(()));
        assert_eq!(table.remove(0), None);
        assert_eq!(table.remove(99), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_iter_skips_empty_slots() {
        let mut table = SlotTable::new(4);
        for _ in 0..4 {
            table.insert_with(|i| i);
        }
        table.remove(0);
        table.remove(2);
        assert_eq!(table.iter().map(|(i, _)| i).collect::<Vec<_>>(), vec![1, 3]);

        for (_, value) in table.iter_mut() {
            *value += 1;
        }
        assert_eq!(table.get(3), Some(&4));
        assert_eq!(table.len(), 2);
    }
}
