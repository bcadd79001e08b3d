/// Bounded slot table indexed by small integer handles.
///
/// Handles arrive from scripts as plain integers, so every lookup goes
/// through [`Slots::get`] / [`Slots::get_mut`], which treat negative,
/// out-of-range and empty handles the same way: no entry.
#[derive(Debug, Clone)]
pub struct Slots<T> {
    slots: Vec<Option<T>>,
}

impl<T> Slots<T> {
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn index(&self, handle: i32) -> Option<usize> {
        let index = usize::try_from(handle).ok()?;
        (index < self.slots.len()).then_some(index)
    }

    pub fn get(&self, handle: i32) -> Option<&T> {
        let index = self.index(handle)?;
        self.slots[index].as_ref()
    }

    pub fn get_mut(&mut self, handle: i32) -> Option<&mut T> {
        let index = self.index(handle)?;
        self.slots[index].as_mut()
    }

    pub fn contains(&self, handle: i32) -> bool {
        self.get(handle).is_some()
    }

    /// Store `value` at `handle`, returning the previous occupant.
    /// Out-of-range handles hand the value back untouched.
    pub fn insert(&mut self, handle: usize, value: T) -> Result<Option<T>, T> {
        match self.slots.get_mut(handle) {
            Some(slot) => Ok(slot.replace(value)),
            None => Err(value),
        }
    }

    pub fn remove(&mut self, handle: usize) -> Option<T> {
        self.slots.get_mut(handle).and_then(Option::take)
    }

    /// Lowest empty handle at or above `floor`, found by linear scan.
    pub fn first_free_from(&self, floor: usize) -> Option<usize> {
        (floor..self.slots.len()).find(|&index| self.slots[index].is_none())
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Occupied slots in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (index, value)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_mut().map(|value| (index, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_access_rejects_bad_handles() {
        let mut slots = Slots::new(4);
        assert!(slots.insert(2, "two").unwrap().is_none());
        assert_eq!(slots.get(2), Some(&"two"));
        assert_eq!(slots.get(1), None);
        assert_eq!(slots.get(-1), None);
        assert_eq!(slots.get(4), None);
        assert_eq!(slots.get(i32::MAX), None);
        assert_eq!(slots.insert(4, "four"), Err("four"));
    }

    #[test]
    fn first_free_scans_from_floor() {
        let mut slots = Slots::new(5);
        slots.insert(1, ()).unwrap();
        slots.insert(2, ()).unwrap();
        assert_eq!(slots.first_free_from(1), Some(3));
        assert_eq!(slots.first_free_from(0), Some(0));
        slots.insert(3, ()).unwrap();
        slots.insert(4, ()).unwrap();
        assert_eq!(slots.first_free_from(1), None);
        slots.remove(2);
        assert_eq!(slots.first_free_from(1), Some(2));
    }
}
