//! Ordered in-memory container behind the manager. It only knows about
//! positions; uniqueness and validation belong to `CustomerManager`.

use std::slice;

use crate::error::IndexOutOfRange;

/// Insertion-ordered list with bounds-checked access. Out-of-range positions
/// come back as `IndexOutOfRange` instead of panicking.
#[derive(Debug, Clone)]
pub struct CustomerCollection<T> {
    items: Vec<T>,
}

impl<T> Default for CustomerCollection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> CustomerCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&T, IndexOutOfRange> {
        let count = self.count();
        self.items.get(index).ok_or(IndexOutOfRange { index, count })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfRange> {
        let count = self.count();
        self.items
            .get_mut(index)
            .ok_or(IndexOutOfRange { index, count })
    }

    /// Replace the item at `index`, handing back the one that was there.
    pub fn set(&mut self, index: usize, item: T) -> Result<T, IndexOutOfRange> {
        let slot = self.get_mut(index)?;
        Ok(std::mem::replace(slot, item))
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove the item at `index`; everything after it shifts down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<T, IndexOutOfRange> {
        self.check(index)?;
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().position(predicate)
    }

    pub fn any<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().any(predicate)
    }

    fn check(&self, index: usize) -> Result<(), IndexOutOfRange> {
        if index < self.count() {
            Ok(())
        } else {
            Err(IndexOutOfRange {
                index,
                count: self.count(),
            })
        }
    }
}

impl<T: Clone> CustomerCollection<T> {
    /// Copy of the current contents. Changing the copy leaves the store alone.
    pub fn all(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<'a, T> IntoIterator for &'a CustomerCollection<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
