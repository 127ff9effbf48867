// Path: crates/vm/src/iterator.rs
//! Collection-iteration primitives backing the `Enumerator.*` and
//! `Iterator.*` syscalls.
//!
//! Cursors start before the first element; `next` advances and reports
//! whether an element is available. State lives behind `Rc<RefCell<..>>`
//! in the interop item so that a duplicated handle shares its cursor.

use dryrun_types::error::InteropError;

use crate::item::StackItem;

#[derive(Debug)]
pub struct Enumerator {
    items: Vec<StackItem>,
    pos: Option<usize>,
}

impl Enumerator {
    pub fn new(items: Vec<StackItem>) -> Self {
        Self { items, pos: None }
    }

    pub fn next(&mut self) -> bool {
        let next = self.pos.map_or(0, |p| p + 1);
        if next < self.items.len() {
            self.pos = Some(next);
            true
        } else {
            self.pos = Some(self.items.len());
            false
        }
    }

    pub fn value(&self) -> Result<StackItem, InteropError> {
        self.pos
            .and_then(|p| self.items.get(p))
            .cloned()
            .ok_or(InteropError::WrongInteropType {
                expected: "positioned Enumerator",
            })
    }

    /// Remaining elements of `self` followed by remaining elements of
    /// `other`, as a fresh cursor.
    pub fn concat(&self, other: &Enumerator) -> Enumerator {
        let mut items = self.remaining();
        items.extend(other.remaining());
        Enumerator::new(items)
    }

    fn remaining(&self) -> Vec<StackItem> {
        let from = self.pos.map_or(0, |p| p + 1);
        self.items.get(from..).unwrap_or_default().to_vec()
    }
}

/// A key/value iterator. Arrays iterate with their indices as keys.
#[derive(Debug)]
pub struct KeyedIterator {
    keys: Vec<StackItem>,
    values: Vec<StackItem>,
    pos: Option<usize>,
}

impl KeyedIterator {
    pub fn from_array(items: Vec<StackItem>) -> Self {
        let keys = (0..items.len() as i64).map(StackItem::Integer).collect();
        Self {
            keys,
            values: items,
            pos: None,
        }
    }

    pub fn from_map(entries: Vec<(StackItem, StackItem)>) -> Self {
        let (keys, values) = entries.into_iter().unzip();
        Self {
            keys,
            values,
            pos: None,
        }
    }

    pub fn next(&mut self) -> bool {
        let next = self.pos.map_or(0, |p| p + 1);
        if next < self.values.len() {
            self.pos = Some(next);
            true
        } else {
            self.pos = Some(self.values.len());
            false
        }
    }

    pub fn key(&self) -> Result<StackItem, InteropError> {
        self.pos
            .and_then(|p| self.keys.get(p))
            .cloned()
            .ok_or(InteropError::WrongInteropType {
                expected: "positioned Iterator",
            })
    }

    pub fn value(&self) -> Result<StackItem, InteropError> {
        self.pos
            .and_then(|p| self.values.get(p))
            .cloned()
            .ok_or(InteropError::WrongInteropType {
                expected: "positioned Iterator",
            })
    }

    pub fn concat(&self, other: &KeyedIterator) -> KeyedIterator {
        let from_a = self.pos.map_or(0, |p| p + 1);
        let from_b = other.pos.map_or(0, |p| p + 1);
        let mut keys = self.keys.get(from_a..).unwrap_or_default().to_vec();
        keys.extend(other.keys.get(from_b..).unwrap_or_default().to_vec());
        let mut values = self.values.get(from_a..).unwrap_or_default().to_vec();
        values.extend(other.values.get(from_b..).unwrap_or_default().to_vec());
        KeyedIterator {
            keys,
            values,
            pos: None,
        }
    }

    /// Remaining keys as a plain enumerator, for `Iterator.Keys`.
    pub fn keys_enumerator(&self) -> Enumerator {
        let from = self.pos.map_or(0, |p| p + 1);
        Enumerator::new(self.keys.get(from..).unwrap_or_default().to_vec())
    }

    /// Remaining values as a plain enumerator, for `Iterator.Values`.
    pub fn values_enumerator(&self) -> Enumerator {
        let from = self.pos.map_or(0, |p| p + 1);
        Enumerator::new(self.values.get(from..).unwrap_or_default().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerator_walks_all_items() {
        let mut e = Enumerator::new(vec![StackItem::Integer(1), StackItem::Integer(2)]);
        assert!(e.value().is_err(), "cursor starts before the first item");
        assert!(e.next());
        assert_eq!(e.value().unwrap().to_int().unwrap(), 1);
        assert!(e.next());
        assert_eq!(e.value().unwrap().to_int().unwrap(), 2);
        assert!(!e.next());
        assert!(e.value().is_err());
    }

    #[test]
    fn concat_takes_remaining_elements() {
        let mut a = Enumerator::new(vec![StackItem::Integer(1), StackItem::Integer(2)]);
        let b = Enumerator::new(vec![StackItem::Integer(3)]);
        a.next(); // consume 1
        let mut c = a.concat(&b);
        let mut seen = Vec::new();
        while c.next() {
            seen.push(c.value().unwrap().to_int().unwrap());
        }
        assert_eq!(seen, vec![2, 3]);
    }

    #[test]
    fn array_iterator_uses_indices_as_keys() {
        let mut it = KeyedIterator::from_array(vec![
            StackItem::ByteArray(b"a".to_vec()),
            StackItem::ByteArray(b"b".to_vec()),
        ]);
        assert!(it.next());
        assert_eq!(it.key().unwrap().to_int().unwrap(), 0);
        assert_eq!(it.value().unwrap().to_bytes().unwrap(), b"a");
        assert!(it.next());
        assert_eq!(it.key().unwrap().to_int().unwrap(), 1);
    }

    #[test]
    fn keys_and_values_enumerators_skip_consumed() {
        let mut it = KeyedIterator::from_map(vec![
            (StackItem::Integer(10), StackItem::Integer(100)),
            (StackItem::Integer(20), StackItem::Integer(200)),
        ]);
        it.next();
        let mut keys = it.keys_enumerator();
        assert!(keys.next());
        assert_eq!(keys.value().unwrap().to_int().unwrap(), 20);
        assert!(!keys.next());
    }
}
