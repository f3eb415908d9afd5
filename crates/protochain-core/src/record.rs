//! Records
//!
//! Own entries in insertion order plus one delegate link fixed at creation.

use crate::function::GetterFn;
use crate::{ConstructorId, RecordId, Value};
use indexmap::IndexMap;
use std::fmt;

/// What an own entry holds
#[derive(Clone)]
pub enum Slot {
    Data(Value),
    /// `get key() { ... }`, evaluated against the reading record
    Getter(GetterFn),
}

impl Slot {
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            Slot::Data(value) => Some(value),
            Slot::Getter(_) => None,
        }
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self, Slot::Getter(_))
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Data(value) => f.debug_tuple("Data").field(value).finish(),
            Slot::Getter(_) => f.write_str("Getter"),
        }
    }
}

/// An own entry
#[derive(Debug, Clone)]
pub struct Property {
    pub slot: Slot,
    pub enumerable: bool,
}

/// What built a record.
///
/// Set once at construction; cloning produces a `Plain` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordKind {
    /// Literal, `create`, clone or prototype object
    #[default]
    Plain,
    /// Built by `Heap::construct`
    Instance(ConstructorId),
}

/// A keyed mapping with an optional delegate
#[derive(Debug, Clone, Default)]
pub struct Record {
    properties: IndexMap<Box<str>, Property>,
    delegate: Option<RecordId>,
    kind: RecordKind,
}

impl Record {
    pub(crate) fn new(delegate: Option<RecordId>, kind: RecordKind) -> Self {
        Self { properties: IndexMap::new(), delegate, kind }
    }

    pub fn delegate(&self) -> Option<RecordId> {
        self.delegate
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Own data value; accessors resolve through `Heap::get`
    pub fn get_own(&self, key: &str) -> Option<&Value> {
        self.properties.get(key).and_then(|p| p.slot.as_data())
    }

    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    pub fn has_own(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Own keys in insertion order, enumerable or not
    pub fn own_keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(|k| &**k)
    }

    /// Enumerable own entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.properties
            .iter()
            .filter(|(_, p)| p.enumerable)
            .map(|(k, p)| (&**k, &p.slot))
    }

    /// Assignment: new keys are enumerable, existing keys keep their flag.
    /// An accessor slot is replaced by the data value.
    pub(crate) fn assign(&mut self, key: &str, value: Value) {
        match self.properties.get_mut(key) {
            Some(prop) => prop.slot = Slot::Data(value),
            None => {
                self.properties.insert(key.into(), Property { slot: Slot::Data(value), enumerable: true });
            }
        }
    }

    pub(crate) fn define(&mut self, key: &str, slot: Slot, enumerable: bool) {
        self.properties.insert(key.into(), Property { slot, enumerable });
    }

    /// Keeps the order of the remaining keys
    pub(crate) fn remove(&mut self, key: &str) -> Option<Property> {
        self.properties.shift_remove(key)
    }

    #[cfg(test)]
    pub(crate) fn relink(&mut self, delegate: Option<RecordId>) {
        self.delegate = delegate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Heap, Result};
    use std::rc::Rc;

    fn five(_: &Heap, _: RecordId) -> Result<Value> {
        Ok(Value::from(5))
    }

    #[test]
    fn test_assign_keeps_enumerable_flag() {
        let mut record = Record::default();
        record.define("hidden", Slot::Data(Value::from(1)), false);
        record.assign("hidden", Value::from(2));
        record.assign("shown", Value::from(3));

        let prop = record.property("hidden").unwrap();
        assert_eq!(prop.slot.as_data(), Some(&Value::from(2)));
        assert!(!prop.enumerable);

        let entries: Vec<_> = record.entries().map(|(k, slot)| (k, slot.as_data())).collect();
        assert_eq!(entries, vec![("shown", Some(&Value::from(3)))]);
        assert_eq!(record.own_keys().collect::<Vec<_>>(), vec!["hidden", "shown"]);
    }

    #[test]
    fn test_assign_replaces_accessor() {
        let mut record = Record::default();
        let getter: GetterFn = Rc::new(five);
        record.define("r", Slot::Getter(getter), true);
        assert!(record.has_own("r"));
        assert_eq!(record.get_own("r"), None);

        record.assign("r", Value::from(1));
        let prop = record.property("r").unwrap();
        assert!(!prop.slot.is_accessor());
        assert_eq!(record.get_own("r"), Some(&Value::from(1)));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut record = Record::default();
        for key in ["a", "b", "c"] {
            record.assign(key, Value::Null);
        }
        assert!(record.remove("b").is_some());
        assert!(record.remove("b").is_none());
        assert_eq!(record.own_keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }
}
