//! Property Resolver
//!
//! Reads walk the delegate chain; writes only ever touch the target record.

use crate::record::{Record, Slot};
use crate::{Heap, ObjectError, RecordId, Result, Value};
use std::collections::HashSet;

/// Outcome of a chain lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// `owner` holds the key; `depth` 0 means an own entry
    Found { value: Value, owner: RecordId, depth: usize },
    NotFound,
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found { .. })
    }

    pub fn is_own(&self) -> bool {
        matches!(self, Lookup::Found { depth: 0, .. })
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Lookup::Found { value, .. } => Some(value),
            Lookup::NotFound => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Lookup::Found { value, .. } => Some(value),
            Lookup::NotFound => None,
        }
    }

    pub fn owner(&self) -> Option<RecordId> {
        match self {
            Lookup::Found { owner, .. } => Some(*owner),
            Lookup::NotFound => None,
        }
    }
}

/// Iterator over a record and its delegates, nearest first.
///
/// Yields an error and stops on an unknown id, a revisited record, or a
/// chain longer than `Config::max_chain_depth`.
#[derive(Debug)]
pub struct Chain<'a> {
    heap: &'a Heap,
    next: Option<RecordId>,
    visited: HashSet<RecordId>,
    depth: usize,
}

impl<'a> Iterator for Chain<'a> {
    type Item = Result<(RecordId, &'a Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;

        let max = self.heap.config().max_chain_depth;
        if self.depth > max {
            tracing::warn!("delegate chain through {} exceeds max depth {}", id, max);
            return Some(Err(ObjectError::ChainTooDeep { depth: self.depth, max }));
        }
        if !self.visited.insert(id) {
            tracing::warn!("delegate chain cycle at {}", id);
            return Some(Err(ObjectError::ChainCycle(id)));
        }

        let record = match self.heap.record(id) {
            Ok(record) => record,
            Err(e) => return Some(Err(e)),
        };
        self.next = record.delegate();
        self.depth += 1;
        Some(Ok((id, record)))
    }
}

impl Heap {
    /// `record` followed by every delegate
    pub fn chain(&self, record: RecordId) -> Chain<'_> {
        Chain {
            heap: self,
            next: Some(record),
            visited: HashSet::new(),
            depth: 0,
        }
    }

    /// Delegates of `record`, excluding `record` itself
    pub fn ancestors(&self, record: RecordId) -> Result<Chain<'_>> {
        let start = self.record(record)?;
        Ok(Chain {
            heap: self,
            next: start.delegate(),
            visited: HashSet::from([record]),
            depth: 1,
        })
    }

    pub fn prototype_of(&self, record: RecordId) -> Result<Option<RecordId>> {
        Ok(self.record(record)?.delegate())
    }

    /// Nearest slot for `key` with its owner and depth
    fn find(&self, record: RecordId, key: &str) -> Result<Option<(RecordId, usize, &Slot)>> {
        for (depth, step) in self.chain(record).enumerate() {
            let (owner, current) = step?;
            if let Some(prop) = current.property(key) {
                return Ok(Some((owner, depth, &prop.slot)));
            }
        }
        Ok(None)
    }

    /// Resolve `key`, reporting which record owns it.
    ///
    /// An accessor found anywhere in the chain runs with `record` as its
    /// receiver.
    pub fn lookup(&self, record: RecordId, key: &str) -> Result<Lookup> {
        let Some((owner, depth, slot)) = self.find(record, key)? else {
            tracing::trace!("{}.{} not found", record, key);
            return Ok(Lookup::NotFound);
        };
        tracing::trace!("{}.{} found on {} at depth {}", record, key, owner, depth);
        let value = match slot {
            Slot::Data(value) => value.clone(),
            Slot::Getter(getter) => self.call_getter(getter, record, key)?,
        };
        Ok(Lookup::Found { value, owner, depth })
    }

    /// Effective value of `key`; `None` when no record in the chain owns it
    pub fn get(&self, record: RecordId, key: &str) -> Result<Option<Value>> {
        Ok(self.lookup(record, key)?.into_value())
    }

    /// Create or overwrite an own entry. Never consults the chain.
    pub fn set(&mut self, record: RecordId, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        tracing::trace!("{}.{} = {:?}", record, key, value);
        self.record_mut(record)?.assign(key, value);
        Ok(())
    }

    /// Own entry with an explicit enumerable flag
    pub fn define(
        &mut self,
        record: RecordId,
        key: &str,
        value: impl Into<Value>,
        enumerable: bool,
    ) -> Result<()> {
        self.record_mut(record)?.define(key, Slot::Data(value.into()), enumerable);
        Ok(())
    }

    /// Remove an own entry, re-exposing any inherited one
    pub fn delete(&mut self, record: RecordId, key: &str) -> Result<bool> {
        Ok(self.record_mut(record)?.remove(key).is_some())
    }

    pub fn has_own(&self, record: RecordId, key: &str) -> Result<bool> {
        Ok(self.record(record)?.has_own(key))
    }

    /// Presence only; accessors are not evaluated
    pub fn has_in_chain(&self, record: RecordId, key: &str) -> Result<bool> {
        Ok(self.find(record, key)?.is_some())
    }

    /// Is `candidate` one of `record`'s delegates?
    pub fn delegates_from(&self, candidate: RecordId, record: RecordId) -> Result<bool> {
        for step in self.ancestors(record)? {
            let (id, _) = step?;
            if id == candidate {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Resolve `a.b.c`, each segment through the chain.
    ///
    /// `None` when a segment is missing or a primitive is in the way.
    pub fn get_path(&self, record: RecordId, path: &[&str]) -> Result<Option<Value>> {
        self.record(record)?;
        let mut current = Value::Record(record);
        for key in path {
            let Value::Record(id) = current else {
                return Ok(None);
            };
            match self.get(id, key)? {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// `a.b.c = value`: resolve `a.b` through the chain, then write `c` as an
    /// own entry of whatever record that reaches.
    pub fn set_path(&mut self, record: RecordId, path: &[&str], value: impl Into<Value>) -> Result<()> {
        let Some((last, parents)) = path.split_last() else {
            return Err(ObjectError::invalid("empty property path"));
        };

        let mut target = record;
        for (i, key) in parents.iter().enumerate() {
            let next_key = path[i + 1];
            target = match self.get(target, key)? {
                Some(Value::Record(id)) => id,
                Some(other) => {
                    return Err(ObjectError::NotARecord { key: next_key.into(), found: other.type_name() });
                }
                None => {
                    return Err(ObjectError::NotARecord { key: next_key.into(), found: "missing" });
                }
            };
        }
        self.set(target, last, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn chain_of(heap: &mut Heap, len: usize) -> Vec<RecordId> {
        let mut ids = vec![heap.literal([("root", Value::from(true))])];
        for _ in 1..len {
            let parent = Value::Record(*ids.last().unwrap());
            ids.push(heap.create(&parent).unwrap());
        }
        ids
    }

    #[test]
    fn test_own_shadows_inherited() {
        let mut heap = Heap::new();
        let p = heap.literal([("x", Value::from(1))]);
        let a = heap.create(&Value::Record(p)).unwrap();

        assert_eq!(
            heap.lookup(a, "x").unwrap(),
            Lookup::Found { value: Value::from(1), owner: p, depth: 1 }
        );
        heap.set(a, "x", 2).unwrap();
        assert!(heap.lookup(a, "x").unwrap().is_own());
        assert_eq!(heap.get(a, "x").unwrap(), Some(Value::from(2)));
        assert_eq!(heap.get(p, "x").unwrap(), Some(Value::from(1)));
    }

    #[test]
    fn test_delete_unshadows() {
        let mut heap = Heap::new();
        let p = heap.literal([("step", Value::from("integer"))]);
        let s = heap.create(&Value::Record(p)).unwrap();
        heap.set(s, "step", "decimal").unwrap();

        assert!(heap.delete(s, "step").unwrap());
        assert!(!heap.delete(s, "step").unwrap());
        assert_eq!(heap.get(s, "step").unwrap(), Some(Value::from("integer")));
        assert!(heap.has_in_chain(s, "step").unwrap());
        assert!(!heap.has_own(s, "step").unwrap());
    }

    #[test]
    fn test_missing_key_is_not_an_error() {
        let mut heap = Heap::new();
        let ids = chain_of(&mut heap, 4);
        let leaf = *ids.last().unwrap();
        assert_eq!(heap.lookup(leaf, "absent").unwrap(), Lookup::NotFound);
        let found = heap.lookup(leaf, "root").unwrap();
        assert!(found.is_found() && !found.is_own());
        assert_eq!(found.value(), Some(&Value::from(true)));
    }

    #[test]
    fn test_delegates_from_excludes_self() {
        let mut heap = Heap::new();
        let ids = chain_of(&mut heap, 3);
        let (root, mid, leaf) = (ids[0], ids[1], ids[2]);
        let stranger = heap.empty();

        assert!(heap.delegates_from(root, leaf).unwrap());
        assert!(heap.delegates_from(mid, leaf).unwrap());
        assert!(!heap.delegates_from(leaf, leaf).unwrap());
        assert!(!heap.delegates_from(leaf, root).unwrap());
        assert!(!heap.delegates_from(stranger, leaf).unwrap());
    }

    #[test]
    fn test_cycle_is_detected() {
        let mut heap = Heap::new();
        let a = heap.empty();
        let b = heap.create(&Value::Record(a)).unwrap();
        heap.record_mut(a).unwrap().relink(Some(b));

        assert_eq!(heap.get(b, "x"), Err(ObjectError::ChainCycle(b)));
        let stranger = heap.empty();
        assert_eq!(heap.delegates_from(stranger, a), Err(ObjectError::ChainCycle(a)));
    }

    #[test]
    fn test_depth_limit() {
        let mut heap = Heap::with_config(Config { max_chain_depth: 2, ..Config::default() });
        let ids = chain_of(&mut heap, 4);

        assert_eq!(heap.get(ids[2], "root").unwrap(), Some(Value::from(true)));
        assert_eq!(
            heap.get(ids[3], "root"),
            Err(ObjectError::ChainTooDeep { depth: 3, max: 2 })
        );
        // found before the limit is reached
        heap.set(ids[3], "root", false).unwrap();
        assert_eq!(heap.get(ids[3], "root").unwrap(), Some(Value::from(false)));
    }

    #[test]
    fn test_paths_mutate_shared_composites() {
        let mut heap = Heap::new();
        let meta = heap.literal([("name", Value::from("delorean"))]);
        let p = heap.literal([("meta", Value::Record(meta))]);
        let a = heap.create(&Value::Record(p)).unwrap();

        heap.set_path(a, &["meta", "name"], "doc").unwrap();
        assert_eq!(heap.get_path(p, &["meta", "name"]).unwrap(), Some(Value::from("doc")));
        assert!(!heap.has_own(a, "meta").unwrap());

        assert_eq!(heap.get_path(a, &["meta", "name", "len"]).unwrap(), None);
        assert_eq!(heap.get_path(a, &["nope", "name"]).unwrap(), None);
        assert_eq!(heap.get_path(a, &[]).unwrap(), Some(Value::Record(a)));
    }

    #[test]
    fn test_set_path_errors() {
        let mut heap = Heap::new();
        let a = heap.literal([("count", Value::from(1))]);

        assert_eq!(
            heap.set_path(a, &["count", "inner"], 2),
            Err(ObjectError::NotARecord { key: "inner".into(), found: "number" })
        );
        assert_eq!(
            heap.set_path(a, &["meta", "name"], "x"),
            Err(ObjectError::NotARecord { key: "name".into(), found: "missing" })
        );
        assert!(matches!(heap.set_path(a, &[], 1), Err(ObjectError::InvalidArgument(_))));
    }
}
