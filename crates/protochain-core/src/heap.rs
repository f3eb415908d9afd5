//! Heap (arena-based allocation)
//!
//! Owns every record, array, callable and constructor. Nothing is freed;
//! ids stay valid for the lifetime of the heap.

use crate::construct::Constructor;
use crate::function::NativeFunction;
use crate::record::{Record, RecordKind};
use crate::{ArrayId, CallableId, Config, ConstructorId, ObjectError, RecordId, Result, Value};
use std::cell::Cell;

/// Arena owning all objects
#[derive(Debug, Default)]
pub struct Heap {
    records: Vec<Record>,
    arrays: Vec<Vec<Value>>,
    pub(crate) callables: Vec<NativeFunction>,
    pub(crate) constructors: Vec<Constructor>,
    /// Getters currently running
    pub(crate) getter_depth: Cell<usize>,
    config: Config,
}

impl Heap {
    /// Create an empty heap with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of records allocated
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `UnknownRecord` when `id` is past the end of this heap's arena
    pub fn record(&self, id: RecordId) -> Result<&Record> {
        self.records.get(id.0 as usize).ok_or(ObjectError::UnknownRecord(id))
    }

    pub(crate) fn record_mut(&mut self, id: RecordId) -> Result<&mut Record> {
        self.records.get_mut(id.0 as usize).ok_or(ObjectError::UnknownRecord(id))
    }

    pub(crate) fn alloc(&mut self, delegate: Option<RecordId>, kind: RecordKind) -> RecordId {
        let id = RecordId(self.records.len() as u32);
        self.records.push(Record::new(delegate, kind));
        tracing::debug!("allocated {} (delegate: {:?}, kind: {:?})", id, delegate, kind);
        id
    }

    /// Resolve a value that must reference a live record
    pub(crate) fn delegate_target(&self, value: &Value) -> Result<RecordId> {
        match value {
            Value::Record(id) => {
                self.record(*id)?;
                Ok(*id)
            }
            other => Err(ObjectError::invalid(format!(
                "delegate must be a record, got {}",
                other.type_name()
            ))),
        }
    }

    // === Construction ===

    /// `{}`: an empty plain record without a delegate
    pub fn empty(&mut self) -> RecordId {
        self.alloc(None, RecordKind::Plain)
    }

    /// Object literal: a plain record without a delegate
    pub fn literal<K, I>(&mut self, entries: I) -> RecordId
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let id = self.alloc(None, RecordKind::Plain);
        let record = &mut self.records[id.0 as usize];
        for (key, value) in entries {
            record.assign(key.as_ref(), value);
        }
        id
    }

    /// `Object.create(delegate)`
    ///
    /// Fails with `InvalidArgument` unless `delegate` references a record.
    pub fn create(&mut self, delegate: &Value) -> Result<RecordId> {
        let target = self.delegate_target(delegate)?;
        Ok(self.alloc(Some(target), RecordKind::Plain))
    }

    /// Factory style: delegate to shared methods, then store own state
    pub fn create_with<K, I>(&mut self, delegate: &Value, entries: I) -> Result<RecordId>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let id = self.create(delegate)?;
        let record = &mut self.records[id.0 as usize];
        for (key, value) in entries {
            record.assign(key.as_ref(), value);
        }
        Ok(id)
    }

    // === Arrays ===

    /// Allocate an array-like composite
    pub fn array(&mut self, items: impl IntoIterator<Item = Value>) -> ArrayId {
        let id = ArrayId(self.arrays.len() as u32);
        self.arrays.push(items.into_iter().collect());
        id
    }

    pub fn array_items(&self, id: ArrayId) -> Result<&[Value]> {
        self.arrays
            .get(id.0 as usize)
            .map(Vec::as_slice)
            .ok_or(ObjectError::UnknownArray(id))
    }

    /// Element at `index`, `None` past the end
    pub fn array_get(&self, id: ArrayId, index: usize) -> Result<Option<Value>> {
        Ok(self.array_items(id)?.get(index).cloned())
    }

    /// Write in place; writing past the end pads with `null`.
    ///
    /// Growing past `Config::max_array_len` fails with `InvalidArgument`.
    pub fn array_set(&mut self, id: ArrayId, index: usize, value: Value) -> Result<()> {
        let max = self.config.max_array_len;
        let items = self.array_mut(id)?;
        if index >= items.len() {
            let len = index
                .checked_add(1)
                .filter(|len| *len <= max)
                .ok_or_else(|| ObjectError::invalid(format!("array index {index} out of range")))?;
            items.resize(len, Value::Null);
        }
        items[index] = value;
        Ok(())
    }

    pub fn array_push(&mut self, id: ArrayId, value: Value) -> Result<()> {
        self.array_mut(id)?.push(value);
        Ok(())
    }

    fn array_mut(&mut self, id: ArrayId) -> Result<&mut Vec<Value>> {
        self.arrays.get_mut(id.0 as usize).ok_or(ObjectError::UnknownArray(id))
    }

    // === Lookup helpers for other modules ===

    pub(crate) fn callable(&self, id: CallableId) -> Result<&NativeFunction> {
        self.callables.get(id.0 as usize).ok_or(ObjectError::UnknownCallable(id))
    }

    pub(crate) fn constructor(&self, id: ConstructorId) -> Result<&Constructor> {
        self.constructors.get(id.0 as usize).ok_or(ObjectError::UnknownConstructor(id))
    }

    pub(crate) fn constructor_mut(&mut self, id: ConstructorId) -> Result<&mut Constructor> {
        self.constructors.get_mut(id.0 as usize).ok_or(ObjectError::UnknownConstructor(id))
    }
}
