//! Cloning vs. Delegation
//!
//! Cloning copies every enumerable own entry into another record, taking
//! composite values by reference. The copy has no delegate link to the
//! source, so own writes on either side stay independent while mutations
//! inside a shared composite are seen by both until one side replaces it.

use crate::record::{RecordKind, Slot};
use crate::{Heap, RecordId, Result};

impl Heap {
    /// Copy `source`'s enumerable own entries into `target`.
    ///
    /// Keys `target` can already resolve, own or inherited, are skipped.
    /// Accessors are copied as accessors.
    /// Returns the number of entries copied.
    pub fn extend(&mut self, target: RecordId, source: RecordId) -> Result<usize> {
        let entries: Vec<(Box<str>, Slot)> = self
            .record(source)?
            .entries()
            .map(|(key, slot)| (key.into(), slot.clone()))
            .collect();

        let mut copied = 0;
        for (key, slot) in entries {
            if self.has_in_chain(target, &key)? {
                continue;
            }
            self.record_mut(target)?.define(&key, slot, true);
            copied += 1;
        }
        tracing::debug!("extended {} with {} entries of {}", target, copied, source);
        Ok(copied)
    }

    /// A fresh plain record holding `source`'s enumerable own entries
    pub fn clone_record(&mut self, source: RecordId) -> Result<RecordId> {
        self.record(source)?;
        let target = self.alloc(None, RecordKind::Plain);
        self.extend(target, source)?;
        Ok(target)
    }
}
