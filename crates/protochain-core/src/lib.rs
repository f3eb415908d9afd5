//! protochain - Records and Delegate Chains
//!
//! An explicit object model for prototype-style property resolution.
//!
//! Features:
//! - Records with ordered own entries and a single immutable delegate link
//! - Chain lookup with cycle and depth guards
//! - Own-only writes (shadowing, never write-through)
//! - Cloning by reference vs. delegation
//! - Constructor, factory and class-style construction helpers
//! - Native methods and read-only getters resolved through the chain
//!
//! # Example
//! ```rust
//! use protochain_core::{Heap, Value};
//!
//! let mut heap = Heap::new();
//! let p = heap.literal([("x", Value::from(1))]);
//! let a = heap.create(&Value::Record(p)).unwrap();
//!
//! assert_eq!(heap.get(a, "x").unwrap(), Some(Value::from(1)));
//! heap.set(a, "x", Value::from(2)).unwrap();
//! assert_eq!(heap.get(p, "x").unwrap(), Some(Value::from(1)));
//! ```

mod clone;
mod config;
mod construct;
mod describe;
mod error;
mod function;
mod heap;
mod record;
mod resolver;
mod value;

pub use config::Config;
pub use construct::{Constructor, Initializer};
pub use describe::RecordSnapshot;
pub use error::{ObjectError, Result};
pub use function::{GetterFn, MAX_GETTER_NESTING, NativeFn, NativeFunction};
pub use heap::Heap;
pub use record::{Property, Record, RecordKind, Slot};
pub use resolver::{Chain, Lookup};
pub use value::{Value, require_number};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Record identifier (index into the heap's record arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub(crate) u32);

/// Array-like composite identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArrayId(pub(crate) u32);

/// Callable identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallableId(pub(crate) u32);

/// Constructor identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstructorId(pub(crate) u32);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record#{}", self.0)
    }
}

impl fmt::Display for ArrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "array#{}", self.0)
    }
}

impl fmt::Display for CallableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "callable#{}", self.0)
    }
}

impl fmt::Display for ConstructorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constructor#{}", self.0)
    }
}
