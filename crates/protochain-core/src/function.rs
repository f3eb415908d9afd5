//! Native Functions
//!
//! Callables are values like any other. Stored on a prototype they become
//! shared methods; `invoke` finds them through the chain and binds `this`.
//! Getters are read-only and run during lookup, so they only see a shared
//! heap.

use crate::record::Slot;
use crate::{CallableId, Heap, ObjectError, RecordId, Result, Value};
use std::fmt;
use std::rc::Rc;

/// Host function: `(heap, this, args) -> value`
pub type NativeFn = Rc<dyn Fn(&mut Heap, RecordId, &[Value]) -> Result<Value>>;

/// Accessor body: `(heap, receiver) -> value`
pub type GetterFn = Rc<dyn Fn(&Heap, RecordId) -> Result<Value>>;

/// Getters reading other getters nest at most this deep
pub const MAX_GETTER_NESTING: usize = 64;

/// A named callable stored in the heap
#[derive(Clone)]
pub struct NativeFunction {
    name: Box<str>,
    func: NativeFn,
}

impl NativeFunction {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction").field("name", &self.name).finish_non_exhaustive()
    }
}

impl Heap {
    /// Store a callable; wrap the id in `Value::Callable` to attach it
    pub fn function<F>(&mut self, name: &str, func: F) -> CallableId
    where
        F: Fn(&mut Heap, RecordId, &[Value]) -> Result<Value> + 'static,
    {
        let id = CallableId(self.callables.len() as u32);
        self.callables.push(NativeFunction { name: name.into(), func: Rc::new(func) });
        id
    }

    pub fn function_name(&self, id: CallableId) -> Result<&str> {
        Ok(self.callable(id)?.name())
    }

    /// Store a callable as a non-enumerable own entry of `record`
    pub fn define_method<F>(&mut self, record: RecordId, name: &str, func: F) -> Result<CallableId>
    where
        F: Fn(&mut Heap, RecordId, &[Value]) -> Result<Value> + 'static,
    {
        self.record(record)?;
        let id = self.function(name, func);
        self.define(record, name, Value::Callable(id), false)?;
        Ok(id)
    }

    /// `get name() { ... }`: an enumerable accessor entry on `record`
    pub fn define_getter<F>(&mut self, record: RecordId, name: &str, getter: F) -> Result<()>
    where
        F: Fn(&Heap, RecordId) -> Result<Value> + 'static,
    {
        let getter: GetterFn = Rc::new(getter);
        self.record_mut(record)?.define(name, Slot::Getter(getter), true);
        Ok(())
    }

    pub(crate) fn call_getter(&self, getter: &GetterFn, receiver: RecordId, key: &str) -> Result<Value> {
        let depth = self.getter_depth.get();
        if depth >= MAX_GETTER_NESTING {
            tracing::warn!("getter `{}` on {} nested {} deep", key, receiver, depth);
            return Err(ObjectError::GetterTooDeep { key: key.into() });
        }
        self.getter_depth.set(depth + 1);
        let result = getter(self, receiver);
        self.getter_depth.set(depth);
        result
    }

    /// Call with an explicit receiver
    pub fn call(&mut self, callable: CallableId, this: RecordId, args: &[Value]) -> Result<Value> {
        let func = Rc::clone(&self.callable(callable)?.func);
        func(self, this, args)
    }

    /// `this.key(args)`
    pub fn invoke(&mut self, this: RecordId, key: &str, args: &[Value]) -> Result<Value> {
        self.invoke_on(this, this, key, args)
    }

    /// Look `key` up from `holder` but bind `this`, as `super.key(args)` does
    /// when `holder` is the parent prototype.
    pub fn invoke_on(
        &mut self,
        holder: RecordId,
        this: RecordId,
        key: &str,
        args: &[Value],
    ) -> Result<Value> {
        match self.get(holder, key)? {
            Some(Value::Callable(id)) => {
                tracing::trace!("invoking {}.{} on {}", holder, key, this);
                self.call(id, this, args)
            }
            Some(other) => Err(ObjectError::NotCallable { key: key.into(), found: other.type_name() }),
            None => Err(ObjectError::MissingProperty { key: key.into() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn greet(heap: &mut Heap, this: RecordId, _args: &[Value]) -> Result<Value> {
        let name = heap.get(this, "name")?.unwrap_or(Value::Null);
        Ok(Value::from(format!("hello {}", name.as_str().unwrap_or("?"))))
    }

    #[test]
    fn test_method_binds_receiver() {
        let mut heap = Heap::new();
        let methods = heap.empty();
        heap.define_method(methods, "greet", greet).unwrap();

        let doc = heap.create_with(&Value::Record(methods), [("name", Value::from("doc"))]).unwrap();
        let marty = heap.create_with(&Value::Record(methods), [("name", Value::from("marty"))]).unwrap();

        assert_eq!(heap.invoke(doc, "greet", &[]).unwrap(), Value::from("hello doc"));
        assert_eq!(heap.invoke(marty, "greet", &[]).unwrap(), Value::from("hello marty"));
        assert!(!heap.record(methods).unwrap().entries().any(|(k, _)| k == "greet"));
    }

    #[test]
    fn test_invoke_errors() {
        let mut heap = Heap::new();
        let r = heap.literal([("step", Value::from("integer"))]);

        assert_eq!(
            heap.invoke(r, "action", &[]),
            Err(ObjectError::MissingProperty { key: "action".into() })
        );
        assert_eq!(
            heap.invoke(r, "step", &[]),
            Err(ObjectError::NotCallable { key: "step".into(), found: "string" })
        );
    }

    #[test]
    fn test_closures_capture_state() {
        let mut heap = Heap::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let tick = heap.function("tick", move |_, _, args| {
            counter.set(counter.get() + 1);
            Ok(Value::from(args.len() as f64))
        });

        let r = heap.empty();
        assert_eq!(heap.call(tick, r, &[Value::Null, Value::Null]).unwrap(), Value::from(2));
        assert_eq!(calls.get(), 1);
        assert_eq!(heap.function_name(tick).unwrap(), "tick");
    }

    fn magnitude(heap: &Heap, this: RecordId) -> Result<Value> {
        let x = heap.get(this, "x")?.and_then(|v| v.as_number()).unwrap_or(f64::NAN);
        let y = heap.get(this, "y")?.and_then(|v| v.as_number()).unwrap_or(f64::NAN);
        Ok(Value::from((x * x + y * y).sqrt()))
    }

    #[test]
    fn test_getter_reads_receiver() {
        let mut heap = Heap::new();
        let base = heap.literal([("x", Value::from(3)), ("y", Value::from(4))]);
        heap.define_getter(base, "r", magnitude).unwrap();
        let child = heap.create_with(&Value::Record(base), [("x", Value::from(0))]).unwrap();

        assert_eq!(heap.get(base, "r").unwrap(), Some(Value::from(5)));
        assert_eq!(heap.get(child, "r").unwrap(), Some(Value::from(4)));
        assert_eq!(heap.lookup(child, "r").unwrap().owner(), Some(base));

        // own writes shadow the inherited accessor
        heap.set(child, "r", "fixed").unwrap();
        assert_eq!(heap.get(child, "r").unwrap(), Some(Value::from("fixed")));
        assert_eq!(heap.get(base, "r").unwrap(), Some(Value::from(5)));
    }

    #[test]
    fn test_self_referencing_getter_is_bounded() {
        let mut heap = Heap::new();
        let r = heap.empty();
        heap.define_getter(r, "loop", |heap, this| Ok(heap.get(this, "loop")?.unwrap_or(Value::Null)))
            .unwrap();

        assert_eq!(heap.get(r, "loop"), Err(ObjectError::GetterTooDeep { key: "loop".into() }));
        // the nesting counter unwinds after the failure
        heap.define_getter(r, "ok", |_, _| Ok(Value::from(true))).unwrap();
        assert_eq!(heap.get(r, "ok").unwrap(), Some(Value::from(true)));
        assert!(heap.has_in_chain(r, "loop").unwrap());
    }
}
