//! Inspection
//!
//! Console-style rendering and serializable snapshots of records.

use crate::record::Slot;
use crate::{Heap, RecordId, Result, Value};
use serde::{Deserialize, Serialize};

/// Own state of one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub id: RecordId,
    pub kind: String,
    pub delegate: Option<RecordId>,
    /// Enumerable own entries in insertion order
    pub entries: Vec<(String, Value)>,
}

impl Heap {
    /// Render a value the way a console would print it.
    ///
    /// Only enumerable own entries are shown. A record or array already
    /// being rendered prints as `[Circular]`.
    pub fn describe(&self, value: &Value) -> Result<String> {
        let mut out = String::new();
        let mut path = Vec::new();
        self.write_value(&mut out, value, &mut path, 0)?;
        Ok(out)
    }

    pub fn snapshot(&self, record: RecordId) -> Result<RecordSnapshot> {
        let rec = self.record(record)?;
        let entries = rec
            .entries()
            .map(|(key, slot)| -> Result<(String, Value)> {
                let value = match slot {
                    Slot::Data(value) => value.clone(),
                    Slot::Getter(getter) => self.call_getter(getter, record, key)?,
                };
                Ok((key.to_string(), value))
            })
            .collect::<Result<_>>()?;

        Ok(RecordSnapshot {
            id: record,
            kind: self.kind_name(record)?.to_string(),
            delegate: rec.delegate(),
            entries,
        })
    }

    /// `path` holds the composites currently being rendered
    fn write_value(
        &self,
        out: &mut String,
        value: &Value,
        path: &mut Vec<Value>,
        depth: usize,
    ) -> Result<()> {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => out.push_str(&format_number(*n)),
            Value::String(s) if depth == 0 => out.push_str(s),
            Value::String(s) => out.push_str(&format!("{s:?}")),
            Value::Callable(id) => {
                out.push_str(&format!("[Function: {}]", self.function_name(*id)?));
            }
            Value::Array(id) => {
                if path.contains(value) {
                    out.push_str("[Circular]");
                    return Ok(());
                }
                let items = self.array_items(*id)?;
                if depth >= self.config().max_describe_depth {
                    out.push_str("[...]");
                    return Ok(());
                }

                path.push(value.clone());
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_value(out, item, path, depth + 1)?;
                }
                out.push(']');
                path.pop();
            }
            Value::Record(id) => self.write_record(out, *id, path, depth)?,
        }
        Ok(())
    }

    fn write_record(
        &self,
        out: &mut String,
        id: RecordId,
        path: &mut Vec<Value>,
        depth: usize,
    ) -> Result<()> {
        let this = Value::Record(id);
        if path.contains(&this) {
            out.push_str("[Circular]");
            return Ok(());
        }
        let record = self.record(id)?;
        if self.constructor_of(id)?.is_some() {
            out.push_str(self.kind_name(id)?);
            out.push(' ');
        }
        if depth >= self.config().max_describe_depth {
            out.push_str("{...}");
            return Ok(());
        }

        path.push(this);
        out.push('{');
        for (i, (key, slot)) in record.entries().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(key);
            out.push_str(": ");
            match slot {
                Slot::Data(value) => self.write_value(out, value, path, depth + 1)?,
                Slot::Getter(_) => out.push_str("[Getter]"),
            }
        }
        out.push('}');
        path.pop();
        Ok(())
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".into() } else { "-Infinity".into() }
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn test_describe_nested() {
        let mut heap = Heap::new();
        let meta = heap.literal([("name", Value::from("doc"))]);
        let list = heap.array([Value::from(1), Value::from(2.5)]);
        let o = heap.literal([
            ("x", Value::from(1)),
            ("meta", Value::Record(meta)),
            ("list", Value::Array(list)),
        ]);

        assert_eq!(
            heap.describe(&Value::Record(o)).unwrap(),
            r#"{x: 1, meta: {name: "doc"}, list: [1, 2.5]}"#
        );
        assert_eq!(heap.describe(&Value::from("plain")).unwrap(), "plain");
        assert_eq!(heap.describe(&Value::Number(f64::NAN)).unwrap(), "NaN");
    }

    #[test]
    fn test_describe_circular_and_depth() {
        let mut heap = Heap::with_config(Config { max_describe_depth: 2, ..Config::default() });
        let o = heap.empty();
        heap.set(o, "me", Value::Record(o)).unwrap();
        assert_eq!(heap.describe(&Value::Record(o)).unwrap(), "{me: [Circular]}");

        let inner = heap.literal([("z", Value::from(3))]);
        let mid = heap.literal([("inner", Value::Record(inner))]);
        let outer = heap.literal([("mid", Value::Record(mid))]);
        assert_eq!(heap.describe(&Value::Record(outer)).unwrap(), "{mid: {inner: {...}}}");
    }

    #[test]
    fn test_describe_self_containing_array() {
        let mut heap = Heap::with_config(Config { max_describe_depth: usize::MAX, ..Config::default() });
        let arr = heap.array([Value::from(1)]);
        heap.array_push(arr, Value::Array(arr)).unwrap();
        assert_eq!(heap.describe(&Value::Array(arr)).unwrap(), "[1, [Circular]]");

        // the same array twice side by side is not a cycle
        let leaf = heap.array([Value::Bool(true)]);
        let pair = heap.array([Value::Array(leaf), Value::Array(leaf)]);
        assert_eq!(heap.describe(&Value::Array(pair)).unwrap(), "[[true], [true]]");

        // cycles through a record inside the array
        let holder = heap.empty();
        let list = heap.array([Value::Record(holder)]);
        heap.set(holder, "list", Value::Array(list)).unwrap();
        assert_eq!(heap.describe(&Value::Array(list)).unwrap(), "[{list: [Circular]}]");
    }

    #[test]
    fn test_accessors_render_and_snapshot() {
        let mut heap = Heap::new();
        let o = heap.literal([("x", Value::from(3))]);
        heap.define_getter(o, "r", |heap, this| Ok(heap.get(this, "x")?.unwrap_or(Value::Null)))
            .unwrap();

        assert_eq!(heap.describe(&Value::Record(o)).unwrap(), "{x: 3, r: [Getter]}");
        let snap = heap.snapshot(o).unwrap();
        assert_eq!(snap.entries[1], ("r".to_string(), Value::from(3)));
    }

    #[test]
    fn test_describe_instances_and_functions() {
        let mut heap = Heap::new();
        let ctor = heap
            .define_constructor("Range", |heap, this, args| {
                heap.set(this, "from", args[0].clone())?;
                heap.set(this, "to", args[1].clone())
            })
            .unwrap();
        let proto = heap.constructor_prototype(ctor).unwrap();
        let f = heap.function("toString", |_, _, _| Ok(Value::Null));
        heap.set(proto, "toString", Value::Callable(f)).unwrap();

        let r = heap.construct(ctor, &[Value::from(1), Value::from(3)]).unwrap();
        assert_eq!(heap.describe(&Value::Record(r)).unwrap(), "Range {from: 1, to: 3}");
        assert_eq!(
            heap.describe(&Value::Record(proto)).unwrap(),
            "{toString: [Function: toString]}"
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut heap = Heap::new();
        let p = heap.literal([("x", Value::from(1))]);
        let a = heap.create_with(&Value::Record(p), [("y", Value::from("two"))]).unwrap();

        let snap = heap.snapshot(a).unwrap();
        assert_eq!(snap.delegate, Some(p));
        assert_eq!(snap.kind, "Object");

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["entries"][0][0], "y");
        assert_eq!(json["entries"][0][1]["String"], "two");
    }
}
