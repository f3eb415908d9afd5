//! Delegation
//!
//! A factory builds range objects on top of one shared methods record.
//! Children created from a range see every later change to the methods and
//! to the range itself, until they shadow a key with their own entry.

use crate::show;
use anyhow::Result;
use protochain_core::{Heap, RecordId, Value};

/// `range(from, to)`: delegate to the shared methods, then own state
fn range(heap: &mut Heap, methods: RecordId, from: i32, to: i32) -> Result<RecordId> {
    let r = heap.create_with(
        &Value::Record(methods),
        [("from", Value::from(from)), ("to", Value::from(to))],
    )?;
    Ok(r)
}

fn range_methods(heap: &mut Heap) -> Result<RecordId> {
    let methods = heap.empty();
    heap.define_method(methods, "toString", |heap, this, _| {
        let from = heap.get(this, "from")?.unwrap_or(Value::Null);
        let to = heap.get(this, "to")?.unwrap_or(Value::Null);
        Ok(Value::from(format!("({}...{})", heap.describe(&from)?, heap.describe(&to)?)))
    })?;
    Ok(methods)
}

pub fn run(heap: &mut Heap) -> Result<Vec<String>> {
    let mut out = Vec::new();

    let methods = range_methods(heap)?;
    let r = range(heap, methods, 1, 3)?;
    let text = heap.invoke(r, "toString", &[])?;
    out.push(format!("r prints as {}", show(heap, Some(text))?));
    out.push(format!("methods is in r's chain: {}", heap.delegates_from(methods, r)?));
    out.push(format!("r has a class of: {}", heap.kind_name(r)?));

    let s = heap.create(&Value::Record(r))?;
    let t = heap.create(&Value::Record(r))?;
    out.push(format!(
        "methods is in the chain of s: {} and of t: {}",
        heap.delegates_from(methods, s)?,
        heap.delegates_from(methods, t)?
    ));
    out.push(format!("r is in s's chain: {}", heap.delegates_from(r, s)?));

    // added after s and t exist
    let action = heap.function("action", |_, _, _| Ok(Value::from("action on the shared methods")));
    heap.set(methods, "action", Value::Callable(action))?;
    let from_r = heap.invoke(r, "action", &[])?;
    let from_s = heap.invoke(s, "action", &[])?;
    out.push(format!("r inherits action: {}", show(heap, Some(from_r))?));
    out.push(format!("s inherits action: {}", show(heap, Some(from_s))?));

    heap.set(r, "step", "integer")?;
    out.push(format!("step found on s through the chain: {}", show(heap, heap.get(s, "step")?)?));

    heap.set(s, "step", "decimal")?;
    out.push(format!("step on s is {}", show(heap, heap.get(s, "step")?)?));
    out.push(format!("step on r is still {}", show(heap, heap.get(r, "step")?)?));
    out.push(format!("t still reads r's step: {}", show(heap, heap.get(t, "step")?)?));

    let r_step = heap.get(r, "step")?.unwrap_or(Value::Null);
    let description = heap.literal([("values", Value::from("from 1 to 3")), ("step", r_step)]);
    heap.set(r, "description", Value::Record(description))?;
    out.push(format!(
        "description seen from s: {}",
        show(heap, heap.get(s, "description")?)?
    ));

    // mutating the shared composite reaches back into r
    let s_step = heap.get(s, "step")?.unwrap_or(Value::Null);
    heap.set_path(s, &["description", "step"], s_step)?;
    out.push(format!(
        "description.step on s: {}",
        show(heap, heap.get_path(s, &["description", "step"])?)?
    ));
    out.push(format!(
        "description.step on r is no longer integer: {}",
        show(heap, heap.get_path(r, &["description", "step"])?)?
    ));

    // replacing only shadows it on s
    heap.set(s, "description", "in roman numerals")?;
    out.push(format!("description on s: {}", show(heap, heap.get(s, "description")?)?));
    out.push(format!(
        "description on r still points to the old record: {}",
        show(heap, heap.get(r, "description")?)?
    ));

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript() {
        let mut heap = Heap::new();
        let lines = run(&mut heap).unwrap();

        assert_eq!(lines[0], "r prints as (1...3)");
        assert!(lines.contains(&"s inherits action: action on the shared methods".to_string()));
        assert!(lines.contains(&"step on r is still integer".to_string()));
        assert!(lines.contains(&"description.step on r is no longer integer: decimal".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            r#"description on r still points to the old record: {values: "from 1 to 3", step: "decimal"}"#
        );
    }
}
