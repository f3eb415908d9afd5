//! Cloning
//!
//! `extend` copies entries into plain records. Clones own their primitives
//! but share composites with the source until they replace them. Accessors
//! travel as accessors and read the clone's own state.

use crate::show;
use anyhow::Result;
use protochain_core::{Heap, RecordId, Value};

/// `get r() { return Math.sqrt(this.x * this.x + this.y * this.y) }`
fn magnitude(heap: &Heap, this: RecordId) -> protochain_core::Result<Value> {
    let coord = |key: &str| -> protochain_core::Result<f64> {
        Ok(heap.get(this, key)?.and_then(|v| v.as_number()).unwrap_or(f64::NAN))
    };
    let (x, y) = (coord("x")?, coord("y")?);
    Ok(Value::from((x * x + y * y).sqrt()))
}

pub fn run(heap: &mut Heap) -> Result<Vec<String>> {
    let mut out = Vec::new();

    let o = heap.literal([("x", Value::from(1)), ("y", Value::from(1)), ("z", Value::from(1))]);
    heap.define_getter(o, "r", magnitude)?;
    let meta = heap.literal([("name", Value::from("delorean"))]);
    heap.set(o, "meta", Value::Record(meta))?;

    let p = heap.empty();
    let copied = heap.extend(p, o)?;
    let q = heap.clone_record(o)?;
    out.push(format!("{copied} entries copied into p"));
    out.push(format!("x copied into p: {}", show(heap, heap.get(p, "x")?)?));
    out.push(format!("x copied into q: {}", show(heap, heap.get(q, "x")?)?));
    out.push(format!("o is in p's chain: {}", heap.delegates_from(o, p)?));
    out.push(format!("p has a class of: {}", heap.kind_name(p)?));

    // primitives belong to each clone
    heap.set(p, "x", 2)?;
    out.push(format!("q.x after p.x = 2: {}", show(heap, heap.get(q, "x")?)?));

    // the getter was copied as a getter and reads each clone's own x
    out.push(format!("r on p: {}", show(heap, heap.get(p, "r")?)?));
    out.push(format!("r on q: {}", show(heap, heap.get(q, "r")?)?));

    // composites are shared
    out.push(format!("name in p: {}", show(heap, heap.get_path(p, &["meta", "name"])?)?));
    heap.set_path(q, &["meta", "name"], "doc")?;
    out.push(format!("name in p changed: {}", show(heap, heap.get_path(p, &["meta", "name"])?)?));
    out.push(format!("name in o changed: {}", show(heap, heap.get_path(o, &["meta", "name"])?)?));

    // replacing is per clone
    let replacement = heap.literal([("name", Value::from("mcfly"))]);
    heap.set(p, "meta", Value::Record(replacement))?;
    out.push(format!("p.meta.name: {}", show(heap, heap.get_path(p, &["meta", "name"])?)?));
    out.push(format!("q.meta.name is still doc: {}", show(heap, heap.get_path(q, &["meta", "name"])?)?));
    out.push(format!("p: {}", heap.describe(&Value::Record(p))?));

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript() {
        let mut heap = Heap::new();
        let lines = run(&mut heap).unwrap();

        assert_eq!(lines[0], "5 entries copied into p");
        assert!(lines.contains(&"o is in p's chain: false".to_string()));
        assert!(lines.contains(&"p has a class of: Object".to_string()));
        assert!(lines.contains(&"q.x after p.x = 2: 1".to_string()));
        assert!(lines.contains(&format!("r on p: {}", 5f64.sqrt())));
        assert!(lines.contains(&format!("r on q: {}", 2f64.sqrt())));
        assert!(lines.contains(&"name in o changed: doc".to_string()));
        assert!(lines.contains(&"q.meta.name is still doc: doc".to_string()));
        assert_eq!(lines.last().unwrap(), r#"p: {x: 2, y: 1, z: 1, r: [Getter], meta: {name: "mcfly"}}"#);
    }
}
