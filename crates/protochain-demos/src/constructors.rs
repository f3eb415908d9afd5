//! Constructor Functions
//!
//! Instances delegate to `Ctor.prototype`. Replacing the prototype leaves
//! old instances on the old record; constructor input is validated before
//! any state is stored.

use crate::show;
use anyhow::Result;
use protochain_core::{ConstructorId, Heap, ObjectError, Value, require_number};

fn define_range(heap: &mut Heap) -> Result<ConstructorId> {
    let range = heap.define_constructor("Range", |heap, this, args| {
        heap.set(this, "from", args.first().cloned().unwrap_or(Value::Null))?;
        heap.set(this, "to", args.get(1).cloned().unwrap_or(Value::Null))
    })?;

    // extend the prototype rather than overwrite it
    let proto = heap.constructor_prototype(range)?;
    let to_string = heap.function("toString", |heap, this, _| {
        let from = heap.get(this, "from")?.unwrap_or(Value::Null);
        let to = heap.get(this, "to")?.unwrap_or(Value::Null);
        Ok(Value::from(format!("({}...{})", heap.describe(&from)?, heap.describe(&to)?)))
    });
    heap.set(proto, "toString", Value::Callable(to_string))?;
    Ok(range)
}

fn define_complex(heap: &mut Heap) -> Result<ConstructorId> {
    let complex = heap.define_constructor("Complex", |heap, this, args| {
        let real = require_number(args, 0, "real")?;
        let imaginary = require_number(args, 1, "imaginary")?;
        heap.set(this, "r", real)?;
        heap.set(this, "i", imaginary)?;
        let representation = heap.literal([("x", Value::from(real)), ("y", Value::from(imaginary))]);
        heap.set(this, "representation", Value::Record(representation))
    })?;

    let proto = heap.constructor_prototype(complex)?;
    heap.define_method(proto, "equals", |heap, this, args| {
        let Some(that) = args.first().and_then(Value::as_record) else {
            return Ok(Value::from(false));
        };
        let equal = heap.same_kind(this, that)?
            && heap.get(this, "r")? == heap.get(that, "r")?
            && heap.get(this, "i")? == heap.get(that, "i")?;
        Ok(Value::from(equal))
    })?;
    Ok(complex)
}

fn prototype_replacement(heap: &mut Heap, out: &mut Vec<String>) -> Result<()> {
    let range = define_range(heap)?;
    let r = heap.construct(range, &[Value::from(1), Value::from(3)])?;
    let text = heap.invoke(r, "toString", &[])?;
    out.push(format!("r prints as {}", show(heap, Some(text))?));
    out.push(format!("r instanceof Range: {}", heap.instance_of(r, range)?));
    out.push(format!("r has a class of: {}", heap.kind_name(r)?));

    // Range.prototype = { ... }
    let replacement = heap.literal([("kind", Value::from("replaced"))]);
    heap.replace_prototype(range, &Value::Record(replacement))?;
    let r2 = heap.construct(range, &[Value::from(4), Value::from(6)])?;

    out.push(format!("r instanceof Range after replacing the prototype: {}", heap.instance_of(r, range)?));
    out.push(format!("r2 instanceof Range: {}", heap.instance_of(r2, range)?));
    let text = heap.invoke(r, "toString", &[])?;
    out.push(format!("r still finds toString: {}", show(heap, Some(text))?));
    out.push(format!("r2 finds toString: {}", heap.has_in_chain(r2, "toString")?));
    out.push(format!("r2.kind: {}", show(heap, heap.get(r2, "kind")?)?));
    Ok(())
}

fn instance_state(heap: &mut Heap, out: &mut Vec<String>) -> Result<()> {
    let complex = define_complex(heap)?;

    match heap.construct(complex, &[Value::from("two"), Value::from(3)]) {
        Err(e @ ObjectError::InvalidArgument(_)) => out.push(format!("new Complex(\"two\", 3) rejected: {e}")),
        Err(e) => return Err(e.into()),
        Ok(_) => anyhow::bail!("Complex accepted a string"),
    }

    let c = heap.construct(complex, &[Value::from(2), Value::from(3)])?;
    let d = heap.construct(complex, &[Value::from(3), Value::from(2)])?;
    out.push(format!("c instanceof Complex: {}", heap.instance_of(c, complex)?));
    out.push(format!("d instanceof Complex: {}", heap.instance_of(d, complex)?));

    heap.set(d, "r", 10)?;
    out.push(format!("d.r changed, c.r did not: {}", show(heap, heap.get(c, "r")?)?));

    let i = heap.literal([("value", Value::from(10)), ("identifier", Value::from("i"))]);
    heap.set(d, "i", Value::Record(i))?;
    out.push(format!("identifier on d: {}", show(heap, heap.get_path(d, &["i", "identifier"])?)?));
    out.push(format!("identifier on c: {}", show(heap, heap.get_path(c, &["i", "identifier"])?)?));

    heap.set(d, "own", "complex number")?;
    out.push(format!("d.own: {}", show(heap, heap.get(d, "own")?)?));
    out.push(format!("c.own: {}", show(heap, heap.get(c, "own")?)?));

    // each instance got its own representation record
    heap.set_path(d, &["representation", "x"], 100)?;
    out.push(format!(
        "representation.x on c after d's mutation: {}",
        show(heap, heap.get_path(c, &["representation", "x"])?)?
    ));

    let own_action = heap.function("action", |_, _, _| Ok(Value::from("from the instance")));
    heap.set(d, "action", Value::Callable(own_action))?;
    let proto = heap.constructor_prototype(complex)?;
    let shared_action = heap.function("action", |_, _, _| Ok(Value::from("from the prototype")));
    heap.set(proto, "action", Value::Callable(shared_action))?;

    let on_d = heap.invoke(d, "action", &[])?;
    let on_c = heap.invoke(c, "action", &[])?;
    out.push(format!("action on d: {}", show(heap, Some(on_d))?));
    out.push(format!("action on c: {}", show(heap, Some(on_c))?));

    let twin = heap.construct(complex, &[Value::from(2), Value::from(3)])?;
    let lookalike = heap.literal([("r", Value::from(2)), ("i", Value::from(3))]);
    let same = heap.invoke(c, "equals", &[Value::Record(twin)])?;
    let plain = heap.invoke(c, "equals", &[Value::Record(lookalike)])?;
    out.push(format!("c equals a new Complex(2, 3): {}", show(heap, Some(same))?));
    out.push(format!("c equals a plain {{r: 2, i: 3}}: {}", show(heap, Some(plain))?));
    Ok(())
}

pub fn run(heap: &mut Heap) -> Result<Vec<String>> {
    let mut out = Vec::new();
    prototype_replacement(heap, &mut out)?;
    instance_state(heap, &mut out)?;
    Ok(out)
}
