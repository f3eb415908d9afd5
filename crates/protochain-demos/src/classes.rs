//! Classes
//!
//! `class Dog extends Animal`: the subclass prototype delegates to the
//! parent prototype, so overriding is shadowing one level up the chain.

use crate::show;
use anyhow::Result;
use protochain_core::{ConstructorId, Heap, RecordId, Value};

fn name_of(heap: &Heap, this: RecordId) -> protochain_core::Result<String> {
    let name = heap.get(this, "name")?.unwrap_or(Value::Null);
    heap.describe(&name)
}

struct Hierarchy {
    animal: ConstructorId,
    dog: ConstructorId,
    noisy_dog: ConstructorId,
    puppy: ConstructorId,
}

fn define_hierarchy(heap: &mut Heap) -> Result<Hierarchy> {
    let animal = heap.define_constructor("Animal", |heap, this, args| {
        heap.set(this, "name", args.first().cloned().unwrap_or(Value::Null))
    })?;
    let animal_proto = heap.constructor_prototype(animal)?;
    heap.define_method(animal_proto, "speak", |heap, this, _| {
        Ok(Value::from(format!("{} makes a noise.", name_of(heap, this)?)))
    })?;

    // override
    let dog = heap.define_class("Dog", Some(animal))?;
    let dog_proto = heap.constructor_prototype(dog)?;
    heap.define_method(dog_proto, "speak", |heap, this, _| {
        Ok(Value::from(format!("{} barks.", name_of(heap, this)?)))
    })?;

    // override calling super.speak()
    let noisy_dog = heap.define_class("NoisyDog", Some(animal))?;
    let noisy_proto = heap.constructor_prototype(noisy_dog)?;
    heap.define_method(noisy_proto, "speak", move |heap, this, args| {
        let base = heap.invoke_on(animal_proto, this, "speak", args)?;
        let base = base.as_str().unwrap_or_default().to_string();
        Ok(Value::from(format!("{base} {} barks.", name_of(heap, this)?)))
    })?;

    // two levels down, adds a method of its own
    let puppy = heap.define_class("Puppy", Some(dog))?;
    let puppy_proto = heap.constructor_prototype(puppy)?;
    heap.define_method(puppy_proto, "greet", |_, _, _| Ok(Value::from("wags its tail")))?;

    Ok(Hierarchy { animal, dog, noisy_dog, puppy })
}

pub fn run(heap: &mut Heap) -> Result<Vec<String>> {
    let mut out = Vec::new();
    let classes = define_hierarchy(heap)?;

    let generic = heap.construct(classes.animal, &[Value::from("Doc")])?;
    let dog = heap.construct(classes.dog, &[Value::from("Marty")])?;
    let noisy = heap.construct(classes.noisy_dog, &[Value::from("Mitzie")])?;
    let puppy = heap.construct(classes.puppy, &[Value::from("McFly")])?;

    for id in [generic, dog, noisy, puppy] {
        let said = heap.invoke(id, "speak", &[])?;
        out.push(format!("{}: {}", heap.kind_name(id)?, show(heap, Some(said))?));
    }

    let greeting = heap.invoke(puppy, "greet", &[])?;
    out.push(format!("puppy greets: {}", show(heap, Some(greeting))?));
    out.push(format!("dog can greet: {}", heap.has_in_chain(dog, "greet")?));

    out.push(format!("puppy instanceof Dog: {}", heap.instance_of(puppy, classes.dog)?));
    out.push(format!("puppy instanceof Animal: {}", heap.instance_of(puppy, classes.animal)?));
    out.push(format!("noisy instanceof Dog: {}", heap.instance_of(noisy, classes.dog)?));

    let owner = heap.lookup(puppy, "speak")?.owner();
    let dog_proto = heap.constructor_prototype(classes.dog)?;
    out.push(format!("puppy's speak comes from Dog.prototype: {}", owner == Some(dog_proto)));
    out.push(format!("methods are not enumerable: {}", heap.describe(&Value::Record(dog_proto))?));
    out.push(format!("puppy prints as {}", heap.describe(&Value::Record(puppy))?));

    Ok(out)
}
