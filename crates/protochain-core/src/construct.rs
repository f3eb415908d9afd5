//! Constructors and Classes
//!
//! A constructor is a name, a prototype record and an optional initializer.
//! Constructor functions, factories and `class ... extends` all reduce to
//! records delegating to a prototype; the only extra state is the
//! `RecordKind::Instance` tag written at construction time.

use crate::record::RecordKind;
use crate::{ConstructorId, Heap, ObjectError, RecordId, Result, Value};
use std::fmt;
use std::rc::Rc;

/// Instance initializer: `(heap, this, args)`
pub type Initializer = Rc<dyn Fn(&mut Heap, RecordId, &[Value]) -> Result<()>>;

/// A named constructor and its prototype
#[derive(Clone)]
pub struct Constructor {
    name: Box<str>,
    prototype: RecordId,
    parent: Option<ConstructorId>,
    init: Option<Initializer>,
}

impl Constructor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prototype given to instances created from now on
    pub fn prototype(&self) -> RecordId {
        self.prototype
    }

    pub fn parent(&self) -> Option<ConstructorId> {
        self.parent
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("name", &self.name)
            .field("prototype", &self.prototype)
            .field("parent", &self.parent)
            .field("init", &self.init.is_some())
            .finish()
    }
}

impl Heap {
    /// `class Name extends Parent {}`
    ///
    /// The new prototype delegates to the parent's current prototype.
    pub fn define_class(&mut self, name: &str, parent: Option<ConstructorId>) -> Result<ConstructorId> {
        if name.trim().is_empty() {
            return Err(ObjectError::invalid("constructor name must not be empty"));
        }
        let parent_proto = match parent {
            Some(p) => Some(self.constructor(p)?.prototype),
            None => None,
        };

        let prototype = self.alloc(parent_proto, RecordKind::Plain);
        let id = ConstructorId(self.constructors.len() as u32);
        self.constructors.push(Constructor { name: name.into(), prototype, parent, init: None });
        tracing::debug!("defined {} `{}` (prototype {}, parent {:?})", id, name, prototype, parent);
        Ok(id)
    }

    /// `function Name(args) { this.x = ... }`
    pub fn define_constructor<F>(&mut self, name: &str, init: F) -> Result<ConstructorId>
    where
        F: Fn(&mut Heap, RecordId, &[Value]) -> Result<()> + 'static,
    {
        let id = self.define_class(name, None)?;
        self.set_initializer(id, init)?;
        Ok(id)
    }

    pub fn set_initializer<F>(&mut self, ctor: ConstructorId, init: F) -> Result<()>
    where
        F: Fn(&mut Heap, RecordId, &[Value]) -> Result<()> + 'static,
    {
        self.constructor_mut(ctor)?.init = Some(Rc::new(init));
        Ok(())
    }

    pub fn constructor_info(&self, ctor: ConstructorId) -> Result<&Constructor> {
        self.constructor(ctor)
    }

    pub fn constructor_prototype(&self, ctor: ConstructorId) -> Result<RecordId> {
        Ok(self.constructor(ctor)?.prototype)
    }

    /// `Name.prototype = {...}`
    ///
    /// Only instances created afterwards see the new prototype; existing
    /// delegate links are left alone.
    pub fn replace_prototype(&mut self, ctor: ConstructorId, prototype: &Value) -> Result<()> {
        let target = self.delegate_target(prototype)?;
        let old = std::mem::replace(&mut self.constructor_mut(ctor)?.prototype, target);
        tracing::debug!("{} prototype replaced: {} -> {}", ctor, old, target);
        Ok(())
    }

    /// `new Name(args)`
    ///
    /// Initializers run from the root class down to `ctor`, each with the
    /// same arguments. The first failing initializer aborts construction.
    pub fn construct(&mut self, ctor: ConstructorId, args: &[Value]) -> Result<RecordId> {
        let prototype = self.constructor(ctor)?.prototype;

        let mut lineage = Vec::new();
        let mut current = Some(ctor);
        while let Some(id) = current {
            let info = self.constructor(id)?;
            if let Some(init) = &info.init {
                lineage.push(Rc::clone(init));
            }
            current = info.parent;
        }

        let instance = self.alloc(Some(prototype), RecordKind::Instance(ctor));
        for init in lineage.iter().rev() {
            init(self, instance, args)?;
        }
        Ok(instance)
    }

    /// `record instanceof ctor`: is the constructor's current prototype in
    /// the record's chain?
    pub fn instance_of(&self, record: RecordId, ctor: ConstructorId) -> Result<bool> {
        let prototype = self.constructor(ctor)?.prototype;
        self.delegates_from(prototype, record)
    }

    /// Constructor that built `record`, if any
    pub fn constructor_of(&self, record: RecordId) -> Result<Option<ConstructorId>> {
        Ok(match self.record(record)?.kind() {
            RecordKind::Instance(ctor) => Some(ctor),
            RecordKind::Plain => None,
        })
    }

    /// Class name of `record`; `"Object"` for plain records
    pub fn kind_name(&self, record: RecordId) -> Result<&str> {
        match self.constructor_of(record)? {
            Some(ctor) => Ok(self.constructor(ctor)?.name()),
            None => Ok("Object"),
        }
    }

    /// Same construction tag, as an `equals` type check
    pub fn same_kind(&self, a: RecordId, b: RecordId) -> Result<bool> {
        Ok(self.record(a)?.kind() == self.record(b)?.kind())
    }
}
