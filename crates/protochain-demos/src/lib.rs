//! protochain Demos
//!
//! Walkthroughs of the object model, one transcript line per observation:
//! - delegation: factory objects sharing methods through `create`
//! - cloning: copying entries by reference with `extend`
//! - constructors: constructor functions, prototype replacement, validation
//! - classes: `extends`, overriding and super calls

pub mod classes;
pub mod cloning;
pub mod constructors;
pub mod delegation;

use anyhow::{Context, Result};
use protochain_core::{Config, Heap, Value};
use serde::Serialize;

/// A demo body: runs against a fresh heap and returns its transcript lines
pub type DemoFn = fn(&mut Heap) -> Result<Vec<String>>;

/// Registered demos, in the order `run_all` plays them
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Demo {
    Delegation,
    Cloning,
    Constructors,
    Classes,
}

impl Demo {
    pub const ALL: [Demo; 4] = [Demo::Delegation, Demo::Cloning, Demo::Constructors, Demo::Classes];

    pub fn name(self) -> &'static str {
        match self {
            Demo::Delegation => "delegation",
            Demo::Cloning => "cloning",
            Demo::Constructors => "constructors",
            Demo::Classes => "classes",
        }
    }

    fn body(self) -> DemoFn {
        match self {
            Demo::Delegation => delegation::run,
            Demo::Cloning => cloning::run,
            Demo::Constructors => constructors::run,
            Demo::Classes => classes::run,
        }
    }
}

/// Output of one demo
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub demo: &'static str,
    pub lines: Vec<String>,
}

/// Run one demo against a fresh heap
pub fn run_demo(demo: Demo, config: &Config) -> Result<Transcript> {
    let name = demo.name();
    tracing::info!("running demo `{}`", name);
    let mut heap = Heap::with_config(config.clone());
    let lines = (demo.body())(&mut heap).with_context(|| format!("demo `{name}` failed"))?;
    tracing::debug!("demo `{}` allocated {} records", name, heap.len());
    Ok(Transcript { demo: name, lines })
}

/// Run every demo in order
pub fn run_all(config: &Config) -> Result<Vec<Transcript>> {
    Demo::ALL.into_iter().map(|demo| run_demo(demo, config)).collect()
}

/// Render a lookup result; a miss prints as `undefined`
pub(crate) fn show(heap: &Heap, value: Option<Value>) -> Result<String> {
    match value {
        Some(value) => Ok(heap.describe(&value)?),
        None => Ok("undefined".to_string()),
    }
}
