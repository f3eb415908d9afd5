//! Heap Configuration

use serde::{Deserialize, Serialize};

/// Heap configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Longest delegate chain a lookup will walk
    pub max_chain_depth: usize,

    /// Nesting depth rendered by `Heap::describe`
    pub max_describe_depth: usize,

    /// Longest array `Heap::array_set` will pad out to
    pub max_array_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_chain_depth: 1024,
            max_describe_depth: 8,
            max_array_len: 1 << 20,
        }
    }
}
