//! Per-call construction stack used to detect dependency cycles.

use rivet_common::error::{Result, RivetError};
use rivet_common::types::TypeName;

/// Concrete types currently under construction, outermost first.
#[derive(Debug, Default)]
pub struct ConstructionStack {
    detect_cycles: bool,
    chain: Vec<TypeName>,
}

impl ConstructionStack {
    /// Creates an empty stack. With `detect_cycles` off, re-entry is not
    /// checked and a cyclic graph recurses without bound.
    #[must_use]
    pub const fn new(detect_cycles: bool) -> Self {
        Self {
            detect_cycles,
            chain: Vec::new(),
        }
    }

    /// Marks `name` as under construction.
    ///
    /// # Errors
    ///
    /// Returns `CyclicDependency` if `name` is already on the stack.
    pub fn push(&mut self, name: &TypeName) -> Result<()> {
        if self.detect_cycles && self.chain.contains(name) {
            let mut chain: Vec<String> = self.chain.iter().map(ToString::to_string).collect();
            chain.push(name.to_string());
            return Err(RivetError::CyclicDependency { chain });
        }
        self.chain.push(name.clone());
        Ok(())
    }

    /// Marks the innermost type as finished.
    pub fn pop(&mut self) {
        let _ = self.chain.pop();
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.chain.len()
    }
}
