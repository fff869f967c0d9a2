//! Operator Registry
//!
//! Name → opcode table consulted by the stack machine while building and by
//! the evaluator while rendering. Filled once at startup; after that it is
//! only read.

use crate::nodes;
use crate::operator::{Operator, RenderContext};
use std::collections::HashMap;
use std::fmt;

/// Index of an operator in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpcodeId(pub usize);

impl fmt::Display for OpcodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Operator registry - owns the kernels and resolves names to opcodes
pub struct OperatorRegistry {
    /// Operators in registration order
    operators: Vec<Box<dyn Operator>>,
    /// Opcodes indexed by program name
    by_name: HashMap<String, OpcodeId>,
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl OperatorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            operators: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registry holding every built-in operator
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for op in nodes::builtins() {
            registry.register(op);
        }
        registry
    }

    /// Install an operator under its own name
    ///
    /// Registering a name twice points the name at the newer operator; the
    /// old opcode stays valid for graphs already built with it.
    pub fn register(&mut self, op: Box<dyn Operator>) -> OpcodeId {
        let id = OpcodeId(self.operators.len());
        self.by_name.insert(op.name().to_string(), id);
        self.operators.push(op);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<OpcodeId> {
        self.by_name.get(name).copied()
    }

    /// Get the operator behind an opcode
    ///
    /// Opcodes are only handed out by `register`, so indexing is in bounds
    /// for any id produced by this registry.
    pub fn get(&self, id: OpcodeId) -> &dyn Operator {
        self.operators[id.0].as_ref()
    }

    pub fn arity(&self, id: OpcodeId) -> usize {
        self.get(id).arity()
    }

    pub fn name(&self, id: OpcodeId) -> &str {
        self.get(id).name()
    }

    /// Run an operator over full-length input buffers
    pub fn apply(&self, id: OpcodeId, inputs: &[&[f32]], ctx: &RenderContext) -> Vec<f32> {
        self.get(id).apply(inputs, ctx)
    }

    /// Operators in registration order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Operator> {
        self.operators.iter().map(|op| op.as_ref())
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Help table: one line per operator with name, arity and description
    pub fn describe(&self) -> String {
        let width = self.iter().map(|op| op.name().len()).max().unwrap_or(0);
        let mut out = String::from("Operators:\n");
        for op in self.iter() {
            out.push_str(&format!(
                "  {:<width$}  ({} in)  {}\n",
                op.name(),
                op.arity(),
                op.description(),
                width = width
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::AdditionNode;

    #[test]
    fn test_builtins_are_registered() {
        let registry = OperatorRegistry::with_builtins();
        let expected = [
            ("add", 2),
            ("sub", 2),
            ("mul", 2),
            ("div", 2),
            ("abs", 1),
            ("neg", 1),
            ("gt", 2),
            ("lt", 2),
            ("not", 1),
            ("clip", 1),
            ("log", 1),
            ("exp", 1),
            ("sin", 1),
            ("saw", 1),
            ("lowpass", 2),
            ("adsr", 4),
            ("time", 0),
            ("length", 0),
        ];

        assert_eq!(registry.len(), expected.len());
        for (name, arity) in expected {
            let id = registry
                .lookup(name)
                .unwrap_or_else(|| panic!("{} not registered", name));
            assert_eq!(registry.arity(id), arity, "arity of {}", name);
            assert_eq!(registry.name(id), name);
        }
    }

    #[test]
    fn test_unknown_name() {
        let registry = OperatorRegistry::with_builtins();
        assert!(registry.lookup("reverb").is_none());
        assert!(registry.lookup("dup").is_none());
    }

    #[test]
    fn test_reregistering_replaces_lookup() {
        let mut registry = OperatorRegistry::new();
        assert!(registry.is_empty());

        let first = registry.register(Box::new(AdditionNode));
        let second = registry.register(Box::new(AdditionNode));

        assert_ne!(first, second);
        assert_eq!(registry.lookup("add"), Some(second));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_apply_by_opcode() {
        let registry = OperatorRegistry::with_builtins();
        let add = registry.lookup("add").unwrap();
        let ctx = RenderContext::new(1.0 / 44100.0, 2);

        let a = vec![1.0, 2.0];
        let b = vec![3.0, 4.0];
        let out = registry.apply(add, &[&a, &b], &ctx);

        assert_eq!(out, vec![4.0, 6.0]);
    }

    #[test]
    fn test_describe_lists_every_operator() {
        let registry = OperatorRegistry::with_builtins();
        let help = registry.describe();

        for op in registry.iter() {
            assert!(help.contains(op.name()));
            assert!(help.contains(op.description()));
        }
        assert!(help.contains("(4 in)"));
    }
}
