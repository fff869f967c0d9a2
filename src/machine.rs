//! Stack machine - compiles a token stream into a signal graph
//!
//! Tokens are executed left to right against an operand stack of graph
//! nodes. Execution never computes audio; it only wires nodes together.
//!
//! ```text
//! 440 sin 0.5 mul        -- mul(sin(440), 0.5)
//! 3 %1                   -- move the value 1 below the top to the top
//! [ 2 mul ] @double      -- bind an unexecuted token list
//! 110 double sin         -- replays "2 mul": sin(mul(110, 2))
//! ```
//!
//! A list (`[ ... ]`) records a token range instead of executing it. It is
//! replayed, against the live stack, whenever it is referenced through a
//! variable or popped as an operator argument. Each replay builds fresh
//! nodes; only the operands it consumes are shared.

use crate::error::{Error, Result};
use crate::graph::{Node, NodeKind, NodeRef};
use crate::registry::OperatorRegistry;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Implementation bounds on program size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of tokens in a program
    pub max_tokens: usize,
    /// Maximum length of a single token in bytes
    pub max_token_len: usize,
    /// Maximum operand stack depth
    pub max_stack: usize,
    /// Maximum list replays, both nested and chained within one pop
    pub max_replay_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            max_token_len: 80,
            max_stack: 256,
            max_replay_depth: 256,
        }
    }
}

/// Open list capture
///
/// Brackets nest: an inner `[` raises `depth` and only the `]` that brings it
/// back to zero ends the capture. A single open/closed flag would instead end
/// the list at the first `]`, leaving the rest of an inner list to execute.
#[derive(Debug, Clone, Copy)]
struct Capture {
    /// Index of the outermost `[`
    open: usize,
    /// Bracket nesting depth inside the capture
    depth: usize,
}

/// Per-program interpreter state
#[derive(Debug, Default)]
pub struct Environment {
    stack: Vec<NodeRef>,
    variables: HashMap<String, NodeRef>,
    capture: Option<Capture>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operand stack, bottom first
    pub fn stack(&self) -> &[NodeRef] {
        &self.stack
    }

    /// Node bound to `name`, if any
    pub fn variable(&self, name: &str) -> Option<&NodeRef> {
        self.variables.get(name)
    }
}

/// Graph builder for one program
///
/// Tokens fed through [`Machine::run`] are appended to one buffer, so list
/// ranges recorded by an earlier `run` stay valid in later ones.
pub struct Machine<'r> {
    registry: &'r OperatorRegistry,
    limits: Limits,
    env: Environment,
    tokens: Vec<String>,
    replay_depth: usize,
}

impl<'r> Machine<'r> {
    pub fn new(registry: &'r OperatorRegistry) -> Self {
        Self::with_limits(registry, Limits::default())
    }

    pub fn with_limits(registry: &'r OperatorRegistry, limits: Limits) -> Self {
        Self {
            registry,
            limits,
            env: Environment::new(),
            tokens: Vec::new(),
            replay_depth: 0,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Operand stack, bottom first
    pub fn stack(&self) -> &[NodeRef] {
        self.env.stack()
    }

    /// Every token executed so far
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Execute every token, leaving results on the stack
    pub fn run(&mut self, tokens: &[String]) -> Result<()> {
        let begin = self.tokens.len();
        self.tokens.extend_from_slice(tokens);
        for index in begin..self.tokens.len() {
            self.step(index)?;
        }

        if let Some(capture) = self.env.capture {
            return Err(Error::UnterminatedList {
                index: capture.open,
            });
        }
        Ok(())
    }

    /// Execute the program and return its single result as the graph root
    pub fn build(mut self, tokens: &[String]) -> Result<NodeRef> {
        self.run(tokens)?;
        if self.tokens.is_empty() {
            return Err(Error::EmptyProgram);
        }

        let depth = self.env.stack.len();
        if depth != 1 {
            return Err(Error::UnbalancedStack { depth });
        }

        // A list left as the result is replayed like any other argument
        let root = self.pop_forced("<end>", self.tokens.len())?;
        if !self.env.stack.is_empty() {
            return Err(Error::UnbalancedStack {
                depth: self.env.stack.len() + 1,
            });
        }

        debug!(
            tokens = self.tokens.len(),
            variables = self.env.variables.len(),
            "built signal graph"
        );
        Ok(root)
    }

    fn step(&mut self, index: usize) -> Result<()> {
        let token = self.tokens[index].clone();
        let token = token.as_str();

        if let Some(capture) = self.env.capture.as_mut() {
            match token {
                "[" => capture.depth += 1,
                "]" => {
                    capture.depth -= 1;
                    if capture.depth == 0 {
                        let start = capture.open + 1;
                        self.env.capture = None;
                        self.push(Node::list(start, index - start), token, index)?;
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        trace!(index, token, depth = self.env.stack.len(), "exec");

        if let Ok(value) = token.parse::<f32>() {
            return self.push(Node::constant(value), token, index);
        }

        match token {
            "[" => {
                self.env.capture = Some(Capture {
                    open: index,
                    depth: 1,
                });
                Ok(())
            }
            "]" => Err(Error::UnmatchedClose { index }),
            _ if token.starts_with('@') => self.bind(&token[1..], token, index),
            _ if token.starts_with('%') => self.reorder(&token[1..], token, index),
            "dup" => {
                let top = self
                    .env
                    .stack
                    .last()
                    .cloned()
                    .ok_or_else(|| Self::underflow(token, index))?;
                self.push(top, token, index)
            }
            _ => self.call(token, index),
        }
    }

    /// `@name`: bind the top value without replaying it
    fn bind(&mut self, name: &str, token: &str, index: usize) -> Result<()> {
        if name.is_empty() {
            return Err(Error::EmptyBinding { index });
        }
        let node = self.pop(token, index)?;
        self.env.variables.insert(name.to_string(), node);
        Ok(())
    }

    /// `%n`: move the value `n` below the top to the top
    fn reorder(&mut self, arg: &str, token: &str, index: usize) -> Result<()> {
        let n: usize = arg.parse().map_err(|_| Error::InvalidReorder {
            token: token.to_string(),
            index,
        })?;

        let depth = self.env.stack.len();
        if n >= depth {
            return Err(Error::ReorderOutOfRange {
                token: token.to_string(),
                index,
                depth,
            });
        }

        let node = self.env.stack.remove(depth - 1 - n);
        self.env.stack.push(node);
        Ok(())
    }

    /// Variable reference or operator application
    fn call(&mut self, token: &str, index: usize) -> Result<()> {
        if let Some(node) = self.env.variables.get(token).cloned() {
            let (start, count) = match *node.kind() {
                NodeKind::ListThunk { start, count } => (start, count),
                _ => return self.push(node, token, index),
            };

            // A replay that leaves a list on top is forced down to a value
            self.replay(start, count, token, index)?;
            if self.env.stack.last().is_some_and(|top| top.is_list()) {
                let value = self.pop_forced(token, index)?;
                self.push(value, token, index)?;
            }
            return Ok(());
        }

        let opcode = self
            .registry
            .lookup(token)
            .ok_or_else(|| Error::UnknownToken {
                token: token.to_string(),
                index,
            })?;

        let arity = self.registry.arity(opcode);
        let mut inputs = Vec::with_capacity(arity);
        for _ in 0..arity {
            inputs.push(self.pop_forced(token, index)?);
        }
        // Popped last-argument-first: `a b sub` is sub(a, b)
        inputs.reverse();

        self.push(Node::operator(opcode, inputs), token, index)
    }

    /// Pop a value, replaying lists until a non-list node comes off the stack
    fn pop_forced(&mut self, token: &str, index: usize) -> Result<NodeRef> {
        let mut expansions = 0;
        loop {
            let node = self.pop(token, index)?;
            let (start, count) = match *node.kind() {
                NodeKind::ListThunk { start, count } => (start, count),
                _ => return Ok(node),
            };

            expansions += 1;
            if expansions > self.limits.max_replay_depth {
                return Err(self.replay_limit(token, index));
            }
            self.replay(start, count, token, index)?;
        }
    }

    /// Execute the recorded range `start..start + count` against the live stack
    fn replay(&mut self, start: usize, count: usize, token: &str, index: usize) -> Result<()> {
        if self.replay_depth >= self.limits.max_replay_depth {
            return Err(self.replay_limit(token, index));
        }

        self.replay_depth += 1;
        let result = (start..start + count).try_for_each(|i| self.step(i));
        self.replay_depth -= 1;
        result
    }

    fn push(&mut self, node: NodeRef, token: &str, index: usize) -> Result<()> {
        if self.env.stack.len() >= self.limits.max_stack {
            return Err(Error::StackOverflow {
                token: token.to_string(),
                index,
                limit: self.limits.max_stack,
            });
        }
        self.env.stack.push(node);
        Ok(())
    }

    fn pop(&mut self, token: &str, index: usize) -> Result<NodeRef> {
        self.env
            .stack
            .pop()
            .ok_or_else(|| Self::underflow(token, index))
    }

    fn underflow(token: &str, index: usize) -> Error {
        Error::StackUnderflow {
            token: token.to_string(),
            index,
        }
    }

    fn replay_limit(&self, token: &str, index: usize) -> Error {
        Error::ReplayLimit {
            token: token.to_string(),
            index,
            limit: self.limits.max_replay_depth,
        }
    }
}

/// Build the graph for `tokens` with default limits
pub fn build(registry: &OperatorRegistry, tokens: &[String]) -> Result<NodeRef> {
    Machine::new(registry).build(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::count_reachable;
    use crate::registry::OpcodeId;
    use std::rc::Rc;

    fn same_node(a: &NodeRef, b: &NodeRef) -> bool {
        Rc::ptr_eq(a, b)
    }

    fn tokens(program: &str) -> Vec<String> {
        program.split_whitespace().map(str::to_string).collect()
    }

    fn run(registry: &OperatorRegistry, program: &str) -> Result<Vec<NodeRef>> {
        let mut machine = Machine::new(registry);
        machine.run(&tokens(program))?;
        Ok(machine.stack().to_vec())
    }

    fn constant(node: &NodeRef) -> f32 {
        match node.kind() {
            NodeKind::Constant(v) => *v,
            other => panic!("expected constant, got {:?}", other),
        }
    }

    fn opcode_of(node: &NodeRef) -> &OpcodeId {
        match node.kind() {
            NodeKind::Operator { opcode, .. } => opcode,
            other => panic!("expected operator, got {:?}", other),
        }
    }

    fn values(stack: &[NodeRef]) -> Vec<f32> {
        stack.iter().map(constant).collect()
    }

    #[test]
    fn test_literals_push_constants() {
        let registry = OperatorRegistry::with_builtins();
        let stack = run(&registry, "1 -2.5 3e2").unwrap();
        assert_eq!(values(&stack), vec![1.0, -2.5, 300.0]);
    }

    #[test]
    fn test_reorder_moves_deep_value_to_top() {
        let registry = OperatorRegistry::with_builtins();
        let stack = run(&registry, "1 2 3 %2").unwrap();
        assert_eq!(values(&stack), vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_reorder_one_swaps() {
        let registry = OperatorRegistry::with_builtins();
        let stack = run(&registry, "1 2 3 %1").unwrap();
        assert_eq!(values(&stack), vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn test_reorder_zero_is_identity() {
        let registry = OperatorRegistry::with_builtins();
        let stack = run(&registry, "1 2 3 4 %0").unwrap();
        assert_eq!(values(&stack), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_reorder_keeps_node_identity() {
        let registry = OperatorRegistry::with_builtins();
        let mut machine = Machine::new(&registry);
        machine.run(&tokens("1 2")).unwrap();
        let bottom = Rc::clone(&machine.stack()[0]);

        machine.run(&tokens("%1")).unwrap();

        assert!(same_node(&machine.stack()[1], &bottom));
    }

    #[test]
    fn test_dup_shares_the_node() {
        let registry = OperatorRegistry::with_builtins();
        let stack = run(&registry, "440 sin dup").unwrap();
        assert_eq!(stack.len(), 2);
        assert!(same_node(&stack[0], &stack[1]));
    }

    #[test]
    fn test_operator_argument_order() {
        let registry = OperatorRegistry::with_builtins();
        let root = build(&registry, &tokens("10 3 sub")).unwrap();

        match root.kind() {
            NodeKind::Operator { opcode, inputs } => {
                assert_eq!(registry.name(*opcode), "sub");
                assert_eq!(values(inputs), vec![10.0, 3.0]);
            }
            other => panic!("expected operator, got {:?}", other),
        }
    }

    #[test]
    fn test_adsr_takes_inputs_in_source_order() {
        let registry = OperatorRegistry::with_builtins();
        let root = build(&registry, &tokens("0.1 0.2 0.5 0.3 adsr")).unwrap();
        assert_eq!(values(root.inputs()), vec![0.1, 0.2, 0.5, 0.3]);
    }

    #[test]
    fn test_zero_arity_operator() {
        let registry = OperatorRegistry::with_builtins();
        let root = build(&registry, &tokens("time")).unwrap();
        assert!(root.inputs().is_empty());
    }

    #[test]
    fn test_variable_binds_value() {
        let registry = OperatorRegistry::with_builtins();
        let stack = run(&registry, "440 sin @osc osc osc").unwrap();
        assert_eq!(stack.len(), 2);
        assert!(same_node(&stack[0], &stack[1]));
    }

    #[test]
    fn test_binding_a_list_does_not_replay_it() {
        let registry = OperatorRegistry::with_builtins();
        let mut machine = Machine::new(&registry);
        machine.run(&tokens("[ 2 mul ] @double")).unwrap();

        assert!(machine.stack().is_empty());
        let bound = machine.env().variable("double").unwrap();
        assert!(matches!(
            bound.kind(),
            NodeKind::ListThunk { start: 1, count: 2 }
        ));
    }

    #[test]
    fn test_list_variable_replays_per_use() {
        let registry = OperatorRegistry::with_builtins();
        let stack = run(&registry, "[ 2 mul ] @double 3 double 5 double").unwrap();

        assert_eq!(stack.len(), 2);
        assert!(!same_node(&stack[0], &stack[1]));
        assert_eq!(values(stack[0].inputs()), vec![3.0, 2.0]);
        assert_eq!(values(stack[1].inputs()), vec![5.0, 2.0]);
    }

    #[test]
    fn test_list_is_forced_when_popped_as_argument() {
        let registry = OperatorRegistry::with_builtins();
        // The list "220 2 mul" is replayed when sin pops it
        let root = build(&registry, &tokens("[ 220 2 mul ] sin")).unwrap();

        let freq = &root.inputs()[0];
        assert!(!freq.is_list());
        assert_eq!(values(freq.inputs()), vec![220.0, 2.0]);
    }

    #[test]
    fn test_list_replay_consumes_live_operands() {
        let registry = OperatorRegistry::with_builtins();
        // The list body "add" takes both of its operands from the live stack
        let root = build(&registry, &tokens("1 2 [ add ] 3 mul")).unwrap();

        // mul pops 3, then the list: replaying "add" yields add(1, 2)
        let args = root.inputs();
        assert_eq!(values(args[0].inputs()), vec![1.0, 2.0]);
        assert_eq!(constant(&args[1]), 3.0);
    }

    #[test]
    fn test_list_result_is_forced_at_end() {
        let registry = OperatorRegistry::with_builtins();
        let root = build(&registry, &tokens("[ 440 sin ]")).unwrap();
        assert!(!root.is_list());
        assert_eq!(constant(&root.inputs()[0]), 440.0);
    }

    #[test]
    fn test_nested_lists_close_on_matching_bracket() {
        let registry = OperatorRegistry::with_builtins();
        let mut machine = Machine::new(&registry);
        machine.run(&tokens("[ [ 2 ] mul ] @twice")).unwrap();

        let bound = machine.env().variable("twice").unwrap();
        assert!(matches!(
            bound.kind(),
            NodeKind::ListThunk { start: 1, count: 4 }
        ));

        // Replaying pushes the inner list, which mul then forces
        machine.run(&tokens("7 twice")).unwrap();
        assert_eq!(machine.stack().len(), 1);
        assert_eq!(values(machine.stack()[0].inputs()), vec![7.0, 2.0]);
    }

    #[test]
    fn test_variable_forces_list_left_by_its_replay() {
        let registry = OperatorRegistry::with_builtins();
        // m replays to the list [ add ], which is forced against 1 2 before @f
        let root = build(&registry, &tokens("[ [ add ] ] @m 1 2 m @f 10 f mul")).unwrap();

        let args = root.inputs();
        assert_eq!(registry.name(*opcode_of(&args[0])), "add");
        assert_eq!(values(args[0].inputs()), vec![1.0, 2.0]);
        assert_eq!(constant(&args[1]), 10.0);
    }

    #[test]
    fn test_forced_variable_result_is_shared() {
        let registry = OperatorRegistry::with_builtins();
        let root = build(&registry, &tokens("[ [ 440 sin ] ] @m m @f f f add")).unwrap();

        // 440, sin, add
        assert_eq!(count_reachable(&root), 3);
        assert!(same_node(&root.inputs()[0], &root.inputs()[1]));
    }

    #[test]
    fn test_rebinding_shadows() {
        let registry = OperatorRegistry::with_builtins();
        let stack = run(&registry, "1 @x 2 @x x").unwrap();
        assert_eq!(values(&stack), vec![2.0]);
    }

    #[test]
    fn test_variable_shadows_operator() {
        let registry = OperatorRegistry::with_builtins();
        let stack = run(&registry, "5 @sin sin").unwrap();
        assert_eq!(values(&stack), vec![5.0]);
    }

    #[test]
    fn test_unknown_token() {
        let registry = OperatorRegistry::with_builtins();
        let err = build(&registry, &tokens("440 reverb")).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownToken { ref token, index: 1 } if token == "reverb"
        ));
    }

    #[test]
    fn test_missing_operand_underflows() {
        let registry = OperatorRegistry::with_builtins();
        let err = build(&registry, &tokens("sin")).unwrap_err();
        assert!(matches!(err, Error::StackUnderflow { index: 0, .. }));
    }

    #[test]
    fn test_dup_and_bind_on_empty_stack() {
        let registry = OperatorRegistry::with_builtins();
        assert!(matches!(
            run(&registry, "dup"),
            Err(Error::StackUnderflow { .. })
        ));
        assert!(matches!(
            run(&registry, "@x"),
            Err(Error::StackUnderflow { .. })
        ));
        assert!(matches!(
            run(&registry, "1 @"),
            Err(Error::EmptyBinding { index: 1 })
        ));
    }

    #[test]
    fn test_reorder_errors() {
        let registry = OperatorRegistry::with_builtins();
        assert!(matches!(
            run(&registry, "1 2 %2"),
            Err(Error::ReorderOutOfRange { depth: 2, .. })
        ));
        assert!(matches!(
            run(&registry, "1 %x"),
            Err(Error::InvalidReorder { .. })
        ));
        assert!(matches!(
            run(&registry, "1 %-1"),
            Err(Error::InvalidReorder { .. })
        ));
    }

    #[test]
    fn test_bracket_errors() {
        let registry = OperatorRegistry::with_builtins();
        assert!(matches!(
            run(&registry, "1 ]"),
            Err(Error::UnmatchedClose { index: 1 })
        ));
        assert!(matches!(
            run(&registry, "1 [ 2 [ 3 ]"),
            Err(Error::UnterminatedList { index: 1 })
        ));
    }

    #[test]
    fn test_unbalanced_stack_at_end() {
        let registry = OperatorRegistry::with_builtins();
        assert!(matches!(
            build(&registry, &tokens("1 2")),
            Err(Error::UnbalancedStack { depth: 2 })
        ));
        assert!(matches!(
            build(&registry, &tokens("1 @x")),
            Err(Error::UnbalancedStack { depth: 0 })
        ));
        assert!(matches!(build(&registry, &[]), Err(Error::EmptyProgram)));
    }

    #[test]
    fn test_self_referencing_list_hits_replay_limit() {
        let registry = OperatorRegistry::with_builtins();
        let err = build(&registry, &tokens("[ loop ] @loop loop")).unwrap_err();
        assert!(matches!(err, Error::ReplayLimit { .. }));
    }

    #[test]
    fn test_list_that_rebuilds_itself_hits_replay_limit() {
        let registry = OperatorRegistry::with_builtins();
        // Every replay of "dup" leaves the list on top again
        let err = build(&registry, &tokens("[ dup ] dup sin")).unwrap_err();
        assert!(matches!(err, Error::ReplayLimit { .. }));
    }

    #[test]
    fn test_stack_limit() {
        let registry = OperatorRegistry::with_builtins();
        let limits = Limits {
            max_stack: 3,
            ..Limits::default()
        };
        let mut machine = Machine::with_limits(&registry, limits);
        let err = machine.run(&tokens("1 2 3 4")).unwrap_err();
        assert!(matches!(
            err,
            Error::StackOverflow { index: 3, limit: 3, .. }
        ));
    }
}
