//! Signal graph data model
//!
//! A program compiles to a DAG of [`Node`]s shared through `Rc`. Inputs always
//! point at nodes that existed before the node itself, so the graph cannot
//! contain cycles and plain reference counting owns it.
//!
//! A node is immutable after construction except for its buffer slot, which
//! the evaluator fills exactly once. Every `Rc` clone of a node (from `dup`,
//! a variable, or a reordered stack slot) sees the same slot, so a shared node
//! is computed once no matter how many consumers it has.

use crate::registry::OpcodeId;
use std::cell::OnceCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a graph node
pub type NodeRef = Rc<Node>;

/// What a node computes
#[derive(Debug)]
pub enum NodeKind {
    /// Scalar broadcast to every sample
    Constant(f32),

    /// Operator applied to input nodes, in argument order
    Operator {
        opcode: OpcodeId,
        inputs: Vec<NodeRef>,
    },

    /// Unexecuted token range `start..start + count`
    ///
    /// Only lives on the operand stack and in variables. The stack machine
    /// replays it before anything can consume it, so it never reaches the
    /// evaluator in a well-formed build.
    ListThunk { start: usize, count: usize },
}

/// A graph node plus its memoized output buffer
pub struct Node {
    kind: NodeKind,
    buffer: OnceCell<Vec<f32>>,
}

impl Node {
    fn new(kind: NodeKind) -> NodeRef {
        Rc::new(Self {
            kind,
            buffer: OnceCell::new(),
        })
    }

    pub fn constant(value: f32) -> NodeRef {
        Self::new(NodeKind::Constant(value))
    }

    pub fn operator(opcode: OpcodeId, inputs: Vec<NodeRef>) -> NodeRef {
        Self::new(NodeKind::Operator { opcode, inputs })
    }

    pub fn list(start: usize, count: usize) -> NodeRef {
        Self::new(NodeKind::ListThunk { start, count })
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Input nodes (empty for constants and lists)
    pub fn inputs(&self) -> &[NodeRef] {
        match &self.kind {
            NodeKind::Operator { inputs, .. } => inputs,
            _ => &[],
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, NodeKind::ListThunk { .. })
    }

    /// Memoized buffer, if this node has been evaluated
    pub fn cached(&self) -> Option<&[f32]> {
        self.buffer.get().map(Vec::as_slice)
    }

    /// Store the computed buffer and return the stored copy
    ///
    /// The slot is write-once: if it is already filled, the existing buffer
    /// wins and `buffer` is dropped.
    pub(crate) fn memoize(&self, buffer: Vec<f32>) -> &[f32] {
        self.buffer.get_or_init(|| buffer)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("evaluated", &self.buffer.get().is_some())
            .finish()
    }
}

// Macros can build chains far deeper than the native stack, so inputs that
// die with this node are unlinked through a work list instead of recursively.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = match &mut self.kind {
            NodeKind::Operator { inputs, .. } => std::mem::take(inputs),
            _ => return,
        };

        while let Some(input) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(input) {
                if let NodeKind::Operator { inputs, .. } = &mut node.kind {
                    pending.append(inputs);
                }
            }
        }
    }
}

/// Number of distinct nodes reachable from `root`, by identity
pub fn count_reachable(root: &NodeRef) -> usize {
    let mut seen = HashSet::new();
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        if seen.insert(Rc::as_ptr(node)) {
            pending.extend(node.inputs());
        }
    }
    seen.len()
}
