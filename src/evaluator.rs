//! Memoized graph evaluation
//!
//! Walks the graph depth-first from the root, computing each node's full
//! buffer once and storing it in the node. A node reached again through a
//! second edge returns its stored buffer, so stateful operators (`sin`,
//! `saw`, `lowpass`) are never run twice over the same clip.

use crate::error::{Error, Result};
use crate::graph::{Node, NodeKind};
use crate::operator::RenderContext;
use crate::registry::OperatorRegistry;
use std::cell::Cell;
use tracing::trace;

/// Evaluator for one render pass
pub struct Evaluator<'r> {
    registry: &'r OperatorRegistry,
    ctx: RenderContext,
    /// Buffers allocated so far (one per distinct node evaluated)
    computed: Cell<usize>,
}

impl<'r> Evaluator<'r> {
    pub fn new(registry: &'r OperatorRegistry, ctx: RenderContext) -> Self {
        Self {
            registry,
            ctx,
            computed: Cell::new(0),
        }
    }

    /// Number of buffers computed by this evaluator
    pub fn buffers_computed(&self) -> usize {
        self.computed.get()
    }

    /// Full-length buffer for `node`, computing it (and its inputs) if needed
    ///
    /// The returned slice is the node's own stored buffer: evaluating the same
    /// node again returns the same memory. The walk keeps its own work list,
    /// so graph depth is bounded by memory rather than the native stack.
    pub fn evaluate<'n>(&self, node: &'n Node) -> Result<&'n [f32]> {
        let mut pending: Vec<&'n Node> = vec![node];

        while let Some(&current) = pending.last() {
            if current.cached().is_some() {
                pending.pop();
                continue;
            }

            let buffer = match current.kind() {
                NodeKind::Constant(value) => vec![*value; self.ctx.sample_count],
                NodeKind::Operator { opcode, inputs } => {
                    let op = self.registry.get(*opcode);
                    if inputs.len() != op.arity() {
                        return Err(Error::ArityMismatch {
                            name: op.name().to_string(),
                            expected: op.arity(),
                            got: inputs.len(),
                        });
                    }

                    // Inputs first; this node is revisited once they are stored
                    let before = pending.len();
                    pending.extend(
                        inputs
                            .iter()
                            .map(|input| &**input)
                            .filter(|input| input.cached().is_none()),
                    );
                    if pending.len() > before {
                        continue;
                    }

                    let buffers: Vec<&[f32]> =
                        inputs.iter().filter_map(|input| input.cached()).collect();

                    trace!(op = op.name(), "apply");
                    op.apply(&buffers, &self.ctx)
                }
                NodeKind::ListThunk { start, count } => {
                    return Err(Error::UnresolvedList {
                        start: *start,
                        count: *count,
                    });
                }
            };

            self.computed.set(self.computed.get() + 1);
            current.memoize(buffer);
            pending.pop();
        }

        Ok(node.cached().unwrap_or_default())
    }
}
