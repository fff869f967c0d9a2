//! Addition node - adds two input signals
//!
//! Output[i] = A[i] + B[i] for all samples.

use crate::operator::{Kernel, RenderContext};

/// Addition: `a b add` -> a + b
pub struct AdditionNode;

impl Kernel for AdditionNode {
    type State = ();

    fn name(&self) -> &str {
        "add"
    }

    fn description(&self) -> &str {
        "a b add: sum of two signals"
    }

    fn arity(&self) -> usize {
        2
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) {}

    fn tick(&self, inputs: &[&[f32]], i: usize, _state: &mut (), _ctx: &RenderContext) -> f32 {
        inputs[0][i] + inputs[1][i]
    }
}
