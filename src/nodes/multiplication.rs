//! Multiplication node - multiplies two signals
//!
//! Used for amplitude envelopes (`osc env mul`) and ring modulation.

use crate::operator::{Kernel, RenderContext};

/// Multiplication: `a b mul` -> a * b
pub struct MultiplicationNode;

impl Kernel for MultiplicationNode {
    type State = ();

    fn name(&self) -> &str {
        "mul"
    }

    fn description(&self) -> &str {
        "a b mul: product of two signals"
    }

    fn arity(&self) -> usize {
        2
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) {}

    fn tick(&self, inputs: &[&[f32]], i: usize, _state: &mut (), _ctx: &RenderContext) -> f32 {
        inputs[0][i] * inputs[1][i]
    }
}
