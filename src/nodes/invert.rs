//! Invert node - phase inversion (multiply by -1)

use crate::operator::{Kernel, RenderContext};

/// Negation: `x neg` -> -x
pub struct InvertNode;

impl Kernel for InvertNode {
    type State = ();

    fn name(&self) -> &str {
        "neg"
    }

    fn description(&self) -> &str {
        "x neg: negate (phase invert)"
    }

    fn arity(&self) -> usize {
        1
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) {}

    fn tick(&self, inputs: &[&[f32]], i: usize, _state: &mut (), _ctx: &RenderContext) -> f32 {
        -inputs[0][i]
    }
}
