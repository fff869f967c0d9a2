//! Subtraction node - subtracts signal B from signal A

use crate::operator::{Kernel, RenderContext};

/// Subtraction: `a b sub` -> a - b
pub struct SubtractionNode;

impl Kernel for SubtractionNode {
    type State = ();

    fn name(&self) -> &str {
        "sub"
    }

    fn description(&self) -> &str {
        "a b sub: difference a - b"
    }

    fn arity(&self) -> usize {
        2
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) {}

    fn tick(&self, inputs: &[&[f32]], i: usize, _state: &mut (), _ctx: &RenderContext) -> f32 {
        inputs[0][i] - inputs[1][i]
    }
}
