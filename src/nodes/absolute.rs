//! Absolute value node - full-wave rectification

use crate::operator::{Kernel, RenderContext};

/// Absolute value: `x abs` -> |x|
pub struct AbsoluteNode;

impl Kernel for AbsoluteNode {
    type State = ();

    fn name(&self) -> &str {
        "abs"
    }

    fn description(&self) -> &str {
        "x abs: absolute value"
    }

    fn arity(&self) -> usize {
        1
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) {}

    fn tick(&self, inputs: &[&[f32]], i: usize, _state: &mut (), _ctx: &RenderContext) -> f32 {
        inputs[0][i].abs()
    }
}
