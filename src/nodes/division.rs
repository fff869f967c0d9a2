//! Division node - divides signal A by signal B
//!
//! No zero protection: `x 0 div` yields infinity or NaN, which the renderer
//! passes through like any other sample.

use crate::operator::{Kernel, RenderContext};

/// Division: `a b div` -> a / b
pub struct DivisionNode;

impl Kernel for DivisionNode {
    type State = ();

    fn name(&self) -> &str {
        "div"
    }

    fn description(&self) -> &str {
        "a b div: quotient a / b"
    }

    fn arity(&self) -> usize {
        2
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) {}

    fn tick(&self, inputs: &[&[f32]], i: usize, _state: &mut (), _ctx: &RenderContext) -> f32 {
        inputs[0][i] / inputs[1][i]
    }
}
