//! Greater-than node - comparison operator (a > b returns 1.0, else 0.0)

use crate::operator::{Kernel, RenderContext};

/// Comparison: `a b gt` -> 1.0 when a > b
pub struct GreaterThanNode;

impl Kernel for GreaterThanNode {
    type State = ();

    fn name(&self) -> &str {
        "gt"
    }

    fn description(&self) -> &str {
        "a b gt: 1 if a > b else 0"
    }

    fn arity(&self) -> usize {
        2
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) {}

    fn tick(&self, inputs: &[&[f32]], i: usize, _state: &mut (), _ctx: &RenderContext) -> f32 {
        if inputs[0][i] > inputs[1][i] {
            1.0
        } else {
            0.0
        }
    }
}
