//! Clip node - hard clipping to the [-1, 1] output range

use crate::operator::{Kernel, RenderContext};

/// Hard clip: `x clip` -> clamp(x, -1, 1)
pub struct ClipNode;

impl Kernel for ClipNode {
    type State = ();

    fn name(&self) -> &str {
        "clip"
    }

    fn description(&self) -> &str {
        "x clip: clamp to [-1, 1]"
    }

    fn arity(&self) -> usize {
        1
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) {}

    fn tick(&self, inputs: &[&[f32]], i: usize, _state: &mut (), _ctx: &RenderContext) -> f32 {
        inputs[0][i].clamp(-1.0, 1.0)
    }
}
