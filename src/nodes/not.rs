//! Not node - logical inversion of a 0/1 gate
//!
//! Computed arithmetically as `1 - x`, so it also mirrors non-boolean
//! signals around 0.5.

use crate::operator::{Kernel, RenderContext};

/// Inversion: `x not` -> 1 - x
pub struct NotNode;

impl Kernel for NotNode {
    type State = ();

    fn name(&self) -> &str {
        "not"
    }

    fn description(&self) -> &str {
        "x not: 1 - x (inverts a 0/1 gate)"
    }

    fn arity(&self) -> usize {
        1
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) {}

    fn tick(&self, inputs: &[&[f32]], i: usize, _state: &mut (), _ctx: &RenderContext) -> f32 {
        1.0 - inputs[0][i]
    }
}
