//! Semitone exponent node - semitones to frequency ratio
//!
//! Output[i] = 2^(Input[i] / 12). Inverse of `log`, so
//! `440 7 exp mul` is a fifth above A4.

use crate::operator::{Kernel, RenderContext};

/// Semitone exponent: `x exp` -> 2^(x / 12)
pub struct ExpNode;

impl Kernel for ExpNode {
    type State = ();

    fn name(&self) -> &str {
        "exp"
    }

    fn description(&self) -> &str {
        "x exp: 2^(x / 12), semitones to ratio"
    }

    fn arity(&self) -> usize {
        1
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) {}

    fn tick(&self, inputs: &[&[f32]], i: usize, _state: &mut (), _ctx: &RenderContext) -> f32 {
        (inputs[0][i] / 12.0).exp2()
    }
}
