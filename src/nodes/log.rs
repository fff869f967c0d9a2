//! Semitone logarithm node - frequency ratio to semitones
//!
//! Output[i] = 12 * log2(Input[i]). No protection: zero gives -inf and
//! negative input gives NaN.

use crate::operator::{Kernel, RenderContext};

/// Semitone log: `x log` -> 12 * log2(x)
pub struct LogNode;

impl Kernel for LogNode {
    type State = ();

    fn name(&self) -> &str {
        "log"
    }

    fn description(&self) -> &str {
        "x log: 12 * log2(x), ratio to semitones"
    }

    fn arity(&self) -> usize {
        1
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) {}

    fn tick(&self, inputs: &[&[f32]], i: usize, _state: &mut (), _ctx: &RenderContext) -> f32 {
        12.0 * inputs[0][i].log2()
    }
}
