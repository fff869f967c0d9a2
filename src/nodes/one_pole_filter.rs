//! One-pole filter node - 6 dB/octave low-pass with signal-controlled cutoff
//!
//! # Algorithm
//!
//! ```text
//! tau   = 1 / (2π × cutoff)
//! alpha = T / (tau + T)          T = sample period
//! state = alpha × input + (1 - alpha) × state
//! output = state
//! ```
//!
//! The state starts at the first input sample, so a constant input passes
//! through unchanged instead of fading in from zero. The cutoff is not
//! clamped: a zero cutoff freezes the output, a negative one is unstable.

use crate::operator::{Kernel, RenderContext};
use std::f32::consts::PI;

/// One-pole low-pass: `signal cutoff lowpass`
///
/// # Example
/// ```text
/// 110 saw 800 lowpass                   -- darker saw
/// 110 saw 2 sin 400 mul 600 add lowpass -- wobbling cutoff
/// ```
pub struct OnePoleFilterNode;

impl OnePoleFilterNode {
    /// Smoothing coefficient for one sample at `cutoff` Hz
    pub fn alpha(cutoff: f32, sample_period: f32) -> f32 {
        let tau = 1.0 / (2.0 * PI * cutoff);
        sample_period / (tau + sample_period)
    }
}

impl Kernel for OnePoleFilterNode {
    /// Filter memory (last output)
    type State = f32;

    fn name(&self) -> &str {
        "lowpass"
    }

    fn description(&self) -> &str {
        "signal cutoff lowpass: one-pole low-pass filter, cutoff in Hz"
    }

    fn arity(&self) -> usize {
        2
    }

    fn init(&self, inputs: &[&[f32]], _ctx: &RenderContext) -> f32 {
        inputs[0][0]
    }

    fn tick(&self, inputs: &[&[f32]], i: usize, state: &mut f32, ctx: &RenderContext) -> f32 {
        let alpha = Self::alpha(inputs[1][i], ctx.sample_period);
        *state = alpha * inputs[0][i] + (1.0 - alpha) * *state;
        *state
    }
}
