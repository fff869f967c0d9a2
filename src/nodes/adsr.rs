//! ADSR envelope node - Attack-Decay-Sustain-Release over the whole clip
//!
//! The envelope is laid out against the clip itself: attack starts at t = 0
//! and release ends exactly at the last sample. All four parameters are full
//! signals, so a time-varying sustain level works like any other input.
//!
//! # Envelope Shape
//!
//! ```text
//! 1.0  |    /\
//!      |   /  \___________
//!  s   |  /               \
//!      | /                 \
//! 0.0  |/___________________\
//!      0  a  a+d     dur-r  dur
//! ```

use crate::operator::{Kernel, RenderContext};

/// Envelope generator: `attack decay sustain release adsr`
///
/// Times are in seconds, sustain is a level. Zero-length segments are not
/// guarded; a zero decay or release divides by zero at its boundary sample.
pub struct ADSRNode;

impl ADSRNode {
    /// Envelope level at time `t` of a clip lasting `duration` seconds
    pub fn level(t: f32, duration: f32, a: f32, d: f32, s: f32, r: f32) -> f32 {
        if t < a {
            t / a
        } else if t < a + d {
            let u = (t - a) / d;
            1.0 + (s - 1.0) * u
        } else if t > duration - r {
            s * (duration - t) / r
        } else {
            s
        }
    }
}

impl Kernel for ADSRNode {
    type State = ();

    fn name(&self) -> &str {
        "adsr"
    }

    fn description(&self) -> &str {
        "attack decay sustain release adsr: envelope spanning the whole clip"
    }

    fn arity(&self) -> usize {
        4
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) {}

    fn tick(&self, inputs: &[&[f32]], i: usize, _state: &mut (), ctx: &RenderContext) -> f32 {
        Self::level(
            ctx.time_at(i),
            ctx.duration(),
            inputs[0][i],
            inputs[1][i],
            inputs[2][i],
            inputs[3][i],
        )
    }
}
